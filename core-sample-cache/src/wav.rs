//! # WAV Buffer Layout
//!
//! Every cached sample is a canonical RIFF/WAVE image: a 44-byte header
//! followed by the PCM payload, so playback code can treat all samples alike
//! regardless of the codec they were decoded from.
//!
//! ```text
//! offset  size  field
//!      0     4  "RIFF"
//!      4     4  riff length (36 + payload)
//!      8     4  "WAVE"
//!     12     4  "fmt "
//!     16     4  fmt chunk length (16)
//!     20     2  format tag (1 = PCM)
//!     22     2  channels
//!     24     4  sample rate
//!     28     4  byte rate
//!     32     2  block align
//!     34     2  bits per sample
//!     36     4  "data"
//!     40     4  payload length
//! ```

use crate::error::{Result, SampleCacheError};
use crate::traits::PcmBuffer;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::time::Duration;

/// Size of the header preceding the PCM payload.
pub const WAV_HEADER_LEN: usize = 44;

/// `WAVE_FORMAT_PCM`
pub const FORMAT_PCM: u16 = 1;

const FMT_CHUNK_LEN: u32 = 16;

/// Parsed or computed WAV header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// RIFF chunk length: everything after the first 8 bytes.
    pub riff_length: u32,
    /// `data` chunk length: the payload.
    pub data_length: u32,
}

impl WavHeader {
    /// Compute the header for a PCM payload of `payload_len` bytes.
    pub fn for_pcm(
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        payload_len: usize,
    ) -> Result<Self> {
        if channels == 0 || sample_rate == 0 || bits_per_sample == 0 || bits_per_sample % 8 != 0 {
            return Err(SampleCacheError::DecodeFailed(format!(
                "invalid PCM format: {} channels, {} Hz, {} bits",
                channels, sample_rate, bits_per_sample
            )));
        }

        let payload = payload_len as u64;
        let riff_length = payload + (WAV_HEADER_LEN as u64 - 8);
        if riff_length > u32::MAX as u64 {
            return Err(SampleCacheError::PayloadTooLarge(payload));
        }

        let bytes_per_sample = (bits_per_sample / 8) as u32;
        let block_align = channels as u32 * bytes_per_sample;
        let byte_rate = sample_rate as u64 * block_align as u64;

        Ok(Self {
            format_tag: FORMAT_PCM,
            channels,
            sample_rate,
            byte_rate: u32::try_from(byte_rate).map_err(|_| {
                SampleCacheError::DecodeFailed(format!("byte rate {} out of range", byte_rate))
            })?,
            block_align: u16::try_from(block_align).map_err(|_| {
                SampleCacheError::DecodeFailed(format!("block align {} out of range", block_align))
            })?,
            bits_per_sample,
            riff_length: riff_length as u32,
            data_length: payload as u32,
        })
    }

    /// Serialize the header.
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(b"RIFF");
        buf.put_u32_le(self.riff_length);
        buf.put_slice(b"WAVE");
        buf.put_slice(b"fmt ");
        buf.put_u32_le(FMT_CHUNK_LEN);
        buf.put_u16_le(self.format_tag);
        buf.put_u16_le(self.channels);
        buf.put_u32_le(self.sample_rate);
        buf.put_u32_le(self.byte_rate);
        buf.put_u16_le(self.block_align);
        buf.put_u16_le(self.bits_per_sample);
        buf.put_slice(b"data");
        buf.put_u32_le(self.data_length);
    }

    /// Parse a header written by [`write_to`](Self::write_to).
    ///
    /// Returns `None` if `data` is shorter than the header or the chunk tags
    /// do not match the canonical layout.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < WAV_HEADER_LEN {
            return None;
        }

        let mut buf = &data[..WAV_HEADER_LEN];
        if buf.copy_to_bytes(4).as_ref() != b"RIFF" {
            return None;
        }
        let riff_length = buf.get_u32_le();
        if buf.copy_to_bytes(4).as_ref() != b"WAVE" || buf.copy_to_bytes(4).as_ref() != b"fmt " {
            return None;
        }
        if buf.get_u32_le() != FMT_CHUNK_LEN {
            return None;
        }
        let format_tag = buf.get_u16_le();
        let channels = buf.get_u16_le();
        let sample_rate = buf.get_u32_le();
        let byte_rate = buf.get_u32_le();
        let block_align = buf.get_u16_le();
        let bits_per_sample = buf.get_u16_le();
        if buf.copy_to_bytes(4).as_ref() != b"data" {
            return None;
        }
        let data_length = buf.get_u32_le();

        Some(Self {
            format_tag,
            channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            riff_length,
            data_length,
        })
    }

    /// Playback duration of the payload.
    pub fn duration(&self) -> Duration {
        if self.byte_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.data_length as f64 / self.byte_rate as f64)
    }
}

/// Build the cached buffer for decoded PCM: header then payload.
pub fn build_wave_buffer(pcm: &PcmBuffer) -> Result<Bytes> {
    let header = WavHeader::for_pcm(
        pcm.channels,
        pcm.sample_rate,
        pcm.bits_per_sample,
        pcm.samples.len(),
    )?;

    let mut buf = BytesMut::with_capacity(WAV_HEADER_LEN + pcm.samples.len());
    header.write_to(&mut buf);
    buf.put_slice(&pcm.samples);
    Ok(buf.freeze())
}
