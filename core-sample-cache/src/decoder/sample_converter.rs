//! # Sample Format Converter
//!
//! Converts decoded audio to the cache's output format.

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::conv::IntoSample;
use symphonia::core::sample::Sample;

/// Bits per sample of every converted buffer.
pub const OUTPUT_BITS_PER_SAMPLE: u16 = 16;

/// Sample converter that normalizes audio to interleaved signed 16-bit
/// little-endian bytes.
///
/// Symphonia outputs audio in various formats (u8, i16, i24, i32, f32, f64)
/// in planar layout. Playback expects one fixed format, so everything is
/// converted and interleaved (LRLRLR... for stereo).
pub struct SampleConverter;

impl SampleConverter {
    /// Append `buffer` to `out` as interleaved i16 LE samples.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let decoded = decoder.decode(&packet)?;
    /// SampleConverter::append_interleaved_i16(&decoded, &mut pcm);
    /// ```
    pub fn append_interleaved_i16(buffer: &AudioBufferRef<'_>, out: &mut Vec<u8>) {
        match buffer {
            AudioBufferRef::U8(buf) => Self::interleave(buf, out),
            AudioBufferRef::U16(buf) => Self::interleave(buf, out),
            AudioBufferRef::U24(buf) => Self::interleave(buf, out),
            AudioBufferRef::U32(buf) => Self::interleave(buf, out),
            AudioBufferRef::S8(buf) => Self::interleave(buf, out),
            AudioBufferRef::S16(buf) => Self::interleave(buf, out),
            AudioBufferRef::S24(buf) => Self::interleave(buf, out),
            AudioBufferRef::S32(buf) => Self::interleave(buf, out),
            AudioBufferRef::F32(buf) => Self::interleave(buf, out),
            AudioBufferRef::F64(buf) => Self::interleave(buf, out),
        }
    }

    fn interleave<S>(buf: &AudioBuffer<S>, out: &mut Vec<u8>)
    where
        S: Sample + IntoSample<i16>,
    {
        let num_channels = buf.spec().channels.count();
        let num_frames = buf.frames();
        out.reserve(num_frames * num_channels * 2);

        for frame in 0..num_frames {
            for ch in 0..num_channels {
                let sample: i16 = buf.chan(ch)[frame].into_sample();
                out.extend_from_slice(&sample.to_le_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use symphonia::core::audio::{Channels, SignalSpec};

    fn stereo_spec() -> SignalSpec {
        SignalSpec::new(44100, Channels::FRONT_LEFT | Channels::FRONT_RIGHT)
    }

    fn decode_i16(bytes: &[u8]) -> Vec<i16> {
        bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    #[test]
    fn test_interleaves_i16_planes() {
        let mut buf = AudioBuffer::<i16>::new(2, stereo_spec());
        buf.render_reserved(Some(2));
        buf.chan_mut(0).copy_from_slice(&[1, 2]);
        buf.chan_mut(1).copy_from_slice(&[-1, -2]);

        let mut out = Vec::new();
        SampleConverter::append_interleaved_i16(&AudioBufferRef::S16(Cow::Borrowed(&buf)), &mut out);

        assert_eq!(decode_i16(&out), vec![1, -1, 2, -2]);
    }

    #[test]
    fn test_converts_f32_full_scale() {
        let spec = SignalSpec::new(22050, Channels::FRONT_LEFT);
        let mut buf = AudioBuffer::<f32>::new(3, spec);
        buf.render_reserved(Some(3));
        buf.chan_mut(0).copy_from_slice(&[0.0, 1.0, -1.0]);

        let mut out = Vec::new();
        SampleConverter::append_interleaved_i16(&AudioBufferRef::F32(Cow::Borrowed(&buf)), &mut out);

        let samples = decode_i16(&out);
        assert_eq!(samples[0], 0);
        assert!(samples[1] >= i16::MAX - 1);
        assert!(samples[2] <= -i16::MAX);
    }

    #[test]
    fn test_converts_unsigned_8bit() {
        let spec = SignalSpec::new(11025, Channels::FRONT_LEFT);
        let mut buf = AudioBuffer::<u8>::new(2, spec);
        buf.render_reserved(Some(2));
        buf.chan_mut(0).copy_from_slice(&[128, 0]);

        let mut out = Vec::new();
        SampleConverter::append_interleaved_i16(&AudioBufferRef::U8(Cow::Borrowed(&buf)), &mut out);

        assert_eq!(decode_i16(&out), vec![0, i16::MIN]);
    }

    #[test]
    fn test_appends_to_existing_output() {
        let spec = SignalSpec::new(8000, Channels::FRONT_LEFT);
        let mut buf = AudioBuffer::<i16>::new(1, spec);
        buf.render_reserved(Some(1));
        buf.chan_mut(0)[0] = 7;

        let mut out = vec![0xAA, 0xBB];
        SampleConverter::append_interleaved_i16(&AudioBufferRef::S16(Cow::Borrowed(&buf)), &mut out);

        assert_eq!(out, vec![0xAA, 0xBB, 7, 0]);
    }
}
