//! # Symphonia Decoder Implementation
//!
//! Whole-file sample decoder using the Symphonia library.

use crate::cache::config::DEFAULT_READ_CHUNK_BYTES;
use crate::decoder::format_detector::FormatDetector;
use crate::decoder::sample_converter::{SampleConverter, OUTPUT_BITS_PER_SAMPLE};
use crate::error::{Result, SampleCacheError};
use crate::traits::{DecodeSession, PcmBuffer, SampleDecoder};
use bridge_traits::ByteSource;
use std::io::Cursor;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use tracing::{debug, error, instrument, trace, warn};

/// Consecutive corrupt packets tolerated before the decode is abandoned.
const MAX_CONSECUTIVE_ERRORS: usize = 10;

/// Sample decoder backed by Symphonia's format and codec registries.
///
/// The source is read fully into memory in `read_chunk_bytes` pieces, then
/// probed. Exactly one track must be present.
#[derive(Debug, Clone)]
pub struct SymphoniaDecoder {
    read_chunk_bytes: usize,
}

impl Default for SymphoniaDecoder {
    fn default() -> Self {
        Self {
            read_chunk_bytes: DEFAULT_READ_CHUNK_BYTES,
        }
    }
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many bytes are requested from the source per read.
    pub fn with_read_chunk_bytes(mut self, bytes: usize) -> Self {
        self.read_chunk_bytes = bytes.max(1);
        self
    }

    fn read_source(&self, source: &mut dyn ByteSource) -> Result<Vec<u8>> {
        let capacity = source
            .len()
            .and_then(|len| usize::try_from(len).ok())
            .unwrap_or(self.read_chunk_bytes);
        let mut data = Vec::with_capacity(capacity);
        let mut chunk = vec![0u8; self.read_chunk_bytes];

        loop {
            let read = source.read(&mut chunk)?;
            if read == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..read]);
        }

        trace!(bytes = data.len(), "Read encoded sample");
        Ok(data)
    }
}

impl SampleDecoder for SymphoniaDecoder {
    #[instrument(skip(self, source))]
    fn open<'a>(
        &self,
        source: &'a mut dyn ByteSource,
        identifier: &str,
    ) -> Result<Box<dyn DecodeSession + 'a>> {
        let data = self.read_source(source)?;
        let hint = FormatDetector::hint_from_identifier(identifier);
        let media_source = Box::new(Cursor::new(data)) as Box<dyn MediaSource>;
        let mss = MediaSourceStream::new(media_source, Default::default());

        let probe_result = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| {
                error!("Format probe failed: {}", e);
                SampleCacheError::CodecInitFailed(format!("failed to probe format: {}", e))
            })?;

        let format_reader = probe_result.format;

        let tracks = format_reader.tracks();
        if tracks.len() != 1 {
            return Err(SampleCacheError::StreamCountMismatch(tracks.len()));
        }

        let track = &tracks[0];
        let params = &track.codec_params;
        if params.codec == CODEC_TYPE_NULL {
            return Err(SampleCacheError::UnsupportedCodec(
                "stream has no codec".to_string(),
            ));
        }

        let codec_name = FormatDetector::codec_name(params.codec);
        let decoder = symphonia::default::get_codecs()
            .make(params, &DecoderOptions::default())
            .map_err(|e| match e {
                SymphoniaError::Unsupported(_) => SampleCacheError::UnsupportedCodec(codec_name.clone()),
                other => SampleCacheError::CodecInitFailed(format!(
                    "failed to create {} decoder: {}",
                    codec_name, other
                )),
            })?;

        let track_id = track.id;
        let sample_rate = params.sample_rate.unwrap_or(0);
        let channels = params.channels.map(|ch| ch.count() as u16).unwrap_or(0);
        debug!(
            codec = %codec_name,
            sample_rate,
            channels,
            "Opened decode session"
        );

        Ok(Box::new(SymphoniaSession {
            track_id,
            sample_rate,
            channels,
            format_reader: Some(format_reader),
            decoder: Some(decoder),
        }))
    }
}

/// One open Symphonia decode.
///
/// Holds the demuxer and codec until [`close`](DecodeSession::close).
pub struct SymphoniaSession {
    format_reader: Option<Box<dyn FormatReader>>,
    decoder: Option<Box<dyn Decoder>>,
    track_id: u32,
    sample_rate: u32,
    channels: u16,
}

impl SymphoniaSession {
    pub fn is_closed(&self) -> bool {
        self.format_reader.is_none() && self.decoder.is_none()
    }
}

impl DecodeSession for SymphoniaSession {
    #[instrument(skip(self), level = "debug")]
    fn run(&mut self) -> Result<PcmBuffer> {
        let (Some(format_reader), Some(decoder)) =
            (self.format_reader.as_mut(), self.decoder.as_mut())
        else {
            return Err(SampleCacheError::DecodeFailed(
                "decode session is closed".to_string(),
            ));
        };

        let mut samples = Vec::new();
        let mut format = None;
        let mut consecutive_errors = 0;

        loop {
            let packet = match format_reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    return Err(SampleCacheError::DecodeFailed(
                        "track list changed during decode".to_string(),
                    ));
                }
                Err(e) => {
                    error!("Failed to read packet: {}", e);
                    return Err(SampleCacheError::DecodeFailed(format!(
                        "failed to read packet: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    consecutive_errors = 0;
                    let spec = decoded.spec();
                    settle_format(
                        &mut format,
                        StreamFormat {
                            channels: spec.channels.count() as u16,
                            sample_rate: spec.rate,
                        },
                    )?;
                    SampleConverter::append_interleaved_i16(&decoded, &mut samples);
                }
                Err(SymphoniaError::DecodeError(err)) => {
                    consecutive_errors += 1;
                    warn!(
                        "Skipping packet with decode error (attempt {}/{}): {}",
                        consecutive_errors, MAX_CONSECUTIVE_ERRORS, err
                    );

                    if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                        return Err(SampleCacheError::DecodeFailed(format!(
                            "stream corrupted after {} failed packets",
                            MAX_CONSECUTIVE_ERRORS
                        )));
                    }
                }
                Err(e) => {
                    return Err(SampleCacheError::DecodeFailed(format!(
                        "failed to decode packet: {}",
                        e
                    )));
                }
            }
        }

        if let Some(format) = format {
            self.channels = format.channels;
            self.sample_rate = format.sample_rate;
        }

        if self.channels == 0 || self.sample_rate == 0 {
            return Err(SampleCacheError::DecodeFailed(
                "stream did not report a sample format".to_string(),
            ));
        }

        Ok(PcmBuffer::new(
            samples,
            self.channels,
            self.sample_rate,
            OUTPUT_BITS_PER_SAMPLE,
        ))
    }

    fn close(&mut self) {
        if self.is_closed() {
            return;
        }

        self.decoder = None;
        self.format_reader = None;
        trace!("Closed decode session");
    }
}

/// Channel layout and rate shared by every packet of one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamFormat {
    channels: u16,
    sample_rate: u32,
}

/// Record the first packet's format and reject packets that differ from it,
/// since the output header describes the whole buffer.
fn settle_format(current: &mut Option<StreamFormat>, next: StreamFormat) -> Result<()> {
    match *current {
        None => {
            *current = Some(next);
            Ok(())
        }
        Some(first) if first == next => Ok(()),
        Some(first) => Err(SampleCacheError::DecodeFailed(format!(
            "sample format changed mid-stream from {} ch @ {} Hz to {} ch @ {} Hz",
            first.channels, first.sample_rate, next.channels, next.sample_rate
        ))),
    }
}
