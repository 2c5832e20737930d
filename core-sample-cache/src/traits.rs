//! # Core Sample Cache Traits
//!
//! Abstractions over the collaborators the cache drives but does not own:
//!
//! - **SampleDecoder / DecodeSession**: turns a byte source into linear PCM.
//!   Sessions hold native decode state and must be closed on every exit path.
//! - **PlaybackNotifier**: the audio engine that owns active voices. It is told
//!   before a buffer that is still referenced gets evicted so it can stop any
//!   voice reading from it.
//!
//! ## Threading Model
//!
//! Decoders and notifiers are shared by every cache caller and must be
//! `Send + Sync`. A session lives only for the duration of one decode, under
//! the cache lock.

use crate::cache::SampleHandle;
use crate::error::Result;
use bridge_traits::ByteSource;
use tracing::trace;

/// Decoded linear PCM plus the format metadata needed to describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    /// Interleaved little-endian samples.
    pub samples: Vec<u8>,
    /// Number of audio channels (1 = mono, 2 = stereo, etc.)
    pub channels: u16,
    /// Sample rate in Hz (e.g., 22050, 44100)
    pub sample_rate: u32,
    /// Bits per sample of `samples` (e.g., 8, 16)
    pub bits_per_sample: u16,
}

impl PcmBuffer {
    /// Create a PCM buffer description.
    pub fn new(samples: Vec<u8>, channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            samples,
            channels,
            sample_rate,
            bits_per_sample,
        }
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        let frame_bytes = self.channels as usize * (self.bits_per_sample as usize / 8);
        if frame_bytes == 0 {
            0
        } else {
            self.samples.len() / frame_bytes
        }
    }
}

/// Factory for decode sessions.
///
/// # Errors
///
/// `open` fails with:
/// - [`CodecInitFailed`](crate::SampleCacheError::CodecInitFailed) when the container cannot be read
/// - [`UnsupportedCodec`](crate::SampleCacheError::UnsupportedCodec) when no codec is available
/// - [`StreamCountMismatch`](crate::SampleCacheError::StreamCountMismatch) unless exactly one stream exists
pub trait SampleDecoder: Send + Sync {
    /// Open a session over `source`. `identifier` is a format hint only.
    ///
    /// The session may borrow the source; the caller closes the source after
    /// the session is closed.
    fn open<'a>(
        &self,
        source: &'a mut dyn ByteSource,
        identifier: &str,
    ) -> Result<Box<dyn DecodeSession + 'a>>;
}

/// One in-progress decode of one source.
pub trait DecodeSession {
    /// Decode the entire stream.
    ///
    /// Fails with [`DecodeFailed`](crate::SampleCacheError::DecodeFailed).
    fn run(&mut self) -> Result<PcmBuffer>;

    /// Release all decode resources. Must be idempotent.
    fn close(&mut self);
}

/// Capability used to stop playback of a buffer evicted while referenced.
///
/// Called after the sample has left the cache and without the cache lock
/// held, so implementations may call back into the cache, typically to
/// [`close`](crate::AudioFileCache::close) the handle, which then returns
/// false. The handle keeps the buffer alive until every clone is dropped.
pub trait PlaybackNotifier: Send + Sync {
    /// Stop every voice that is reading from `handle`.
    fn release_sample(&self, handle: &SampleHandle);
}

/// Notifier for hosts without an audio engine attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl PlaybackNotifier for NullNotifier {
    fn release_sample(&self, handle: &SampleHandle) {
        trace!(bytes = handle.len(), "No playback engine to notify");
    }
}
