//! Cached samples and the handles given out for them.

use crate::request::AudioPriority;
use crate::wav::{WavHeader, WAV_HEADER_LEN};
use bytes::Bytes;
use std::fmt;

/// Shared, immutable view of a cached WAV buffer.
///
/// Handles compare equal when they view the same buffer, regardless of the
/// identifier that produced it. Cloning a handle does not take a cache
/// reference; only `open` does.
#[derive(Clone)]
pub struct SampleHandle {
    buffer: Bytes,
}

impl SampleHandle {
    pub(crate) fn new(buffer: Bytes) -> Self {
        Self { buffer }
    }

    /// Whole buffer: WAV header followed by PCM.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// PCM payload after the header.
    pub fn pcm(&self) -> &[u8] {
        self.buffer.get(WAV_HEADER_LEN..).unwrap_or_default()
    }

    pub fn header(&self) -> Option<WavHeader> {
        WavHeader::parse(&self.buffer)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Identity of the underlying buffer.
    pub(crate) fn buffer_id(&self) -> usize {
        self.buffer.as_ptr() as usize
    }
}

impl PartialEq for SampleHandle {
    fn eq(&self, other: &Self) -> bool {
        self.buffer_id() == other.buffer_id() && self.len() == other.len()
    }
}

impl Eq for SampleHandle {}

impl AsRef<[u8]> for SampleHandle {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for SampleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleHandle")
            .field("buffer", &format_args!("{:#x}", self.buffer_id()))
            .field("len", &self.len())
            .finish()
    }
}

/// One cached sample.
///
/// `byte_size` is fixed at construction so the store's running total can
/// never drift from the sum of its entries.
#[derive(Debug)]
pub struct CacheEntry {
    handle: SampleHandle,
    byte_size: u64,
    reference_count: u32,
    priority: AudioPriority,
}

impl CacheEntry {
    /// New entry holding one reference for the caller that decoded it.
    pub(crate) fn new(buffer: Bytes, priority: AudioPriority) -> Self {
        let byte_size = buffer.len() as u64;
        Self {
            handle: SampleHandle::new(buffer),
            byte_size,
            reference_count: 1,
            priority,
        }
    }

    pub fn handle(&self) -> &SampleHandle {
        &self.handle
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn reference_count(&self) -> u32 {
        self.reference_count
    }

    /// Priority of the request that first loaded the sample.
    pub fn priority(&self) -> AudioPriority {
        self.priority
    }

    pub fn is_idle(&self) -> bool {
        self.reference_count == 0
    }

    pub(crate) fn acquire(&mut self) {
        self.reference_count = self.reference_count.saturating_add(1);
    }

    /// Drop one reference. Returns false if none was held.
    pub(crate) fn release(&mut self) -> bool {
        match self.reference_count.checked_sub(1) {
            Some(count) => {
                self.reference_count = count;
                true
            }
            None => false,
        }
    }
}
