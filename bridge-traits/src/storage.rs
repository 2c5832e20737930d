//! Byte Source Abstractions
//!
//! Provides platform-agnostic traits for reading named resources as byte streams.
//! The sample cache never touches the filesystem directly; it asks a
//! [`ByteSourceProvider`] for a [`ByteSource`] and reads it to completion.

use std::io::SeekFrom;

use crate::error::Result;

/// Random-access readable byte stream for a single named resource.
///
/// Implementations must return `Ok(0)` from [`read`](ByteSource::read) once the
/// end of data is reached. Blocking semantics are up to the implementation; the
/// cache imposes no timeout of its own.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::ByteSource;
///
/// fn slurp(source: &mut dyn ByteSource) -> bridge_traits::error::Result<Vec<u8>> {
///     let mut data = Vec::new();
///     let mut chunk = [0u8; 4096];
///     loop {
///         let n = source.read(&mut chunk)?;
///         if n == 0 {
///             break;
///         }
///         data.extend_from_slice(&chunk[..n]);
///     }
///     Ok(data)
/// }
/// ```
pub trait ByteSource: Send {
    /// Read up to `buf.len()` bytes. Returns 0 at end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Reposition the stream, returning the new offset from the start.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Total length in bytes, when known up front.
    fn len(&self) -> Option<u64>;

    /// Returns `true` if the stream is known to be empty.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Release the underlying handle. Reads after `close` return 0.
    ///
    /// Must be idempotent: the cache calls it on every exit path and the
    /// value may be dropped afterwards.
    fn close(&mut self);
}

/// Resolves resource identifiers to byte sources.
///
/// Abstracts asset storage to support different platforms:
/// - Desktop: files under an asset root directory
/// - Archives: entries inside a packed asset file
/// - Tests: in-memory fixtures
pub trait ByteSourceProvider: Send + Sync {
    /// Open the resource named `identifier`.
    ///
    /// Returns [`BridgeError::NotFound`](crate::error::BridgeError::NotFound) if
    /// the resource does not exist.
    fn open(&self, identifier: &str) -> Result<Box<dyn ByteSource>>;

    /// Check whether a resource exists without opening it.
    fn exists(&self, identifier: &str) -> bool;
}

/// In-memory [`ByteSource`], used for embedded assets and tests.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Vec<u8>,
    position: usize,
    closed: bool,
}

impl MemorySource {
    /// Create a source over `data`.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            closed: false,
        }
    }

    /// Returns `true` once [`ByteSource::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ByteSource for MemorySource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.closed || self.position >= self.data.len() {
            return Ok(0);
        }

        let remaining = &self.data[self.position..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let len = self.data.len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => len + offset,
            SeekFrom::Current(offset) => self.position as i64 + offset,
        };

        if target < 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek before start of stream",
            )
            .into());
        }

        self.position = target as usize;
        Ok(self.position as u64)
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
