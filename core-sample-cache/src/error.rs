//! # Sample Cache Error Types
//!
//! Error types for opening, decoding and caching audio samples.
//!
//! None of these errors is fatal to the process. A failed open means no
//! playable audio for that request, and the `Option`-returning entry points on
//! [`AudioFileCache`](crate::cache::AudioFileCache) reduce every error to `None`
//! plus a diagnostic graded by [`SampleCacheError::severity`].

use bridge_traits::BridgeError;
use thiserror::Error;

/// How loudly a failed open should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Expected outcome (no resource was requested); not logged.
    Silent,
    /// Missing resource or exhausted budget; logged at `warn`.
    Warning,
    /// Codec or format violation; logged at `error`.
    Error,
}

/// Errors that can occur while opening or caching a sample.
#[derive(Error, Debug)]
pub enum SampleCacheError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The request named no resource (empty identifier or finished sound).
    #[error("No resource requested")]
    NoResource,

    /// The byte source provider has no resource with this identifier.
    #[error("Missing audio file '{0}'")]
    ResourceNotFound(String),

    /// The byte source failed while being opened or read.
    #[error("Audio source error: {0}")]
    Source(#[from] BridgeError),

    // ========================================================================
    // Format/Codec Errors
    // ========================================================================
    /// The decoder could not initialise its demuxer or codec context.
    #[error("Failed to initialise decoder: {0}")]
    CodecInitFailed(String),

    /// No decoder is available for the stream's codec.
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// The source must contain exactly one audio stream.
    #[error("Expected exactly one audio stream, found {0}")]
    StreamCountMismatch(usize),

    // ========================================================================
    // Decoding Errors
    // ========================================================================
    /// Decoding failed part way through the stream.
    #[error("Decoding failed: {0}")]
    DecodeFailed(String),

    /// Positional sounds must be mono.
    #[error("Positional audio cannot have {channels} channels")]
    UnsupportedChannelLayout { channels: u16 },

    /// The decoded payload does not fit the 32-bit WAV length fields.
    #[error("Decoded payload too large: {0} bytes")]
    PayloadTooLarge(u64),

    // ========================================================================
    // Cache Errors
    // ========================================================================
    /// Eviction could not free enough space to admit the sample.
    #[error("Cache full: needed {required} bytes, could free {freed}")]
    CacheFull { required: u64, freed: u64 },

    /// An entry with this identifier is already resident.
    #[error("Cache entry already exists: {0}")]
    EntryExists(String),

    /// No entry with this identifier is resident.
    #[error("Cache entry not found: {0}")]
    EntryNotFound(String),
}

impl SampleCacheError {
    /// Severity used when this error is reported at the open boundary.
    pub fn severity(&self) -> Severity {
        match self {
            SampleCacheError::NoResource => Severity::Silent,
            SampleCacheError::ResourceNotFound(_)
            | SampleCacheError::Source(_)
            | SampleCacheError::DecodeFailed(_)
            | SampleCacheError::CacheFull { .. } => Severity::Warning,
            SampleCacheError::CodecInitFailed(_)
            | SampleCacheError::UnsupportedCodec(_)
            | SampleCacheError::StreamCountMismatch(_)
            | SampleCacheError::UnsupportedChannelLayout { .. }
            | SampleCacheError::PayloadTooLarge(_)
            | SampleCacheError::EntryExists(_)
            | SampleCacheError::EntryNotFound(_) => Severity::Error,
        }
    }

    /// Returns `true` if this error is related to audio format/codec issues.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            SampleCacheError::CodecInitFailed(_)
                | SampleCacheError::UnsupportedCodec(_)
                | SampleCacheError::StreamCountMismatch(_)
                | SampleCacheError::UnsupportedChannelLayout { .. }
        )
    }

    /// Returns `true` if the sample decoded but could not be kept.
    pub fn is_capacity_error(&self) -> bool {
        matches!(
            self,
            SampleCacheError::CacheFull { .. } | SampleCacheError::PayloadTooLarge(_)
        )
    }
}

/// Result type for sample cache operations.
pub type Result<T> = std::result::Result<T, SampleCacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_grading() {
        assert_eq!(SampleCacheError::NoResource.severity(), Severity::Silent);
        assert_eq!(
            SampleCacheError::ResourceNotFound("a.wav".into()).severity(),
            Severity::Warning
        );
        assert_eq!(
            SampleCacheError::CacheFull { required: 10, freed: 2 }.severity(),
            Severity::Warning
        );
        assert_eq!(
            SampleCacheError::UnsupportedChannelLayout { channels: 2 }.severity(),
            Severity::Error
        );
        assert_eq!(
            SampleCacheError::StreamCountMismatch(2).severity(),
            Severity::Error
        );
    }

    #[test]
    fn test_classification() {
        assert!(SampleCacheError::UnsupportedCodec("xyz".into()).is_format_error());
        assert!(!SampleCacheError::DecodeFailed("eof".into()).is_format_error());
        assert!(SampleCacheError::CacheFull { required: 1, freed: 0 }.is_capacity_error());
        assert!(!SampleCacheError::NoResource.is_capacity_error());
    }

    #[test]
    fn test_bridge_error_conversion() {
        let err: SampleCacheError = BridgeError::OperationFailed("disk gone".into()).into();
        assert!(matches!(err, SampleCacheError::Source(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
