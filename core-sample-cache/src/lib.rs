//! # Audio Sample Cache
//!
//! In-memory cache of decoded sound effect and speech samples.
//!
//! ## Overview
//!
//! This crate handles:
//! - Decoding sample files to 16-bit PCM WAV buffers (Symphonia, feature-gated)
//! - Reference counting of open samples
//! - A byte budget with two-phase, priority-aware eviction
//! - Stopping playback of samples evicted while still in use
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use core_sample_cache::{AudioFileCache, CacheConfig};
//!
//! let cache = AudioFileCache::builder()
//!     .config(CacheConfig::new().with_max_size(4 * 1024 * 1024))
//!     .source_root("data/audio")
//!     .build()?;
//!
//! let sample = cache.open("sounds/gun.wav").expect("sample");
//! let header = sample.header().expect("wav header");
//! println!("{} Hz, {} channels", header.sample_rate, header.channels);
//! cache.close(&sample);
//! ```
//!
//! ## Feature Flags
//!
//! - `decoder-*` / `decoder-all`: Symphonia decoder and its formats
//! - `desktop-shims`: read samples from the local filesystem by default

pub mod cache;
#[cfg(feature = "core-decoder")]
pub mod decoder;
pub mod error;
pub mod request;
pub mod traits;
pub mod wav;

pub use cache::{
    AudioFileCache, AudioFileCacheBuilder, CacheConfig, CacheStats, EvictionCommit, SampleHandle,
};
pub use error::{Result, SampleCacheError, Severity};
pub use request::{AudioPriority, PlayPortion, SoundRequest};
pub use traits::{DecodeSession, NullNotifier, PcmBuffer, PlaybackNotifier, SampleDecoder};
pub use wav::{WavHeader, WAV_HEADER_LEN};

#[cfg(feature = "core-decoder")]
pub use decoder::{FormatDetector, SampleConverter, SymphoniaDecoder};
