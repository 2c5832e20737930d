//! # Audio File Cache Module
//!
//! Keeps decoded samples in memory so repeated sound events do not decode
//! the same file twice.
//!
//! ## Overview
//!
//! - Samples are keyed by identifier and reference counted per open
//! - Unreferenced samples stay cached until space is needed
//! - A byte budget bounds the sum of all cached buffers
//! - Admission evicts unreferenced samples first, then referenced samples of
//!   strictly lower priority after stopping their playback
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │     AudioFileCache                     │
//! │  - open() / open_request()             │
//! │  - close()                             │
//! │  - trim() / set_max_size()             │
//! └────────┬───────────────────────────────┘
//!          │
//!          ├──> CacheStore (entries + byte total)
//!          ├──> Evictor (two-phase eviction)
//!          ├──> ByteSourceProvider (file access)
//!          ├──> SampleDecoder (PCM decoding)
//!          └──> PlaybackNotifier (stop evicted voices)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sample_cache::{AudioFileCache, AudioPriority, SoundRequest};
//!
//! let cache = AudioFileCache::builder().source_root("data/audio").build()?;
//!
//! let request = SoundRequest::new("explosion.wav").with_priority(AudioPriority::High);
//! if let Some(sample) = cache.open_request(&request) {
//!     play(sample.as_bytes());
//!     cache.close(&sample);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod entry;
pub mod eviction;
pub mod manager;
pub mod stats;
pub mod store;

pub use builder::AudioFileCacheBuilder;
pub use config::{CacheConfig, EvictionCommit};
pub use entry::{CacheEntry, SampleHandle};
pub use eviction::{EvictionOutcome, Evictor};
pub use manager::AudioFileCache;
pub use stats::CacheStats;
pub use store::CacheStore;
