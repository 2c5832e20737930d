//! # Audio Decoder Module
//!
//! Whole-file decoding to 16-bit PCM using the Symphonia library.
//!
//! ## Supported Formats
//!
//! | Format | Codec | Feature Flag |
//! |--------|-------|--------------|
//! | WAV | PCM | `decoder-wav` |
//! | WAV | IMA / MS ADPCM | `decoder-adpcm` |
//! | MP3 | MPEG-1/2 Audio Layer III | `decoder-mp3` |
//! | Vorbis | Ogg Vorbis | `decoder-vorbis` |
//! | FLAC | Free Lossless Audio Codec | `decoder-flac` |
//!
//! ## Architecture
//!
//! ```text
//! ByteSource → chunked read → MediaSourceStream → FormatReader → Decoder → PcmBuffer
//! ```
//!
//! The encoded file is read fully into memory before probing; sound effect
//! files are small and the cache keeps only the decoded result.
//!
//! ## Output
//!
//! Every session produces interleaved signed 16-bit little-endian samples at
//! the stream's native rate and channel count.

mod format_detector;
mod sample_converter;
mod symphonia;

pub use self::symphonia::{SymphoniaDecoder, SymphoniaSession};
pub use format_detector::FormatDetector;
pub use sample_converter::SampleConverter;
