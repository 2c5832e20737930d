//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `ByteSourceProvider` using `std::fs`, rooted at an asset directory
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::LocalFileSystem;
//! use std::sync::Arc;
//!
//! let assets = Arc::new(LocalFileSystem::with_root("/opt/game/data/audio"));
//! // Hand `assets` to the sample cache builder as its source provider.
//! ```

mod filesystem;

pub use filesystem::{FileByteSource, LocalFileSystem};
