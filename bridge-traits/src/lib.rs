//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the sample cache and
//! platform-specific implementations. Each trait represents a capability the
//! cache requires but that must be implemented differently per platform.
//!
//! ## Traits
//!
//! - [`ByteSource`](storage::ByteSource) - Random-access readable byte stream
//! - [`ByteSourceProvider`](storage::ByteSourceProvider) - Resolves resource names to byte sources
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! | Packed archives | TBD          | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for consistent
//! error handling. Platform implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Report missing resources as `BridgeError::NotFound`
//! - Include error context (e.g., resource names)
//!
//! ## Thread Safety
//!
//! Providers require `Send + Sync` so one instance can be shared by every cache
//! caller. Individual sources are `Send` and used by one caller at a time.

pub mod error;
pub mod storage;

pub use error::BridgeError;
pub use storage::{ByteSource, ByteSourceProvider, MemorySource};
