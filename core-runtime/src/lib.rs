//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the sample cache:
//! - Logging and tracing infrastructure
//! - Shared configuration and capability errors
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other crates depend on.
//! It establishes the logging conventions used throughout the workspace and
//! the error type reported when a host forgets to supply a capability.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
