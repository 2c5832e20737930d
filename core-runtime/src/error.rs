//! Runtime errors raised while wiring up logging and cache collaborators.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value or a subsystem that refused to start.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required host capability was neither injected nor provided by a
    /// platform feature.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },
}

impl Error {
    pub fn capability_missing(capability: &str, message: impl Into<String>) -> Self {
        Error::CapabilityMissing {
            capability: capability.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
