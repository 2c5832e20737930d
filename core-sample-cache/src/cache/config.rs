//! Cache configuration and policies

use serde::{Deserialize, Serialize};

/// Default byte budget for decoded samples (16 MiB).
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 16 * 1024 * 1024;

/// Default read size when pulling an encoded file into memory (64 KiB).
pub const DEFAULT_READ_CHUNK_BYTES: usize = 64 * 1024;

/// Configuration for the audio file cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Byte budget for all cached buffers (default: 16 MiB)
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,

    /// When evictions planned during admission are applied
    #[serde(default)]
    pub eviction_commit: EvictionCommit,

    /// Chunk size used by the built-in decoder when reading sources
    #[serde(default = "default_read_chunk_bytes")]
    pub read_chunk_bytes: usize,
}

fn default_max_size_bytes() -> u64 {
    DEFAULT_MAX_SIZE_BYTES
}

fn default_read_chunk_bytes() -> usize {
    DEFAULT_READ_CHUNK_BYTES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            eviction_commit: EvictionCommit::default(),
            read_chunk_bytes: DEFAULT_READ_CHUNK_BYTES,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte budget.
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size_bytes = bytes;
        self
    }

    /// Set the eviction commit mode.
    pub fn with_eviction_commit(mut self, commit: EvictionCommit) -> Self {
        self.eviction_commit = commit;
        self
    }

    /// Set the decoder read chunk size.
    pub fn with_read_chunk_bytes(mut self, bytes: usize) -> Self {
        self.read_chunk_bytes = bytes;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_size_bytes == 0 {
            return Err("max_size_bytes must be greater than 0".to_string());
        }

        if self.read_chunk_bytes == 0 {
            return Err("read_chunk_bytes must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// When the evictions planned for one admission are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionCommit {
    /// Idle entries are freed as soon as they are found; active entries only
    /// when the whole request can be satisfied. A failed admission may still
    /// have freed idle entries.
    #[default]
    PerPhase,

    /// Nothing is freed unless idle and lower-priority entries together cover
    /// the request.
    AllOrNothing,
}

impl EvictionCommit {
    /// Returns a human-readable description of the mode.
    pub fn description(&self) -> &'static str {
        match self {
            EvictionCommit::PerPhase => "Free idle samples immediately, active samples only on success",
            EvictionCommit::AllOrNothing => "Free nothing unless the admission succeeds",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.max_size_bytes, 16 * 1024 * 1024);
        assert_eq!(config.eviction_commit, EvictionCommit::PerPhase);
        assert_eq!(config.read_chunk_bytes, 64 * 1024);
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::new()
            .with_max_size(1000)
            .with_eviction_commit(EvictionCommit::AllOrNothing)
            .with_read_chunk_bytes(4096);

        assert_eq!(config.max_size_bytes, 1000);
        assert_eq!(config.eviction_commit, EvictionCommit::AllOrNothing);
        assert_eq!(config.read_chunk_bytes, 4096);
    }

    #[test]
    fn test_config_validation() {
        assert!(CacheConfig::default().validate().is_ok());
        assert!(CacheConfig::default().with_max_size(0).validate().is_err());
        assert!(CacheConfig::default()
            .with_read_chunk_bytes(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: CacheConfig =
            serde_json::from_str(r#"{ "eviction_commit": "all_or_nothing" }"#).unwrap();

        assert_eq!(config.max_size_bytes, DEFAULT_MAX_SIZE_BYTES);
        assert_eq!(config.eviction_commit, EvictionCommit::AllOrNothing);
    }

    #[test]
    fn test_commit_descriptions() {
        assert!(!EvictionCommit::PerPhase.description().is_empty());
        assert!(!EvictionCommit::AllOrNothing.description().is_empty());
    }
}
