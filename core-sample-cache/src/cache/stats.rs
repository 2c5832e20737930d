//! Cache statistics and monitoring

use serde::{Deserialize, Serialize};

/// Snapshot of the cache state and lifetime counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cached samples
    pub entries: usize,

    /// Samples with at least one open handle
    pub active_entries: usize,

    /// Samples nobody holds open
    pub idle_entries: usize,

    /// Bytes used by all cached buffers
    pub total_bytes: u64,

    /// Bytes that could be reclaimed without stopping playback
    pub idle_bytes: u64,

    /// Configured byte budget
    pub max_size_bytes: u64,

    /// Opens served from the cache
    pub hits: u64,

    /// Opens that required a decode
    pub misses: u64,

    /// Samples removed to make room or by trimming
    pub evictions: u64,

    /// Admissions refused because space could not be freed
    pub rejected_admissions: u64,
}

impl CacheStats {
    /// Cache usage as a percentage of the budget.
    pub fn usage_percentage(&self) -> f64 {
        if self.max_size_bytes == 0 {
            return 0.0;
        }

        (self.total_bytes as f64 / self.max_size_bytes as f64) * 100.0
    }

    /// Returns true if usage exceeds the budget, which only happens after
    /// the budget was lowered.
    pub fn is_over_budget(&self) -> bool {
        self.total_bytes > self.max_size_bytes
    }

    /// Fraction of opens served without decoding.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }

        self.hits as f64 / lookups as f64
    }

    /// Returns average bytes per sample.
    pub fn average_entry_size(&self) -> u64 {
        if self.entries == 0 {
            0
        } else {
            self.total_bytes / self.entries as u64
        }
    }
}

/// Lifetime counters kept alongside the store.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub rejected_admissions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats() -> CacheStats {
        CacheStats {
            entries: 4,
            active_entries: 1,
            idle_entries: 3,
            total_bytes: 800,
            idle_bytes: 600,
            max_size_bytes: 1000,
            hits: 3,
            misses: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_usage_percentage() {
        let stats = sample_stats();
        assert_eq!(stats.usage_percentage(), 80.0);
        assert!(!stats.is_over_budget());

        let empty = CacheStats::default();
        assert_eq!(empty.usage_percentage(), 0.0);
    }

    #[test]
    fn test_over_budget() {
        let stats = CacheStats {
            max_size_bytes: 500,
            ..sample_stats()
        };
        assert!(stats.is_over_budget());
    }

    #[test]
    fn test_hit_rate_and_average() {
        let stats = sample_stats();
        assert_eq!(stats.hit_rate(), 0.75);
        assert_eq!(stats.average_entry_size(), 200);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
