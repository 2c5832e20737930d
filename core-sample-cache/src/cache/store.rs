//! Keyed storage of cached samples with a running byte total.

use super::entry::{CacheEntry, SampleHandle};
use crate::error::{Result, SampleCacheError};
use std::collections::{BTreeMap, HashMap};

/// Cached samples ordered by identifier.
///
/// `total_bytes` always equals the sum of `byte_size` over all entries; it is
/// only changed by [`insert`](Self::insert) and [`remove`](Self::remove).
/// Eviction scans run in identifier order.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: BTreeMap<String, CacheEntry>,
    by_buffer: HashMap<usize, String>,
    total_bytes: u64,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, identifier: &str) -> Option<&CacheEntry> {
        self.entries.get(identifier)
    }

    pub(crate) fn lookup_mut(&mut self, identifier: &str) -> Option<&mut CacheEntry> {
        self.entries.get_mut(identifier)
    }

    /// Identifier of the entry owning `handle`'s buffer.
    pub fn identifier_for(&self, handle: &SampleHandle) -> Option<&str> {
        self.by_buffer
            .get(&handle.buffer_id())
            .map(String::as_str)
            .filter(|id| {
                self.entries
                    .get(*id)
                    .is_some_and(|entry| entry.handle() == handle)
            })
    }

    /// Add a new entry. Identifiers are unique.
    pub fn insert(&mut self, identifier: String, entry: CacheEntry) -> Result<()> {
        if self.entries.contains_key(&identifier) {
            return Err(SampleCacheError::EntryExists(identifier));
        }

        self.total_bytes += entry.byte_size();
        self.by_buffer
            .insert(entry.handle().buffer_id(), identifier.clone());
        self.entries.insert(identifier, entry);
        Ok(())
    }

    pub fn remove(&mut self, identifier: &str) -> Result<CacheEntry> {
        let entry = self
            .entries
            .remove(identifier)
            .ok_or_else(|| SampleCacheError::EntryNotFound(identifier.to_string()))?;

        self.total_bytes -= entry.byte_size();
        self.by_buffer.remove(&entry.handle().buffer_id());
        Ok(entry)
    }

    /// Entries in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Remove every entry, in scan order.
    pub(crate) fn drain(&mut self) -> Vec<(String, CacheEntry)> {
        self.by_buffer.clear();
        self.total_bytes = 0;
        std::mem::take(&mut self.entries).into_iter().collect()
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
