//! Audio file cache manager.
//!
//! All operations run under one lock, including decoding, so the store and
//! its byte total are never observed mid-update. Decode sessions and byte
//! sources are closed on every exit path through drop guards.
//!
//! Playback of evicted samples is stopped after the lock is released, so a
//! [`PlaybackNotifier`] may close handles from inside its callback.

use super::builder::AudioFileCacheBuilder;
use super::config::CacheConfig;
use super::entry::{CacheEntry, SampleHandle};
use super::eviction::Evictor;
use super::stats::{CacheCounters, CacheStats};
use super::store::CacheStore;
use crate::error::{Result, SampleCacheError, Severity};
use crate::request::{AudioPriority, SoundRequest};
use crate::traits::{DecodeSession, PlaybackNotifier, SampleDecoder};
use crate::wav;
use bridge_traits::{ByteSource, ByteSourceProvider};
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

struct CacheState {
    store: CacheStore,
    config: CacheConfig,
    counters: CacheCounters,
}

/// Reference-counted cache of decoded audio samples under a byte budget.
///
/// Opening an identifier returns a [`SampleHandle`] to a WAV buffer and takes
/// one reference; every successful open must be paired with one
/// [`close`](Self::close). Samples nobody references stay cached until space
/// is needed.
pub struct AudioFileCache {
    state: Mutex<CacheState>,
    sources: Arc<dyn ByteSourceProvider>,
    decoder: Arc<dyn SampleDecoder>,
    notifier: Arc<dyn PlaybackNotifier>,
}

impl AudioFileCache {
    /// Create a cache from explicit collaborators.
    pub fn new(
        config: CacheConfig,
        sources: Arc<dyn ByteSourceProvider>,
        decoder: Arc<dyn SampleDecoder>,
        notifier: Arc<dyn PlaybackNotifier>,
    ) -> Self {
        info!(
            max_size_bytes = config.max_size_bytes,
            commit = ?config.eviction_commit,
            "Creating audio file cache"
        );

        Self {
            state: Mutex::new(CacheState {
                store: CacheStore::new(),
                config,
                counters: CacheCounters::default(),
            }),
            sources,
            decoder,
            notifier,
        }
    }

    pub fn builder() -> AudioFileCacheBuilder {
        AudioFileCacheBuilder::new()
    }

    /// Open a sample by identifier at the lowest priority.
    ///
    /// An empty identifier yields [`SampleCacheError::NoResource`] without
    /// touching the cache.
    #[instrument(skip(self))]
    pub fn try_open(&self, identifier: &str) -> Result<SampleHandle> {
        if identifier.is_empty() {
            return Err(SampleCacheError::NoResource);
        }

        let mut stopped = Vec::new();
        let result = {
            let mut state = self.state.lock();
            self.open_locked(
                &mut state,
                identifier,
                AudioPriority::Lowest,
                false,
                &mut stopped,
            )
        };
        self.stop_playback(&stopped);
        result
    }

    /// Open the segment of `request` selected by its play portion.
    #[instrument(skip(self, request), fields(portion = ?request.portion, priority = ?request.priority))]
    pub fn try_open_request(&self, request: &SoundRequest) -> Result<SampleHandle> {
        let identifier = match request.current_identifier() {
            Some(id) if !id.is_empty() => id,
            _ => return Err(SampleCacheError::NoResource),
        };

        let mut stopped = Vec::new();
        let result = {
            let mut state = self.state.lock();
            self.open_locked(
                &mut state,
                identifier,
                request.priority,
                request.positional,
                &mut stopped,
            )
        };
        self.stop_playback(&stopped);
        result
    }

    /// Like [`try_open`](Self::try_open), logging failures instead of
    /// returning them.
    pub fn open(&self, identifier: &str) -> Option<SampleHandle> {
        self.try_open(identifier)
            .map_err(|e| report_open_failure(identifier, &e))
            .ok()
    }

    /// Like [`try_open_request`](Self::try_open_request), logging failures
    /// instead of returning them.
    pub fn open_request(&self, request: &SoundRequest) -> Option<SampleHandle> {
        self.try_open_request(request)
            .map_err(|e| report_open_failure(request.current_identifier().unwrap_or(""), &e))
            .ok()
    }

    /// Give back one reference taken by an open.
    ///
    /// Returns false if the handle no longer belongs to a cached sample or
    /// holds no references; the cache is left unchanged in that case.
    #[instrument(skip(self))]
    pub fn close(&self, handle: &SampleHandle) -> bool {
        let mut state = self.state.lock();

        let Some(identifier) = state.store.identifier_for(handle).map(str::to_string) else {
            debug!("Ignoring close of a sample that is no longer cached");
            return false;
        };

        let Some(entry) = state.store.lookup_mut(&identifier) else {
            return false;
        };

        if !entry.release() {
            debug!(identifier = %identifier, "Ignoring close of an unreferenced sample");
            return false;
        }

        trace!(
            identifier = %identifier,
            references = entry.reference_count(),
            "Closed sample"
        );
        true
    }

    /// Change the byte budget. Nothing is evicted until the next admission
    /// or trim.
    ///
    /// A budget of 0 admits nothing: every later miss is rejected with
    /// [`SampleCacheError::CacheFull`] while cache hits keep working. Use
    /// [`CacheConfig::validate`] to refuse such a budget up front.
    pub fn set_max_size(&self, bytes: u64) {
        let mut state = self.state.lock();
        info!(
            old = state.config.max_size_bytes,
            new = bytes,
            "Changing audio cache budget"
        );
        state.config.max_size_bytes = bytes;
    }

    pub fn max_size(&self) -> u64 {
        self.state.lock().config.max_size_bytes
    }

    /// Free unreferenced samples until `required` bytes are freed.
    /// `required == 0` frees every unreferenced sample.
    ///
    /// Returns the bytes actually freed, which may be less than requested.
    #[instrument(skip(self))]
    pub fn trim(&self, required: u64) -> u64 {
        let mut state = self.state.lock();
        let evictor = Evictor::new(state.config.eviction_commit);
        let outcome = evictor.free_idle(&mut state.store, required);
        state.counters.evictions += outcome.evicted as u64;
        drop(state);

        debug!(
            evicted = outcome.evicted,
            freed_bytes = outcome.freed_bytes,
            "Trimmed audio cache"
        );
        outcome.freed_bytes
    }

    pub fn total_bytes(&self) -> u64 {
        self.state.lock().store.total_bytes()
    }

    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().store.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.state.lock().store.lookup(identifier).is_some()
    }

    /// Outstanding references for a cached identifier.
    pub fn reference_count(&self, identifier: &str) -> Option<u32> {
        self.state
            .lock()
            .store
            .lookup(identifier)
            .map(CacheEntry::reference_count)
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = CacheStats {
            total_bytes: state.store.total_bytes(),
            max_size_bytes: state.config.max_size_bytes,
            hits: state.counters.hits,
            misses: state.counters.misses,
            evictions: state.counters.evictions,
            rejected_admissions: state.counters.rejected_admissions,
            ..Default::default()
        };

        for (_, entry) in state.store.iter() {
            stats.entries += 1;
            if entry.is_idle() {
                stats.idle_entries += 1;
                stats.idle_bytes += entry.byte_size();
            } else {
                stats.active_entries += 1;
            }
        }

        stats
    }

    fn open_locked(
        &self,
        state: &mut CacheState,
        identifier: &str,
        priority: AudioPriority,
        positional: bool,
        stopped: &mut Vec<SampleHandle>,
    ) -> Result<SampleHandle> {
        if let Some(entry) = state.store.lookup_mut(identifier) {
            entry.acquire();
            state.counters.hits += 1;
            trace!(references = entry.reference_count(), "Cache hit");
            return Ok(entry.handle().clone());
        }

        state.counters.misses += 1;
        let buffer = self.load(identifier, positional)?;
        self.admit(state, identifier, buffer, priority, stopped)
    }

    /// Decode `identifier` into a WAV buffer.
    fn load(&self, identifier: &str, positional: bool) -> Result<Bytes> {
        let source = self.sources.open(identifier).map_err(|e| {
            if e.is_not_found() {
                SampleCacheError::ResourceNotFound(identifier.to_string())
            } else {
                SampleCacheError::Source(e)
            }
        })?;
        let mut source = SourceGuard(source);

        let session = self.decoder.open(source.0.as_mut(), identifier)?;
        let mut session = SessionGuard(session);
        let pcm = session.0.run()?;
        drop(session);
        drop(source);

        debug!(
            channels = pcm.channels,
            sample_rate = pcm.sample_rate,
            bytes = pcm.samples.len(),
            "Decoded sample"
        );

        if positional && pcm.channels > 1 {
            return Err(SampleCacheError::UnsupportedChannelLayout {
                channels: pcm.channels,
            });
        }

        wav::build_wave_buffer(&pcm)
    }

    /// Account for a decoded buffer, evicting to stay within budget.
    fn admit(
        &self,
        state: &mut CacheState,
        identifier: &str,
        buffer: Bytes,
        priority: AudioPriority,
        stopped: &mut Vec<SampleHandle>,
    ) -> Result<SampleHandle> {
        let entry = CacheEntry::new(buffer, priority);
        let pending = state.store.total_bytes() + entry.byte_size();
        let max_size = state.config.max_size_bytes;

        if pending > max_size {
            let required = pending - max_size;
            let evictor = Evictor::new(state.config.eviction_commit);
            let outcome = evictor.free_for_admission(&mut state.store, required, priority);
            state.counters.evictions += outcome.evicted as u64;
            stopped.extend(outcome.stopped);

            if !outcome.satisfied {
                state.counters.rejected_admissions += 1;
                return Err(SampleCacheError::CacheFull {
                    required,
                    freed: outcome.candidate_bytes,
                });
            }
        }

        let handle = entry.handle().clone();
        state.store.insert(identifier.to_string(), entry)?;
        debug!(
            bytes = handle.len(),
            total_bytes = state.store.total_bytes(),
            "Cached sample"
        );
        Ok(handle)
    }

    /// Stop playback of evicted samples. Runs without the cache lock.
    fn stop_playback(&self, stopped: &[SampleHandle]) {
        for handle in stopped {
            debug!(bytes = handle.len(), "Stopping playback of evicted sample");
            self.notifier.release_sample(handle);
        }
    }
}

impl Drop for AudioFileCache {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        let entries = state.store.drain();
        if entries.is_empty() {
            return;
        }

        debug!(entries = entries.len(), "Releasing audio file cache");
        for (identifier, entry) in entries {
            if !entry.is_idle() {
                debug!(identifier = %identifier, "Stopping playback of released sample");
                self.notifier.release_sample(entry.handle());
            }
        }
    }
}

fn report_open_failure(identifier: &str, err: &SampleCacheError) {
    match err.severity() {
        Severity::Silent => {}
        Severity::Warning => warn!(identifier, error = %err, "Could not open audio file"),
        Severity::Error => error!(identifier, error = %err, "Could not open audio file"),
    }
}

struct SourceGuard(Box<dyn ByteSource>);

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

struct SessionGuard<'a>(Box<dyn DecodeSession + 'a>);

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}
