//! Fixtures shared by the cache integration tests.
//!
//! Fake sources hold `[channels, payload...]`; the fake decoder turns that
//! into 16-bit PCM of the same payload, so a sample's cached size is always
//! `WAV_HEADER_LEN + payload`.

#![allow(dead_code)]

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{BridgeError, ByteSource, ByteSourceProvider, MemorySource};
use core_sample_cache::{
    AudioFileCache, CacheConfig, DecodeSession, NullNotifier, PcmBuffer, PlaybackNotifier,
    Result, SampleCacheError, SampleDecoder, SampleHandle, WAV_HEADER_LEN,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::SeekFrom;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::subscriber::Subscriber;
use tracing::Level;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Open/close tallies for sources and decode sessions.
#[derive(Debug, Default)]
pub struct ResourceCounters {
    pub sources_opened: AtomicUsize,
    pub sources_closed: AtomicUsize,
    pub sessions_opened: AtomicUsize,
    pub sessions_closed: AtomicUsize,
}

impl ResourceCounters {
    pub fn sources_opened(&self) -> usize {
        self.sources_opened.load(Ordering::SeqCst)
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    /// Everything opened has been closed exactly once.
    pub fn assert_balanced(&self) {
        assert_eq!(
            self.sources_opened.load(Ordering::SeqCst),
            self.sources_closed.load(Ordering::SeqCst),
            "every byte source must be closed"
        );
        assert_eq!(
            self.sessions_opened.load(Ordering::SeqCst),
            self.sessions_closed.load(Ordering::SeqCst),
            "every decode session must be closed"
        );
    }
}

/// In-memory asset store.
#[derive(Default)]
pub struct FakeSources {
    files: Mutex<HashMap<String, Vec<u8>>>,
    counters: Arc<ResourceCounters>,
}

impl FakeSources {
    pub fn new(counters: Arc<ResourceCounters>) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            counters,
        }
    }

    /// Add a sample that caches to exactly `cached_size` bytes.
    pub fn add_sample(&self, identifier: &str, channels: u8, cached_size: usize) {
        assert!(cached_size >= WAV_HEADER_LEN);
        let mut data = vec![channels];
        data.resize(1 + cached_size - WAV_HEADER_LEN, 0x11);
        self.files.lock().insert(identifier.to_string(), data);
    }
}

impl ByteSourceProvider for FakeSources {
    fn open(&self, identifier: &str) -> BridgeResult<Box<dyn ByteSource>> {
        let data = self
            .files
            .lock()
            .get(identifier)
            .cloned()
            .ok_or_else(|| BridgeError::NotFound(identifier.to_string()))?;

        self.counters.sources_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSource {
            inner: MemorySource::new(data),
            counters: self.counters.clone(),
        }))
    }

    fn exists(&self, identifier: &str) -> bool {
        self.files.lock().contains_key(identifier)
    }
}

struct CountingSource {
    inner: MemorySource,
    counters: Arc<ResourceCounters>,
}

impl ByteSource for CountingSource {
    fn read(&mut self, buf: &mut [u8]) -> BridgeResult<usize> {
        self.inner.read(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> BridgeResult<u64> {
        self.inner.seek(pos)
    }

    fn len(&self) -> Option<u64> {
        self.inner.len()
    }

    fn close(&mut self) {
        if !self.inner.is_closed() {
            self.inner.close();
            self.counters.sources_closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Decoder for [`FakeSources`] data.
///
/// Identifiers containing `unsupported` fail to open, as do `multitrack`
/// (two streams) and `notrack` (no stream). Identifiers containing `corrupt`
/// fail during decode.
pub struct FakeDecoder {
    counters: Arc<ResourceCounters>,
}

impl FakeDecoder {
    pub fn new(counters: Arc<ResourceCounters>) -> Self {
        Self { counters }
    }
}

impl SampleDecoder for FakeDecoder {
    fn open<'a>(
        &self,
        source: &'a mut dyn ByteSource,
        identifier: &str,
    ) -> Result<Box<dyn DecodeSession + 'a>> {
        if identifier.contains("unsupported") {
            return Err(SampleCacheError::UnsupportedCodec("fake".to_string()));
        }
        if identifier.contains("multitrack") {
            return Err(SampleCacheError::StreamCountMismatch(2));
        }
        if identifier.contains("notrack") {
            return Err(SampleCacheError::StreamCountMismatch(0));
        }

        self.counters.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            source,
            corrupt: identifier.contains("corrupt"),
            closed: false,
            counters: self.counters.clone(),
        }))
    }
}

struct FakeSession<'a> {
    source: &'a mut dyn ByteSource,
    corrupt: bool,
    closed: bool,
    counters: Arc<ResourceCounters>,
}

impl DecodeSession for FakeSession<'_> {
    fn run(&mut self) -> Result<PcmBuffer> {
        let mut data = Vec::new();
        let mut chunk = [0u8; 256];
        loop {
            let read = self.source.read(&mut chunk)?;
            if read == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..read]);
        }

        if self.corrupt {
            return Err(SampleCacheError::DecodeFailed("fake corruption".to_string()));
        }

        let (channels, payload) = data
            .split_first()
            .ok_or_else(|| SampleCacheError::DecodeFailed("empty source".to_string()))?;
        Ok(PcmBuffer::new(payload.to_vec(), *channels as u16, 22050, 16))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.counters.sessions_closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// A cache over fake collaborators.
pub struct Harness {
    pub cache: AudioFileCache,
    pub sources: Arc<FakeSources>,
    pub counters: Arc<ResourceCounters>,
}

impl Harness {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_notifier(config, Arc::new(NullNotifier))
    }

    pub fn with_notifier(config: CacheConfig, notifier: Arc<dyn PlaybackNotifier>) -> Self {
        let counters = Arc::new(ResourceCounters::default());
        let sources = Arc::new(FakeSources::new(counters.clone()));
        let cache = AudioFileCache::builder()
            .config(config)
            .source_provider(sources.clone())
            .decoder(Arc::new(FakeDecoder::new(counters.clone())))
            .notifier(notifier)
            .build()
            .expect("cache should build");

        Self {
            cache,
            sources,
            counters,
        }
    }
}

/// Notifier recording every handle it is asked to stop.
#[derive(Default)]
pub struct RecordingNotifier {
    pub released: Mutex<Vec<SampleHandle>>,
}

impl PlaybackNotifier for RecordingNotifier {
    fn release_sample(&self, handle: &SampleHandle) {
        self.released.lock().push(handle.clone());
    }
}

/// Tracing layer recording the level of every event.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    pub levels: Arc<Mutex<Vec<Level>>>,
}

impl CaptureLayer {
    pub fn count(&self, level: Level) -> usize {
        self.levels.lock().iter().filter(|l| **l == level).count()
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.levels.lock().push(*event.metadata().level());
    }
}

/// Run `f` with events captured, returning the layer for inspection.
pub fn capture_logs<F: FnOnce()>(f: F) -> CaptureLayer {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, f);
    layer
}
