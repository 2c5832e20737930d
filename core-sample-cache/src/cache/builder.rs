//! Builder wiring the cache to its collaborators.

use super::config::CacheConfig;
use super::manager::AudioFileCache;
use crate::traits::{NullNotifier, PlaybackNotifier, SampleDecoder};
use bridge_traits::ByteSourceProvider;
use core_runtime::error::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Builder for [`AudioFileCache`].
///
/// Byte sources and a decoder are required. With the `desktop-shims` feature
/// the local filesystem is used when no source provider is given, and with a
/// `decoder-*` feature the Symphonia decoder is used when no decoder is
/// given. The playback notifier defaults to [`NullNotifier`].
///
/// # Examples
///
/// ```ignore
/// use core_sample_cache::{AudioFileCache, CacheConfig};
///
/// let cache = AudioFileCache::builder()
///     .config(CacheConfig::new().with_max_size(8 * 1024 * 1024))
///     .notifier(engine.clone())
///     .build()?;
/// # Ok::<(), core_runtime::Error>(())
/// ```
#[derive(Default)]
pub struct AudioFileCacheBuilder {
    config: Option<CacheConfig>,
    sources: Option<Arc<dyn ByteSourceProvider>>,
    decoder: Option<Arc<dyn SampleDecoder>>,
    notifier: Option<Arc<dyn PlaybackNotifier>>,
}

impl AudioFileCacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Provider used to open sample files by identifier.
    pub fn source_provider(mut self, sources: Arc<dyn ByteSourceProvider>) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Read samples from files under `root`.
    #[cfg(feature = "desktop-shims")]
    pub fn source_root<P: Into<std::path::PathBuf>>(self, root: P) -> Self {
        self.source_provider(Arc::new(bridge_desktop::LocalFileSystem::with_root(root)))
    }

    pub fn decoder(mut self, decoder: Arc<dyn SampleDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Playback engine told about evictions of samples still in use.
    pub fn notifier(mut self, notifier: Arc<dyn PlaybackNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the cache.
    ///
    /// # Returns
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - No source provider or decoder is given and no default is compiled in
    pub fn build(self) -> Result<AudioFileCache> {
        let config = self.config.unwrap_or_default();
        config.validate().map_err(Error::Config)?;

        let sources = match self.sources {
            Some(sources) => sources,
            None => provide_default_sources()?,
        };

        let decoder = match self.decoder {
            Some(decoder) => decoder,
            None => provide_default_decoder(&config)?,
        };

        let notifier = self.notifier.unwrap_or_else(|| {
            debug!("No playback notifier given; evictions will not stop voices");
            Arc::new(NullNotifier)
        });

        Ok(AudioFileCache::new(config, sources, decoder, notifier))
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_sources() -> Result<Arc<dyn ByteSourceProvider>> {
    use bridge_desktop::LocalFileSystem;

    let sources: Arc<dyn ByteSourceProvider> = Arc::new(LocalFileSystem::new());
    Ok(sources)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_sources() -> Result<Arc<dyn ByteSourceProvider>> {
    Err(Error::capability_missing(
        "ByteSourceProvider",
        "A ByteSourceProvider is required to open sample files. \
         Desktop: enable the 'desktop-shims' feature to read from the local filesystem. \
         Other hosts: inject a provider over archives or bundled assets.",
    ))
}

#[cfg(feature = "core-decoder")]
fn provide_default_decoder(config: &CacheConfig) -> Result<Arc<dyn SampleDecoder>> {
    use crate::decoder::SymphoniaDecoder;

    let decoder: Arc<dyn SampleDecoder> =
        Arc::new(SymphoniaDecoder::new().with_read_chunk_bytes(config.read_chunk_bytes));
    Ok(decoder)
}

#[cfg(not(feature = "core-decoder"))]
fn provide_default_decoder(_config: &CacheConfig) -> Result<Arc<dyn SampleDecoder>> {
    Err(Error::capability_missing(
        "SampleDecoder",
        "A SampleDecoder is required to decode samples. \
         Enable one of the 'decoder-*' features or inject a decoder.",
    ))
}
