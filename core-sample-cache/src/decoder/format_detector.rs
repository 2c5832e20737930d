//! # Format Detection Module
//!
//! Probe hints and codec naming for Symphonia.

use symphonia::core::codecs::CodecType;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Format detector for sample files.
pub struct FormatDetector;

impl FormatDetector {
    /// Create a probe hint from a sample identifier.
    ///
    /// Identifiers may use either path separator; only the extension of the
    /// last component is used.
    ///
    /// # Example
    ///
    /// ```rust
    /// use core_sample_cache::FormatDetector;
    ///
    /// assert_eq!(FormatDetector::extension("sounds\\Gun.WAV"), Some("wav".to_string()));
    /// let _hint = FormatDetector::hint_from_identifier("sounds\\gun.wav");
    /// ```
    pub fn hint_from_identifier(identifier: &str) -> Hint {
        let mut hint = Hint::new();

        if let Some(extension) = Self::extension(identifier) {
            debug!("Setting probe hint extension: {}", extension);
            hint.with_extension(&extension);
        } else {
            debug!("No file extension found, probe will auto-detect");
        }

        hint
    }

    /// Lowercased extension of the identifier's last path component.
    pub fn extension(identifier: &str) -> Option<String> {
        let name = identifier.rsplit(['/', '\\']).next()?;
        let (stem, extension) = name.rsplit_once('.')?;
        if stem.is_empty() || extension.is_empty() {
            return None;
        }
        Some(extension.to_ascii_lowercase())
    }

    /// Short codec name for diagnostics.
    pub fn codec_name(codec: CodecType) -> String {
        symphonia::default::get_codecs()
            .get_codec(codec)
            .map(|descriptor| descriptor.short_name.to_string())
            .unwrap_or_else(|| format!("{:?}", codec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_identifier() {
        assert_eq!(FormatDetector::extension("gun.wav"), Some("wav".into()));
        assert_eq!(FormatDetector::extension("data/audio/Tank.MP3"), Some("mp3".into()));
        assert_eq!(FormatDetector::extension("data\\audio\\speech.ogg"), Some("ogg".into()));
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(FormatDetector::extension("noextension"), None);
        assert_eq!(FormatDetector::extension("dir.d/noextension"), None);
        assert_eq!(FormatDetector::extension(".hidden"), None);
        assert_eq!(FormatDetector::extension("trailing."), None);
    }

    #[cfg(feature = "decoder-wav")]
    #[test]
    fn test_codec_name() {
        use symphonia::core::codecs::CODEC_TYPE_PCM_S16LE;
        assert_eq!(FormatDetector::codec_name(CODEC_TYPE_PCM_S16LE), "pcm_s16le");
    }
}
