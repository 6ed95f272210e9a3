//! Audio root configuration
//!
//! The directory holding recording files is passed explicitly into every
//! entry point instead of living in process-global settings. Relative
//! recording paths are resolved against it exactly once, at the boundary,
//! so the inner modules only ever see absolute, existing paths.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Core configuration: where recording files live on disk.
#[derive(Debug, Clone)]
pub struct Config {
    pub audio_dir: PathBuf,
}

impl Config {
    pub fn new(audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
        }
    }

    /// Resolve a recording's relative path against the audio root.
    ///
    /// Fails with [`Error::NotFound`] when the resolved path does not point
    /// at an existing file, so callers can surface a 404-equivalent without
    /// touching the decoder.
    pub fn resolve(&self, relative: &Path) -> Result<PathBuf> {
        let path = self.audio_dir.join(relative);
        if !path.is_file() {
            return Err(Error::NotFound(format!(
                "audio file {} does not exist",
                path.display()
            )));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_missing_file_is_not_found() {
        let config = Config::new("/nonexistent-audio-root");
        let err = config.resolve(Path::new("rec.wav")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_resolve_joins_root_and_relative() {
        let dir = std::env::temp_dir();
        let name = format!("echoslice-config-test-{}.wav", std::process::id());
        let file = dir.join(&name);
        std::fs::write(&file, b"stub").unwrap();

        let config = Config::new(&dir);
        let resolved = config.resolve(Path::new(&name)).unwrap();
        assert_eq!(resolved, file);

        std::fs::remove_file(&file).unwrap();
    }
}
