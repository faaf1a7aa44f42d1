use std::io;
use std::path::{Path, PathBuf};

use crate::{AcquireError, AudioFormat, SynthesisResult};

/// Directory of cached artifacts, one `<slug>.<ext>` file per utterance.
///
/// Append-only: files are checked for existence and written once. Two
/// writers racing on the same slug write the same content.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
    extension: &'static str,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>, format: AudioFormat) -> Self {
        Self {
            dir: dir.into(),
            extension: format.extension(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &'static str {
        self.extension
    }

    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.{}", self.extension))
    }

    pub async fn exists(&self, slug: &str) -> bool {
        tokio::fs::try_exists(self.path_for(slug))
            .await
            .unwrap_or(false)
    }

    /// Write already-encoded file bytes.
    pub async fn save(&self, slug: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(slug);
        tokio::fs::write(&path, bytes).await?;
        log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Encode and write a synthesis result.
    pub async fn save_result(
        &self,
        slug: &str,
        result: &SynthesisResult,
    ) -> Result<PathBuf, AcquireError> {
        let bytes = result.to_file_bytes()?;
        Ok(self.save(slug, &bytes).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::LocalStore;
    use crate::{AudioFormat, SynthesisResult};

    #[tokio::test]
    async fn save_then_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("sance"), AudioFormat::OggVorbis);

        assert!(!store.exists("coi").await);
        let path = store.save("coi", b"OggS").await.unwrap();
        assert_eq!(path, dir.path().join("sance").join("coi.ogg"));
        assert!(store.exists("coi").await);
        assert_eq!(std::fs::read(path).unwrap(), b"OggS");
    }

    #[tokio::test]
    async fn rewriting_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path(), AudioFormat::Mp3);
        store.save("mi", b"ID3").await.unwrap();
        store.save("mi", b"ID3").await.unwrap();
        assert_eq!(std::fs::read(store.path_for("mi")).unwrap(), b"ID3");
    }

    #[tokio::test]
    async fn pcm_results_are_stored_as_wav() {
        let dir = tempfile::tempdir().unwrap();
        let format = AudioFormat::Pcm { sample_rate: 16_000 };
        let store = LocalStore::new(dir.path(), format);
        let result = SynthesisResult {
            audio: vec![0; 320],
            format,
        };
        let path = store.save_result("do", &result).await.unwrap();
        assert_eq!(path.extension().unwrap(), "wav");
        assert_eq!(&std::fs::read(path).unwrap()[0..4], b"RIFF");
    }
}
