//! Local filesystem image store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use folio_core::ports::{ImageStore, ImageStoreError};

/// Name-collision retries before giving up.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Writes uploads into a directory that is served under `base_url`.
pub struct LocalImageStore {
    upload_dir: PathBuf,
    base_url: String,
}

impl LocalImageStore {
    /// Create the store, making sure `upload_dir` exists.
    pub async fn new(
        upload_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Result<Self, ImageStoreError> {
        let upload_dir = upload_dir.into();
        fs::create_dir_all(&upload_dir).await.map_err(|e| {
            ImageStoreError::Directory(format!("{}: {}", upload_dir.display(), e))
        })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::info!(dir = %upload_dir.display(), base_url = %base_url, "Image store ready");

        Ok(Self {
            upload_dir,
            base_url,
        })
    }

    /// Lowercased extension of `filename` with its dot, or empty when the
    /// extension is missing or not plain ASCII alphanumeric.
    fn extension(filename: &str) -> String {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default()
    }

    fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url, filename)
    }
}

/// Write `content` into `file`. On failure the file at `path` is deleted.
async fn write_or_discard(file: &mut File, path: &Path, content: &[u8]) -> Result<(), ImageStoreError> {
    let written = async {
        file.write_all(content).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path).await {
            tracing::warn!(file = %path.display(), error = %cleanup, "Failed to remove partial upload");
        }
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, content: &[u8], original_filename: &str) -> Result<String, ImageStoreError> {
        let ext = Self::extension(original_filename);
        let stamp = Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_else(|| Utc::now().timestamp_micros());

        let mut attempt = 0;
        let (mut file, filename, path) = loop {
            let filename = format!("{}{}", stamp + attempt, ext);
            let path = self.upload_dir.join(&filename);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (file, filename, path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt + 1 < MAX_NAME_ATTEMPTS => {
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        write_or_discard(&mut file, &path, content).await?;

        tracing::debug!(file = %filename, bytes = content.len(), "Saved image");
        Ok(self.url_for(&filename))
    }

    async fn remove(&self, url: &str) -> Result<(), ImageStoreError> {
        let filename = url
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| ImageStoreError::UnknownUrl(url.to_string()))?;

        fs::remove_file(self.upload_dir.join(filename)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("folio-images-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn extension_is_sanitized() {
        assert_eq!(LocalImageStore::extension("photo.JPG"), ".jpg");
        assert_eq!(LocalImageStore::extension("archive.tar.gz"), ".gz");
        assert_eq!(LocalImageStore::extension("noext"), "");
        assert_eq!(LocalImageStore::extension("weird.p$p"), "");
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let dir = temp_dir();
        let store = LocalImageStore::new(&dir, "/images/").await.unwrap();

        let url = store.store(b"image-bytes", "cover.PNG").await.unwrap();

        let filename = url.strip_prefix("/images/").unwrap();
        assert!(filename.ends_with(".png"));
        assert!(filename.trim_end_matches(".png").chars().all(|c| c.is_ascii_digit()));
        assert_eq!(fs::read(dir.join(filename)).await.unwrap(), b"image-bytes");

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_consecutive_stores_do_not_overwrite() {
        let dir = temp_dir();
        let store = LocalImageStore::new(&dir, "http://cdn.example.com/images").await.unwrap();

        let a = store.store(b"a", "x.gif").await.unwrap();
        let b = store.store(b"b", "x.gif").await.unwrap();

        assert_ne!(a, b);
        assert!(a.starts_with("http://cdn.example.com/images/"));
        let mut entries = fs::read_dir(&dir).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 2);

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file() {
        let dir = temp_dir();
        let store = LocalImageStore::new(&dir, "/images").await.unwrap();

        let url = store.store(b"bytes", "a.webp").await.unwrap();
        store.remove(&url).await.unwrap();

        let filename = url.rsplit('/').next().unwrap();
        assert!(!dir.join(filename).exists());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_rejects_foreign_urls() {
        let dir = temp_dir();
        let store = LocalImageStore::new(&dir, "/images").await.unwrap();

        for url in ["/other/1.png", "/images/../secret", "/images/"] {
            let err = store.remove(url).await.unwrap_err();
            assert!(matches!(err, ImageStoreError::UnknownUrl(_)), "{url}");
        }

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_failed_write_removes_partial_file() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("partial.png");
        fs::write(&path, b"").await.unwrap();

        // Every write to /dev/full fails with ENOSPC.
        let mut full = OpenOptions::new().write(true).open("/dev/full").await.unwrap();
        let result = write_or_discard(&mut full, &path, &[0u8; 64 * 1024]).await;

        assert!(matches!(result, Err(ImageStoreError::Io(_))));
        assert!(!path.exists());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_an_error() {
        let dir = temp_dir();
        fs::write(&dir, b"not a directory").await.unwrap();

        let result = LocalImageStore::new(dir.join("uploads"), "/images").await;
        assert!(matches!(result, Err(ImageStoreError::Directory(_))));

        fs::remove_file(&dir).await.unwrap();
    }
}
