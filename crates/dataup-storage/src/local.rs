use crate::drain::drain_reader;
use crate::keys;
use crate::traits::{BlobStream, ContentStore, StorageError, StorageResult};
use async_trait::async_trait;
use dataup_core::VideoId;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Local filesystem content store
///
/// Each write streams into a private staging file which is fsynced and then
/// renamed over `videos/{id}.bin`, so readers never see a partial blob.
#[derive(Clone, Debug)]
pub struct LocalContentStore {
    base_path: PathBuf,
}

impl LocalContentStore {
    /// Create a new LocalContentStore rooted at `base_path`
    ///
    /// The blob and staging directories are created if missing.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        for dir in [keys::BLOB_DIR, keys::STAGING_DIR] {
            let path = base_path.join(dir);
            fs::create_dir_all(&path).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }

        Ok(LocalContentStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    fn blob_path(&self, id: VideoId) -> PathBuf {
        self.key_to_path(&keys::blob_key(id))
    }

    async fn open_blob(&self, id: VideoId, path: &Path) -> StorageResult<fs::File> {
        fs::File::open(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(id)
            } else {
                StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                ))
            }
        })
    }

    /// Stream `reader` into a fresh file at `path` and make it durable.
    async fn write_staged(
        &self,
        path: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.flush().await?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(bytes_copied)
    }

    async fn discard_staging(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove staging file"
                );
            }
        }
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn exists(&self, id: VideoId) -> StorageResult<bool> {
        match fs::metadata(self.blob_path(id)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn write(
        &self,
        id: VideoId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let final_path = self.blob_path(id);
        let staging_path = self.key_to_path(&keys::staging_key(id));
        let start = Instant::now();

        let bytes_copied = match self.write_staged(&staging_path, reader).await {
            Ok(n) => n,
            Err(e) => {
                drain_reader(reader).await;
                Self::discard_staging(&staging_path).await;
                tracing::error!(
                    video_id = id,
                    path = %staging_path.display(),
                    error = %e,
                    "Local content write failed"
                );
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&staging_path, &final_path).await {
            Self::discard_staging(&staging_path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to move {} into place at {}: {}",
                staging_path.display(),
                final_path.display(),
                e
            )));
        }

        tracing::info!(
            video_id = id,
            path = %final_path.display(),
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local content write successful"
        );

        Ok(bytes_copied)
    }

    async fn read(
        &self,
        id: VideoId,
        writer: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64> {
        let path = self.blob_path(id);
        let start = Instant::now();

        let mut file = self.open_blob(id, &path).await?;

        let bytes_copied = tokio::io::copy(&mut file, writer).await.map_err(|e| {
            StorageError::DownloadFailed(format!(
                "Failed to copy {} to output: {}",
                path.display(),
                e
            ))
        })?;

        writer.flush().await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to flush output: {}", e))
        })?;

        tracing::info!(
            video_id = id,
            path = %path.display(),
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local content read successful"
        );

        Ok(bytes_copied)
    }

    async fn download_stream(&self, id: VideoId) -> StorageResult<BlobStream> {
        let path = self.blob_path(id);
        let start = Instant::now();

        let file = self.open_blob(id, &path).await?;
        // Length of the opened inode; a concurrent rename does not change it.
        let content_length = file
            .metadata()
            .await
            .map_err(|e| {
                StorageError::DownloadFailed(format!(
                    "Failed to stat {}: {}",
                    path.display(),
                    e
                ))
            })?
            .len();

        let stream = tokio_util::io::ReaderStream::new(file).map(|result| {
            result.map_err(|e| StorageError::DownloadFailed(format!("Failed to read chunk: {}", e)))
        });

        let path_display = path.display().to_string();
        let logged_stream = stream.map(move |item| {
            if let Err(ref e) = item {
                tracing::error!(
                    video_id = id,
                    path = %path_display,
                    error = %e,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local content stream error"
                );
            }
            item
        });

        Ok(BlobStream {
            content_length,
            stream: Box::pin(logged_stream),
        })
    }

    async fn health_check(&self) -> StorageResult<()> {
        let probe = self.key_to_path(&format!(
            "{}/health-{}.probe",
            keys::STAGING_DIR,
            uuid::Uuid::new_v4().simple()
        ));
        fs::write(&probe, b"ok").await.map_err(|e| {
            StorageError::BackendError(format!(
                "Storage root {} is not writable: {}",
                self.base_path.display(),
                e
            ))
        })?;
        fs::remove_file(&probe).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::tempdir;
    use tokio::io::ReadBuf;

    /// Yields a few bytes, then fails like a reset client connection.
    struct FailingReader {
        sent: bool,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.sent {
                Poll::Ready(Err(io::Error::new(
                    ErrorKind::ConnectionReset,
                    "client went away",
                )))
            } else {
                self.sent = true;
                buf.put_slice(b"partial");
                Poll::Ready(Ok(()))
            }
        }
    }

    fn staging_entries(root: &Path) -> usize {
        std::fs::read_dir(root.join(keys::STAGING_DIR))
            .unwrap()
            .count()
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let data = b"test video bytes".to_vec();
        let mut reader: &[u8] = &data;
        let written = store.write(1, &mut reader).await.unwrap();
        assert_eq!(written, data.len() as u64);

        let mut out = Vec::new();
        let copied = store.read(1, &mut out).await.unwrap();
        assert_eq!(copied, data.len() as u64);
        assert_eq!(out, data);
    }

    #[tokio::test]
    async fn test_exists_transitions_after_write() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        assert!(!store.exists(4).await.unwrap());

        let mut reader: &[u8] = b"abc";
        store.write(4, &mut reader).await.unwrap();

        assert!(store.exists(4).await.unwrap());
        assert!(!store.exists(5).await.unwrap());
    }

    #[tokio::test]
    async fn test_write_replaces_previous_blob() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let mut first: &[u8] = b"a much longer first version";
        store.write(2, &mut first).await.unwrap();
        let mut second: &[u8] = b"short";
        store.write(2, &mut second).await.unwrap();

        let mut out = Vec::new();
        store.read(2, &mut out).await.unwrap();
        assert_eq!(out, b"short");
        assert_eq!(store.download_stream(2).await.unwrap().content_length, 5);
    }

    #[tokio::test]
    async fn test_read_missing_blob_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let mut out = Vec::new();
        let result = store.read(99, &mut out).await;
        assert!(matches!(result, Err(StorageError::NotFound(99))));
        assert!(out.is_empty());

        assert!(matches!(
            store.download_stream(99).await,
            Err(StorageError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_blob() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let mut original: &[u8] = b"original";
        store.write(3, &mut original).await.unwrap();

        let mut failing = FailingReader { sent: false };
        let result = store.write(3, &mut failing).await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));

        let mut out = Vec::new();
        store.read(3, &mut out).await.unwrap();
        assert_eq!(out, b"original");
        assert_eq!(staging_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_failed_first_write_is_not_visible() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let mut failing = FailingReader { sent: false };
        assert!(store.write(8, &mut failing).await.is_err());

        assert!(!store.exists(8).await.unwrap());
        assert_eq!(staging_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_download_stream() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let data: Vec<u8> = (0..=255u8).cycle().take(20_000).collect();
        let mut reader: &[u8] = &data;
        store.write(6, &mut reader).await.unwrap();

        let mut blob = store.download_stream(6).await.unwrap();
        assert_eq!(blob.content_length, data.len() as u64);
        let mut downloaded = Vec::new();
        while let Some(chunk_result) = blob.stream.next().await {
            downloaded.extend_from_slice(&chunk_result.unwrap());
        }

        assert_eq!(downloaded, data);
    }

    #[tokio::test]
    async fn test_opened_download_survives_replacement() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let original = b"a much longer first version".to_vec();
        let mut reader: &[u8] = &original;
        store.write(9, &mut reader).await.unwrap();

        let mut blob = store.download_stream(9).await.unwrap();

        let mut replacement: &[u8] = b"short";
        store.write(9, &mut replacement).await.unwrap();

        let mut downloaded = Vec::new();
        while let Some(chunk_result) = blob.stream.next().await {
            downloaded.extend_from_slice(&chunk_result.unwrap());
        }
        assert_eq!(blob.content_length, original.len() as u64);
        assert_eq!(downloaded, original);

        let fresh = store.download_stream(9).await.unwrap();
        assert_eq!(fresh.content_length, 5);
    }

    #[tokio::test]
    async fn test_empty_upload_is_stored() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let mut reader: &[u8] = b"";
        assert_eq!(store.write(7, &mut reader).await.unwrap(), 0);
        assert!(store.exists(7).await.unwrap());
        assert_eq!(store.download_stream(7).await.unwrap().content_length, 0);
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        store.health_check().await.unwrap();
        assert_eq!(staging_entries(dir.path()), 0);
    }
}
