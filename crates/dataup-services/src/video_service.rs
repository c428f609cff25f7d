//! Video service facade
//!
//! The four operations the transport layer calls (list, submit metadata,
//! upload content, download content) plus status derivation. Each call
//! completes its work before returning; there is no background processing,
//! so a successful upload is immediately `READY`.

use crate::registry::Registry;
use dataup_core::{AppError, ContentStatus, VideoId, VideoRecord};
use dataup_storage::{drain_reader, ContentByteStream, ContentStore};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// An opened blob ready to be streamed to a client.
pub struct ContentDownload {
    pub record: VideoRecord,
    pub content_length: u64,
    pub stream: ContentByteStream,
}

#[derive(Clone)]
pub struct VideoService {
    registry: Arc<Registry>,
    content: Arc<dyn ContentStore>,
}

impl VideoService {
    pub fn new(registry: Arc<Registry>, content: Arc<dyn ContentStore>) -> Self {
        Self { registry, content }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn content_store(&self) -> &Arc<dyn ContentStore> {
        &self.content
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>, AppError> {
        self.registry.list().await
    }

    pub async fn get_video(&self, id: VideoId) -> Result<VideoRecord, AppError> {
        self.registry
            .get(id)
            .await?
            .ok_or_else(|| AppError::video_not_found(id))
    }

    pub async fn submit_metadata(&self, record: VideoRecord) -> Result<VideoRecord, AppError> {
        self.registry.save(record).await
    }

    /// Submit metadata with the externally visible base address chosen by the caller.
    pub async fn submit_metadata_at(
        &self,
        record: VideoRecord,
        base_url: &str,
    ) -> Result<VideoRecord, AppError> {
        self.registry.save_at(record, base_url).await
    }

    /// Store the content for a registered video.
    ///
    /// Unknown ids fail with `NotFound` without touching the content store; the
    /// reader is drained either way.
    pub async fn upload_content(
        &self,
        id: VideoId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ContentStatus, AppError> {
        let record = match self.registry.get(id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                drain_reader(reader).await;
                tracing::debug!(video_id = id, "Upload rejected for unknown video");
                return Err(AppError::video_not_found(id));
            }
            Err(e) => {
                drain_reader(reader).await;
                return Err(e);
            }
        };

        let size_bytes = self.content.write(record.id, reader).await?;

        tracing::info!(video_id = id, size_bytes, "Video content uploaded");

        Ok(ContentStatus::ready())
    }

    /// Copy the stored content of `id` into `writer`.
    ///
    /// Fails with `NotFound` when the id is unknown or has no content.
    pub async fn download_content(
        &self,
        id: VideoId,
        writer: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64, AppError> {
        self.get_video(id).await?;
        let copied = self.content.read(id, writer).await?;
        Ok(copied)
    }

    /// Open the stored content of `id` for streaming.
    ///
    /// The length and the bytes come from one open blob, so a concurrent
    /// upload cannot make them disagree.
    pub async fn open_content(&self, id: VideoId) -> Result<ContentDownload, AppError> {
        let record = self.get_video(id).await?;
        let blob = self.content.download_stream(id).await?;

        Ok(ContentDownload {
            record,
            content_length: blob.content_length,
            stream: blob.stream,
        })
    }

    /// Readiness of a registered video's content.
    pub async fn content_status(&self, id: VideoId) -> Result<ContentStatus, AppError> {
        self.get_video(id).await?;
        if self.content.exists(id).await? {
            Ok(ContentStatus::ready())
        } else {
            Ok(ContentStatus::unknown())
        }
    }
}
