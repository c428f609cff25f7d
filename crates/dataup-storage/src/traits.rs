//! Content store abstraction trait
//!
//! This module defines the ContentStore trait that all blob backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use dataup_core::{AppError, VideoId};
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Content not found for video {0}")]
    NotFound(VideoId),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => AppError::content_not_found(id),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked view of a stored blob, used to stream it into a response body.
pub type ContentByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// An opened blob: its size and its bytes, both taken from the same open handle.
pub struct BlobStream {
    pub content_length: u64,
    pub stream: ContentByteStream,
}

/// Content store abstraction
///
/// Maps a video id to a single binary blob. Writes replace the previous blob
/// atomically: a concurrent reader observes either the old or the new content,
/// never a mixture.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Check whether a complete blob has been written for `id`.
    async fn exists(&self, id: VideoId) -> StorageResult<bool>;

    /// Consume `reader` until EOF and store it as the blob for `id`.
    ///
    /// Returns the number of bytes written. On error nothing becomes visible
    /// and any previous blob for `id` is left untouched.
    async fn write(
        &self,
        id: VideoId,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Copy the blob for `id` into `writer` and flush it.
    ///
    /// Returns the number of bytes copied, or `StorageError::NotFound` when no
    /// blob exists.
    async fn read(
        &self,
        id: VideoId,
        writer: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Open the blob for `id` as a stream of chunks.
    ///
    /// `content_length` describes exactly the bytes the stream yields, even if
    /// the blob is replaced after opening. Read failures part-way through are
    /// yielded as `Err` items.
    async fn download_stream(&self, id: VideoId) -> StorageResult<BlobStream>;

    /// Verify the backend can currently accept writes.
    async fn health_check(&self) -> StorageResult<()>;
}
