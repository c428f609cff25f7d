//! Metadata storage seam for the registry.

use async_trait::async_trait;
use dataup_core::{AppError, VideoId, VideoRecord};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keyed storage for video metadata records.
///
/// The registry owns id assignment and URL derivation; implementations only
/// keep records. Errors are reserved for persistent backends.
#[async_trait]
pub trait VideoMetadataStore: Send + Sync {
    async fn get(&self, id: VideoId) -> Result<Option<VideoRecord>, AppError>;

    /// Insert or fully replace the record stored under `record.id`.
    async fn put(&self, record: VideoRecord) -> Result<(), AppError>;

    async fn list(&self) -> Result<Vec<VideoRecord>, AppError>;
}

/// Process-local metadata store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryVideoStore {
    videos: RwLock<HashMap<VideoId, VideoRecord>>,
}

impl InMemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoMetadataStore for InMemoryVideoStore {
    async fn get(&self, id: VideoId) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn put(&self, record: VideoRecord) -> Result<(), AppError> {
        self.videos.write().await.insert(record.id, record);
        Ok(())
    }

    /// Snapshot of all records, ordered by id.
    async fn list(&self) -> Result<Vec<VideoRecord>, AppError> {
        let mut records: Vec<VideoRecord> = self.videos.read().await.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}
