//! Video registry
//!
//! Assigns identifiers, derives content URLs and keeps metadata records
//! through a pluggable [`VideoMetadataStore`].
//!
//! ```text
//!   save(record{id: 0}) ──► IdSequence::next_id() ──► record.registered(id, base)
//!   save(record{id: n}) ──► IdSequence::observe(n) ─┘            │
//!                                                                 ▼
//!                                                   VideoMetadataStore::put
//! ```

mod metadata_store;
mod sequence;

pub use metadata_store::{InMemoryVideoStore, VideoMetadataStore};
pub use sequence::IdSequence;

use dataup_core::{AppError, VideoId, VideoRecord};
use std::sync::Arc;

/// Index of video metadata keyed by id.
pub struct Registry {
    store: Arc<dyn VideoMetadataStore>,
    sequence: Arc<IdSequence>,
    base_url: String,
}

impl Registry {
    /// Registry backed by a fresh in-memory store and id sequence.
    pub fn in_memory(base_url: impl Into<String>) -> Self {
        Self::new(
            Arc::new(InMemoryVideoStore::new()),
            Arc::new(IdSequence::new()),
            base_url,
        )
    }

    pub fn new(
        store: Arc<dyn VideoMetadataStore>,
        sequence: Arc<IdSequence>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            store,
            sequence,
            base_url,
        }
    }

    /// Default base address used by [`Registry::save`].
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of all known records. Callers must not rely on ordering.
    pub async fn list(&self) -> Result<Vec<VideoRecord>, AppError> {
        self.store.list().await
    }

    pub async fn get(&self, id: VideoId) -> Result<Option<VideoRecord>, AppError> {
        self.store.get(id).await
    }

    /// Save `record` using the registry's default base address.
    pub async fn save(&self, record: VideoRecord) -> Result<VideoRecord, AppError> {
        self.save_at(record, &self.base_url).await
    }

    /// Save `record`, deriving its content URL from `base_url`.
    ///
    /// Id 0 mints a new identifier; any other id replaces the record stored
    /// under it. The caller-supplied content URL is always discarded.
    pub async fn save_at(
        &self,
        record: VideoRecord,
        base_url: &str,
    ) -> Result<VideoRecord, AppError> {
        let created = record.is_unassigned();
        let id = if created {
            self.sequence.next_id().ok_or_else(|| {
                tracing::error!("Video id sequence exhausted");
                AppError::Internal("No video identifiers left to assign".to_string())
            })?
        } else {
            self.sequence.observe(record.id);
            record.id
        };

        let record = record.registered(id, base_url);
        self.store.put(record.clone()).await?;

        tracing::info!(
            video_id = id,
            created,
            content_url = %record.content_url,
            "Video metadata saved"
        );

        Ok(record)
    }
}
