//! Dataup Services Layer
//!
//! Hosts the video registry and the `VideoService` facade that composes the
//! registry with a content store. The API crate depends on this facade only;
//! keep business rules here and thin HTTP handling in dataup-api.

pub mod registry;
pub mod video_service;

pub use registry::{IdSequence, InMemoryVideoStore, Registry, VideoMetadataStore};
pub use video_service::{ContentDownload, VideoService};

pub use dataup_storage::{
    create_content_store, ContentStore, LocalContentStore, StorageError, StorageResult,
};
