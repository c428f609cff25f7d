//! Dataup Storage Library
//!
//! This crate provides the content store abstraction and its local filesystem
//! implementation. Blobs are keyed by video id only; whether an id is known to
//! the registry is checked by the service layer.
//!
//! # Layout
//!
//! - **Blobs**: `videos/{id}.bin` under the storage root
//! - **Staging**: `.staging/{id}-{uuid}.part`, renamed over the blob once complete
//!
//! Key generation is centralized in the `keys` module.

pub mod drain;
pub mod factory;
pub(crate) mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use drain::drain_reader;
pub use factory::create_content_store;
pub use local::LocalContentStore;
pub use traits::{BlobStream, ContentByteStream, ContentStore, StorageError, StorageResult};
