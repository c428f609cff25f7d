//! Shared key generation for the content store.
//!
//! Blob key: `videos/{id}.bin`. Staging key: `.staging/{id}-{nonce}.part`.

use dataup_core::VideoId;
use uuid::Uuid;

pub const BLOB_DIR: &str = "videos";
pub const STAGING_DIR: &str = ".staging";

/// Storage key of the committed blob for `id`.
pub fn blob_key(id: VideoId) -> String {
    format!("{}/{}.bin", BLOB_DIR, id)
}

/// Unique storage key for an in-flight write of `id`.
pub fn staging_key(id: VideoId) -> String {
    format!("{}/{}-{}.part", STAGING_DIR, id, Uuid::new_v4().simple())
}
