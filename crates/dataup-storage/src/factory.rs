use crate::{ContentStore, LocalContentStore, StorageResult};
use dataup_core::Config;
use std::sync::Arc;

/// Create the content store described by the configuration
pub async fn create_content_store(config: &Config) -> StorageResult<Arc<dyn ContentStore>> {
    let base_path = config.storage_path().to_path_buf();

    tracing::info!(path = %base_path.display(), "Using local content storage");

    let store = LocalContentStore::new(base_path).await?;
    Ok(Arc::new(store))
}
