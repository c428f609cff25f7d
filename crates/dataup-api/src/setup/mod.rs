//! Application setup and initialization
//!
//! Builds the content store, registry, service facade and router from a
//! `Config`. Kept separate from `main` so tests can build the same app.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use dataup_core::Config;
use dataup_services::{create_content_store, Registry, VideoService};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;
    crate::error::configure_error_details(&config);

    let content = create_content_store(&config)
        .await
        .context("Failed to initialize content storage")?;

    let base_url = config
        .public_base_url()
        .map(str::to_string)
        .unwrap_or_else(|| config.fallback_base_url());
    let registry = Arc::new(Registry::in_memory(base_url));

    let state = Arc::new(AppState::new(VideoService::new(registry, content), config));

    let router = routes::setup_routes(&state.config, state.clone())?;

    tracing::info!(
        storage_path = %state.config.storage_path().display(),
        public_base_url = ?state.config.public_base_url(),
        "Application initialized"
    );

    Ok((state, router))
}
