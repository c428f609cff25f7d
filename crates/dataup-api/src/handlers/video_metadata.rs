use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::base_url::resolve_base_url;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use dataup_core::{VideoId, VideoRecord};
use std::sync::Arc;

/// `GET /video`
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VideoRecord>>, HttpAppError> {
    let videos = state.videos.list_videos().await?;
    Ok(Json(videos))
}

/// `POST /video` - register new metadata (id 0) or replace an existing record.
pub async fn submit_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(record): ValidatedJson<VideoRecord>,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let base_url = resolve_base_url(&state.config, &headers);
    let saved = state.videos.submit_metadata_at(record, &base_url).await?;
    Ok(Json(saved))
}

/// `GET /video/{id}`
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<VideoId>,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let video = state.videos.get_video(id).await?;
    Ok(Json(video))
}
