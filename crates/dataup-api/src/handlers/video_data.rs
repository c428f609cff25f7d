use crate::error::{multipart_failure, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use dataup_core::{AppError, ContentStatus, VideoId};
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio_util::io::StreamReader;

/// Multipart part carrying the video bytes.
pub const DATA_FIELD: &str = "data";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// `POST /video/{id}/data` - stream the `data` part into the content store.
pub async fn upload_video_data(
    State(state): State<Arc<AppState>>,
    Path(id): Path<VideoId>,
    mut multipart: Multipart,
) -> Result<Json<ContentStatus>, HttpAppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(DATA_FIELD) {
            continue;
        }

        // The reader only sees io errors; keep the multipart status so an
        // oversized body is still reported as 413.
        let stream_failure: Mutex<Option<(StatusCode, String)>> = Mutex::new(None);
        let chunks = field.map(|chunk| {
            chunk.map_err(|e| {
                if let Ok(mut slot) = stream_failure.lock() {
                    slot.get_or_insert_with(|| (e.status(), e.body_text()));
                }
                std::io::Error::other(e)
            })
        });
        let mut reader = std::pin::pin!(StreamReader::new(chunks));

        return match state.videos.upload_content(id, &mut reader).await {
            Ok(status) => Ok(Json(status)),
            Err(e) if e.is_not_found() => Err(e.into()),
            Err(e) => {
                let failure = stream_failure.lock().ok().and_then(|mut slot| slot.take());
                match failure {
                    Some((status, message)) => {
                        tracing::debug!(video_id = id, error = %e, "Upload stream aborted");
                        Err(multipart_failure(status, message).into())
                    }
                    None => Err(e.into()),
                }
            }
        };
    }

    Err(AppError::BadRequest(format!("Missing multipart part '{}'", DATA_FIELD)).into())
}

/// `GET /video/{id}/data` - stream stored bytes back unmodified.
pub async fn download_video_data(
    State(state): State<Arc<AppState>>,
    Path(id): Path<VideoId>,
) -> Result<Response, HttpAppError> {
    let download = state.videos.open_content(id).await?;

    let content_type = HeaderValue::from_str(&download.record.content_type)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));

    let body_stream = download.stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, download.content_length)
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            HttpAppError(AppError::Internal(format!(
                "Failed to build download response: {}",
                e
            )))
        })
}

/// `GET /video/{id}/status`
pub async fn video_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<VideoId>,
) -> Result<Json<ContentStatus>, HttpAppError> {
    let status = state.videos.content_status(id).await?;
    Ok(Json(status))
}
