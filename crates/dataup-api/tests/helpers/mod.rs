//! Test helpers: build the application on a temporary storage root.
//!
//! Run from workspace root: `cargo test -p dataup-api`.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use dataup_api::setup;
use dataup_core::Config;
use std::sync::Arc;
use tempfile::TempDir;

/// Public base address configured for every test app.
pub const TEST_BASE_URL: &str = "http://test.local:8080";

/// Test application: server plus the storage directory it owns.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<dataup_api::AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config(storage_path: &str, max_upload_size_bytes: Option<usize>) -> Config {
    let storage_path = storage_path.to_string();
    Config::from_lookup(move |key| match key {
        "CONTENT_STORAGE_PATH" => Some(storage_path.clone()),
        "PUBLIC_BASE_URL" => Some(TEST_BASE_URL.to_string()),
        "MAX_UPLOAD_SIZE_BYTES" => max_upload_size_bytes.map(|n| n.to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}

/// Setup test app with isolated local storage.
pub async fn setup_test_app() -> TestApp {
    build_test_app(None).await
}

/// Setup test app with a small request body limit.
pub async fn setup_test_app_with_upload_limit(max_upload_size_bytes: usize) -> TestApp {
    build_test_app(Some(max_upload_size_bytes)).await
}

async fn build_test_app(max_upload_size_bytes: Option<usize>) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(&temp_dir.path().to_string_lossy(), max_upload_size_bytes);

    let (state, router) = setup::initialize_app(config)
        .await
        .expect("Failed to initialize app");
    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// Multipart form with the video bytes in the `data` part.
pub fn video_form(data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name("video.mp4")
        .mime_type("video/mp4");
    MultipartForm::new().add_part("data", part)
}

/// Submit metadata and return the assigned id.
pub async fn create_video(client: &TestServer, title: &str) -> u64 {
    let response = client
        .post("/video")
        .json(&serde_json::json!({
            "id": 0,
            "title": title,
            "duration": 120,
            "contentType": "video/mp4"
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    body["id"].as_u64().expect("Expected numeric 'id' in response")
}
