use serde::{Deserialize, Serialize};

/// Identifier of a registered video. `0` means "not assigned yet".
pub type VideoId = u64;

/// Sentinel id carried by submissions that want a fresh identifier.
pub const UNASSIGNED_ID: VideoId = 0;

/// Path segment under which content is served, relative to the public base address.
const VIDEO_PATH: &str = "/video";

/// Metadata record for a single video.
///
/// `content_url` is derived by the registry and never trusted from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    #[serde(default)]
    pub id: VideoId,
    pub title: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub content_type: String,
    #[serde(default, alias = "dataUrl")]
    pub content_url: String,
}

impl VideoRecord {
    /// Create an unregistered record (id 0, no content URL).
    pub fn new(title: impl Into<String>, duration: i64, content_type: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: title.into(),
            duration,
            content_type: content_type.into(),
            content_url: String::new(),
        }
    }

    pub fn with_id(mut self, id: VideoId) -> Self {
        self.id = id;
        self
    }

    pub fn is_unassigned(&self) -> bool {
        self.id == UNASSIGNED_ID
    }

    /// Return a copy carrying the final id and the URL derived from `base_url`.
    pub fn registered(self, id: VideoId, base_url: &str) -> Self {
        Self {
            id,
            content_url: content_url_for(base_url, id),
            ..self
        }
    }
}

/// Build the externally reachable content URL: `{base}/video/{id}/data`.
///
/// Trailing slashes on `base_url` are ignored.
pub fn content_url_for(base_url: &str, id: VideoId) -> String {
    format!("{}{}/{}/data", base_url.trim_end_matches('/'), VIDEO_PATH, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_url_format() {
        assert_eq!(
            content_url_for("http://localhost:8080", 7),
            "http://localhost:8080/video/7/data"
        );
    }

    #[test]
    fn test_content_url_trims_trailing_slash() {
        assert_eq!(
            content_url_for("http://example.com/", 1),
            content_url_for("http://example.com", 1)
        );
    }

    #[test]
    fn test_registered_overwrites_client_url() {
        let mut submitted = VideoRecord::new("clip", 42, "video/mp4");
        submitted.content_url = "http://evil.example/steal".to_string();

        let record = submitted.registered(3, "http://localhost:8080");

        assert_eq!(record.id, 3);
        assert_eq!(record.title, "clip");
        assert_eq!(record.duration, 42);
        assert_eq!(record.content_url, "http://localhost:8080/video/3/data");
    }

    #[test]
    fn test_deserialize_minimal_submission() {
        let record: VideoRecord = serde_json::from_str(r#"{"title":"a"}"#).unwrap();
        assert!(record.is_unassigned());
        assert_eq!(record.title, "a");
        assert!(record.content_url.is_empty());
    }

    #[test]
    fn test_deserialize_accepts_legacy_data_url() {
        let json = r#"{"id":5,"title":"b","duration":10,"contentType":"video/mp4","dataUrl":"x"}"#;
        let record: VideoRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 5);
        assert_eq!(record.content_type, "video/mp4");
        assert_eq!(record.content_url, "x");
    }

    #[test]
    fn test_serialize_camel_case() {
        let record = VideoRecord::new("c", 1, "video/webm").registered(2, "http://h");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["contentType"], "video/webm");
        assert_eq!(value["contentUrl"], "http://h/video/2/data");
    }
}
