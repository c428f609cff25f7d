use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Readiness of a video's binary content.
///
/// `Processing` is never produced today: content becomes `Ready` as soon as
/// an upload completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentState {
    Unknown,
    Processing,
    Ready,
}

impl Display for ContentState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ContentState::Unknown => write!(f, "UNKNOWN"),
            ContentState::Processing => write!(f, "PROCESSING"),
            ContentState::Ready => write!(f, "READY"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStatus {
    pub state: ContentState,
}

impl ContentStatus {
    pub fn new(state: ContentState) -> Self {
        Self { state }
    }

    pub fn ready() -> Self {
        Self::new(ContentState::Ready)
    }

    pub fn unknown() -> Self {
        Self::new(ContentState::Unknown)
    }

    pub fn is_ready(&self) -> bool {
        self.state == ContentState::Ready
    }
}
