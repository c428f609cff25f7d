//! Application state shared by all handlers.

use dataup_core::Config;
use dataup_services::VideoService;

pub struct AppState {
    pub videos: VideoService,
    pub config: Config,
}

impl AppState {
    pub fn new(videos: VideoService, config: Config) -> Self {
        Self { videos, config }
    }
}
