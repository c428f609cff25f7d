pub mod video_data;
pub mod video_metadata;
