//! Data models for the application
//!
//! Video metadata records and the readiness status reported for their content.

mod status;
mod video;

pub use status::*;
pub use video::*;
