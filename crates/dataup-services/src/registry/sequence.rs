use dataup_core::VideoId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic source of video identifiers.
///
/// Starts at 0; the first minted id is 1. Values are never reused or decremented.
#[derive(Debug, Default)]
pub struct IdSequence {
    current: AtomicU64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically increment the counter and return the new value.
    ///
    /// Returns `None` once the counter has reached `VideoId::MAX`; the counter
    /// never wraps back to the unassigned sentinel.
    pub fn next_id(&self) -> Option<VideoId> {
        self.current
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| c.checked_add(1))
            .ok()
            .map(|previous| previous + 1)
    }

    /// Raise the counter to `id` if it is behind, so a caller-chosen id is never minted later.
    pub fn observe(&self, id: VideoId) {
        self.current.fetch_max(id, Ordering::SeqCst);
    }

    /// Last value handed out (or observed).
    pub fn current(&self) -> VideoId {
        self.current.load(Ordering::SeqCst)
    }
}
