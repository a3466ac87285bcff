//! Latest-value delivery of pose frames.

use std::sync::{Arc, Mutex, MutexGuard};

use super::landmark::LandmarkFrame;

/// A single-slot channel holding the most recent pose frame.
///
/// The pose source publishes at its own cadence and each publish replaces
/// the previous frame; the render loop peeks once per tick. Clones share the
/// same slot, so the writer can live on another thread.
#[derive(Debug, Clone, Default)]
pub struct PoseSlot {
    inner: Arc<Mutex<Option<LandmarkFrame>>>,
}

impl PoseSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a delivery. `None` (no body detected) is stored as an empty
    /// frame so the reader can tell it apart from "nothing delivered yet".
    pub fn publish(&self, frame: Option<LandmarkFrame>) {
        *self.lock() = Some(frame.unwrap_or_default());
    }

    /// Clones the latest frame without consuming it.
    pub fn latest(&self) -> Option<LandmarkFrame> {
        self.lock().clone()
    }

    /// Discards the stored frame.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<LandmarkFrame>> {
        // A panicking writer cannot leave a half-written frame behind.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
