use std::sync::{Arc, PoisonError, RwLock};

use crate::foundation::error::{PrismError, PrismResult};
use crate::render::backend::FrameRGBA;

/// Read-only view of the most recently completed tick's surface.
///
/// Reading never triggers a render. Before the first tick every read returns
/// [`PrismError::NotReady`].
#[derive(Clone, Debug, Default)]
pub struct FrameSampler {
    latest: Arc<RwLock<Option<Arc<FrameRGBA>>>>,
}

impl FrameSampler {
    /// Create an empty sampler.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn publish(&self, frame: Arc<FrameRGBA>) {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    /// Shared handle to the latest surface.
    pub fn latest(&self) -> PrismResult<Arc<FrameRGBA>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(PrismError::NotReady)
    }

    /// Copy of the latest surface's RGBA8 bytes.
    pub fn read_pixels(&self) -> PrismResult<Vec<u8>> {
        Ok(self.latest()?.data.clone())
    }

    /// Whether at least one tick has completed.
    pub fn is_ready(&self) -> bool {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sampler.rs"]
mod tests;
