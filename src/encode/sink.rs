use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::capture::artifact::ArtifactKind;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{PrismError, PrismResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameEncoder`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Nominal frames-per-second.
    pub fps: Fps,
}

/// Finished encoder output.
#[derive(Clone, Debug, Default)]
pub struct EncodedStream {
    /// Container bytes.
    pub bytes: Vec<u8>,
    /// Frames written.
    pub frames: u64,
    /// Playback duration implied by the container's frame timing.
    pub duration: Duration,
}

/// Streaming encoder contract.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order between one
/// `begin` and one `finish` or `abort`.
pub trait FrameEncoder: Send {
    /// Artifact kind this encoder produces.
    fn kind(&self) -> ArtifactKind;
    /// MIME type of the finished bytes.
    fn mime(&self) -> &'static str;
    /// File extension of the finished bytes (without dot).
    fn extension(&self) -> &'static str;
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: EncoderConfig) -> PrismResult<()>;
    /// Append one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PrismResult<()>;
    /// Write the trailer and return the container.
    fn finish(&mut self) -> PrismResult<EncodedStream>;
    /// Release everything without producing output.
    fn abort(&mut self);
}

/// Frames captured by an [`InMemoryEncoder`], readable after the encoder moved to another thread.
#[derive(Clone, Debug, Default)]
pub struct CapturedFrames {
    frames: Arc<Mutex<Vec<FrameIndex>>>,
    aborted: Arc<Mutex<bool>>,
}

impl CapturedFrames {
    /// Indices pushed so far.
    pub fn indices(&self) -> Vec<FrameIndex> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether `abort` was called.
    pub fn aborted(&self) -> bool {
        *self.aborted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory encoder for tests and debugging.
///
/// The finished stream is the concatenation of every pushed frame's bytes.
#[derive(Debug)]
pub struct InMemoryEncoder {
    kind: ArtifactKind,
    cfg: Option<EncoderConfig>,
    bytes: Vec<u8>,
    captured: CapturedFrames,
    fail_at: Option<u64>,
}

impl InMemoryEncoder {
    /// Encoder reporting itself as `kind`.
    pub fn new(kind: ArtifactKind) -> Self {
        Self {
            kind,
            cfg: None,
            bytes: Vec::new(),
            captured: CapturedFrames::default(),
            fail_at: None,
        }
    }

    /// Reject the frame with index `idx` (and every later one) with [`PrismError::EncoderFailure`].
    pub fn failing_at(mut self, idx: u64) -> Self {
        self.fail_at = Some(idx);
        self
    }

    /// Shared view of what this encoder receives.
    pub fn captured(&self) -> CapturedFrames {
        self.captured.clone()
    }
}

impl FrameEncoder for InMemoryEncoder {
    fn kind(&self) -> ArtifactKind {
        self.kind
    }

    fn mime(&self) -> &'static str {
        "application/octet-stream"
    }

    fn extension(&self) -> &'static str {
        "rgba"
    }

    fn begin(&mut self, cfg: EncoderConfig) -> PrismResult<()> {
        self.cfg = Some(cfg);
        self.bytes.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PrismResult<()> {
        if self.cfg.is_none() {
            return Err(PrismError::encoder("in-memory encoder not started"));
        }
        if self.fail_at.is_some_and(|n| idx.0 >= n) {
            return Err(PrismError::encoder(format!("rejected frame {}", idx.0)));
        }
        self.bytes.extend_from_slice(&frame.data);
        self.captured
            .frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(idx);
        Ok(())
    }

    fn finish(&mut self) -> PrismResult<EncodedStream> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| PrismError::encoder("in-memory encoder not started"))?;
        let frames = self.captured.indices().len() as u64;
        Ok(EncodedStream {
            bytes: std::mem::take(&mut self.bytes),
            frames,
            duration: Duration::from_secs_f64(frames as f64 * cfg.fps.frame_duration_secs()),
        })
    }

    fn abort(&mut self) {
        self.cfg = None;
        self.bytes.clear();
        *self
            .captured
            .aborted
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
