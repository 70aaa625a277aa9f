use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::capture::artifact::{Artifact, ArtifactKind};
use crate::encode::palette::PaletteEncoderOpts;
use crate::encode::sink::{EncoderConfig, FrameEncoder};
use crate::encode::worker::{Completion, EncodeOutcome, Handoff, ThreadedEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::PrismError;
use crate::render::backend::FrameRGBA;

/// Capture tuning shared by every session a recorder starts.
#[derive(Clone, Copy, Debug)]
pub struct CaptureOpts {
    /// Target capture rate.
    pub fps: Fps,
    /// Palette-animation frame delay in milliseconds.
    pub palette_delay_ms: u32,
    /// Frames buffered between the render thread and the encoder thread.
    pub queue_depth: usize,
    /// Palette quantizer speed, 1 (best) to 30 (fastest).
    pub palette_speed: i32,
}

impl Default for CaptureOpts {
    fn default() -> Self {
        Self {
            fps: Fps::CAPTURE,
            palette_delay_ms: 33,
            queue_depth: 8,
            palette_speed: 10,
        }
    }
}

impl CaptureOpts {
    /// Frames a capture of `length` takes at this rate.
    pub fn frames_for(&self, length: Duration) -> u64 {
        (length.as_secs_f64() * self.fps.as_f64()).ceil() as u64
    }

    /// Palette encoder options derived from these settings.
    pub fn palette_encoder_opts(&self) -> PaletteEncoderOpts {
        PaletteEncoderOpts {
            delay_ms: self.palette_delay_ms,
            speed: self.palette_speed,
        }
    }
}

/// Capture session lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Created, waiting for its first frame.
    Armed,
    /// Accepting frames.
    Active,
    /// Duration elapsed or stopped; the encoder is writing the trailer.
    Finalizing,
    /// Artifact delivered.
    Complete,
    /// Cancelled or failed; no artifact.
    Cancelled,
}

impl SessionState {
    /// Armed and Active sessions hold the single capture slot.
    pub fn holds_slot(self) -> bool {
        matches!(self, Self::Armed | Self::Active)
    }
}

/// Delivered once per session through the recorder's completion callback.
#[derive(Debug)]
pub enum CaptureEvent {
    /// The session finished and produced an artifact.
    Completed(Artifact),
    /// The encoder failed; the session was cancelled.
    Failed {
        /// Kind of the failed session.
        kind: ArtifactKind,
        /// Cause.
        error: PrismError,
    },
    /// The session was cancelled before completion.
    Cancelled {
        /// Kind of the cancelled session.
        kind: ArtifactKind,
    },
}

pub(crate) type EventSink = Arc<Mutex<Box<dyn FnMut(CaptureEvent) + Send>>>;

pub(crate) fn event_sink(f: impl FnMut(CaptureEvent) + Send + 'static) -> EventSink {
    let f: Box<dyn FnMut(CaptureEvent) + Send> = Box::new(f);
    Arc::new(Mutex::new(f))
}

fn emit(events: &EventSink, event: CaptureEvent) {
    let mut sink = events.lock().unwrap_or_else(PoisonError::into_inner);
    (*sink)(event);
}

/// What a session did with one offered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    /// Handed to the encoder.
    Accepted,
    /// Not due yet at the capture rate.
    Skipped,
    /// Due, but the encoder queue was full.
    Dropped,
    /// The duration elapsed; this frame was not taken and the session is finalizing.
    Finalized,
    /// The encoder failed; the session is cancelled.
    Failed,
    /// The session no longer takes frames.
    Inert,
}

/// One bounded-duration recording.
///
/// Frames arrive through [`CaptureSession::offer`] in render order. The session gates them to
/// its capture rate and hands them to an encoder thread, so `offer` never waits on encoding.
pub struct CaptureSession {
    kind: ArtifactKind,
    mime: &'static str,
    extension: &'static str,
    length: Duration,
    fps: Fps,
    interval: Duration,
    queue_depth: usize,

    state: Arc<Mutex<SessionState>>,
    events: EventSink,
    pending: Option<Box<dyn FrameEncoder>>,
    worker: Option<ThreadedEncoder>,

    activated_at: Option<Duration>,
    next_frame_at: Duration,
    next_index: u64,
}

impl CaptureSession {
    pub(crate) fn arm(
        encoder: Box<dyn FrameEncoder>,
        length: Duration,
        opts: &CaptureOpts,
        events: EventSink,
    ) -> Self {
        Self {
            kind: encoder.kind(),
            mime: encoder.mime(),
            extension: encoder.extension(),
            length,
            fps: opts.fps,
            interval: opts.fps.frame_interval(),
            queue_depth: opts.queue_depth,
            state: Arc::new(Mutex::new(SessionState::Armed)),
            events,
            pending: Some(encoder),
            worker: None,
            activated_at: None,
            next_frame_at: Duration::ZERO,
            next_index: 0,
        }
    }

    /// Kind of artifact this session produces.
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Current state. Finalizing turns into Complete or Cancelled on the encoder thread.
    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: SessionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Move `from -> to` only if the encoder thread has not already settled the state.
    fn transition(&self, from: SessionState, to: SessionState) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != from {
            return false;
        }
        *state = to;
        true
    }

    /// Offer the surface rendered at `now`.
    pub fn offer(&mut self, now: Duration, frame: &Arc<FrameRGBA>) -> Offer {
        match self.state() {
            SessionState::Armed => {
                if let Err(error) = self.activate(now, frame) {
                    tracing::warn!(kind = %self.kind, %error, "capture session failed to start");
                    self.set_state(SessionState::Cancelled);
                    emit(
                        &self.events,
                        CaptureEvent::Failed {
                            kind: self.kind,
                            error,
                        },
                    );
                    return Offer::Failed;
                }
            }
            SessionState::Active => {}
            _ => return Offer::Inert,
        }

        let started = self.activated_at.unwrap_or(now);
        if now.saturating_sub(started) >= self.length {
            self.finalize();
            return Offer::Finalized;
        }

        // Frames up to a quarter interval early count as due.
        let slack = self.interval / 4;
        if now + slack < self.next_frame_at {
            return Offer::Skipped;
        }

        let Some(worker) = self.worker.as_mut() else {
            return Offer::Inert;
        };
        let handoff = worker.offer(FrameIndex(self.next_index), frame.clone());

        self.next_frame_at += self.interval;
        if self.next_frame_at + slack <= now {
            self.next_frame_at = now + self.interval;
        }

        match handoff {
            Ok(Handoff::Queued) => {
                self.next_index += 1;
                Offer::Accepted
            }
            Ok(Handoff::Dropped) => Offer::Dropped,
            Err(_) => {
                // The worker already reported the cause through the completion.
                self.worker = None;
                self.set_state(SessionState::Cancelled);
                Offer::Failed
            }
        }
    }

    fn activate(&mut self, now: Duration, frame: &FrameRGBA) -> Result<(), PrismError> {
        let encoder = self
            .pending
            .take()
            .ok_or_else(|| PrismError::encoder("capture session has no encoder"))?;
        let cfg = EncoderConfig {
            width: frame.width,
            height: frame.height,
            fps: self.fps,
        };
        self.worker = Some(ThreadedEncoder::spawn(
            encoder,
            cfg,
            self.queue_depth,
            self.completion(),
        )?);
        self.activated_at = Some(now);
        self.next_frame_at = now;
        self.set_state(SessionState::Active);
        tracing::info!(
            kind = %self.kind,
            width = frame.width,
            height = frame.height,
            length_secs = self.length.as_secs_f64(),
            "capture session active"
        );
        Ok(())
    }

    fn completion(&self) -> Completion {
        let kind = self.kind;
        let mime = self.mime;
        let extension = self.extension;
        let state = self.state.clone();
        let events = self.events.clone();
        Box::new(move |outcome| {
            let (next, event) = match outcome {
                EncodeOutcome::Finished(stream) => {
                    tracing::info!(
                        %kind,
                        frames = stream.frames,
                        bytes = stream.bytes.len(),
                        "capture session complete"
                    );
                    let artifact = Artifact::new(
                        kind,
                        mime,
                        extension,
                        stream.bytes,
                        stream.duration,
                        stream.frames,
                    );
                    (SessionState::Complete, CaptureEvent::Completed(artifact))
                }
                EncodeOutcome::Failed(error) => {
                    tracing::warn!(%kind, %error, "capture session failed");
                    (SessionState::Cancelled, CaptureEvent::Failed { kind, error })
                }
                EncodeOutcome::Aborted => {
                    tracing::info!(%kind, "capture session cancelled");
                    (SessionState::Cancelled, CaptureEvent::Cancelled { kind })
                }
            };
            *state.lock().unwrap_or_else(PoisonError::into_inner) = next;
            emit(&events, event);
        })
    }

    /// Finalize without a frame once `length` has elapsed at `now`, in the same timebase as the
    /// offered frames. Returns `true` when this call started finalization.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.state() != SessionState::Active {
            return false;
        }
        let Some(started) = self.activated_at else {
            return false;
        };
        if now.saturating_sub(started) < self.length {
            return false;
        }
        self.finalize();
        true
    }

    /// Stop taking frames and finalize what was captured. An armed session has nothing to
    /// finalize and is cancelled instead.
    pub fn stop(&mut self) -> bool {
        match self.state() {
            SessionState::Armed => self.cancel(),
            SessionState::Active => {
                self.finalize();
                true
            }
            _ => false,
        }
    }

    /// Discard the session and release its encoder. Returns `false` once finalizing or done.
    pub fn cancel(&mut self) -> bool {
        match self.state() {
            SessionState::Armed => {
                self.pending = None;
                self.set_state(SessionState::Cancelled);
                tracing::info!(kind = %self.kind, "capture session cancelled");
                emit(&self.events, CaptureEvent::Cancelled { kind: self.kind });
                true
            }
            SessionState::Active => {
                let cancelled = self.transition(SessionState::Active, SessionState::Cancelled);
                if let Some(worker) = self.worker.take() {
                    worker.abort();
                }
                cancelled
            }
            _ => false,
        }
    }

    fn finalize(&mut self) {
        if !self.transition(SessionState::Active, SessionState::Finalizing) {
            return;
        }
        tracing::info!(kind = %self.kind, frames = self.next_index, "capture session finalizing");
        if let Some(worker) = self.worker.take() {
            worker.finish();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
