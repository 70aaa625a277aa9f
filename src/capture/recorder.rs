use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::capture::artifact::ArtifactKind;
use crate::capture::session::{
    CaptureEvent, CaptureOpts, CaptureSession, EventSink, SessionState, event_sink,
};
use crate::encode::ffmpeg::{FfmpegEncoder, FfmpegEncoderOpts};
use crate::encode::palette::PaletteEncoder;
use crate::encode::sink::FrameEncoder;
use crate::foundation::error::{PrismError, PrismResult};
use crate::preset::model::Preset;
use crate::render::driver::{Tick, TickListener};

#[derive(Default)]
struct Slot {
    session: Option<CaptureSession>,
}

/// Owns the single capture slot and feeds the session from render ticks.
///
/// Clones share the slot: register one clone with the render loop as a [`TickListener`] and keep
/// another to start, stop or cancel recordings. The event callback runs on the render thread or
/// an encoder thread and must not call back into the recorder.
#[derive(Clone)]
pub struct Recorder {
    slot: Arc<Mutex<Slot>>,
    events: EventSink,
    opts: CaptureOpts,
}

impl Recorder {
    /// Recorder delivering every [`CaptureEvent`] to `on_event`.
    pub fn new(opts: CaptureOpts, on_event: impl FnMut(CaptureEvent) + Send + 'static) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            events: event_sink(on_event),
            opts,
        }
    }

    /// Recorder delivering events to the returned receiver.
    pub fn with_channel(opts: CaptureOpts) -> (Self, mpsc::Receiver<CaptureEvent>) {
        let (tx, rx) = mpsc::channel();
        let recorder = Self::new(opts, move |event| {
            if tx.send(event).is_err() {
                tracing::debug!("capture event receiver dropped");
            }
        });
        (recorder, rx)
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm a session that records for `length` once the next tick arrives.
    ///
    /// Fails with [`PrismError::SessionBusy`] while another session is armed or active; the
    /// running session is left untouched.
    pub fn start(&self, encoder: Box<dyn FrameEncoder>, length: Duration) -> PrismResult<()> {
        if length.is_zero() {
            return Err(PrismError::validation("capture length must be positive"));
        }
        let mut slot = self.lock();
        if let Some(active) = slot.session.as_ref()
            && active.state().holds_slot()
        {
            return Err(PrismError::SessionBusy {
                active: active.kind(),
            });
        }
        tracing::info!(
            kind = %encoder.kind(),
            length_secs = length.as_secs_f64(),
            "capture session armed"
        );
        slot.session = Some(CaptureSession::arm(
            encoder,
            length,
            &self.opts,
            self.events.clone(),
        ));
        Ok(())
    }

    /// Record a video for `rec.length` of `preset`.
    pub fn start_video(&self, opts: FfmpegEncoderOpts, preset: &Preset) -> PrismResult<()> {
        self.start(Box::new(FfmpegEncoder::new(opts)), preset.capture_length())
    }

    /// Record a palette animation for `rec.length` of `preset`.
    pub fn start_palette(&self, preset: &Preset) -> PrismResult<()> {
        self.start(
            Box::new(PaletteEncoder::new(self.opts.palette_encoder_opts())),
            preset.capture_length(),
        )
    }

    /// Finalize the current session early. Returns `false` when nothing was recording.
    pub fn stop(&self) -> bool {
        self.lock().session.as_mut().is_some_and(|s| s.stop())
    }

    /// Finalize a session whose length has elapsed at `now` even when no tick arrives.
    ///
    /// `now` is render-loop time, as reported by [`crate::RenderLoop::elapsed`]. Returns `true`
    /// when a session started finalizing.
    pub fn poll(&self, now: Duration) -> bool {
        self.lock().session.as_mut().is_some_and(|s| s.poll(now))
    }

    /// Cancel the current session without producing an artifact.
    pub fn cancel(&self) -> bool {
        self.lock().session.as_mut().is_some_and(|s| s.cancel())
    }

    /// Whether a session currently holds the slot.
    pub fn is_busy(&self) -> bool {
        self.state().is_some_and(SessionState::holds_slot)
    }

    /// State of the most recent session, if any.
    pub fn state(&self) -> Option<SessionState> {
        self.lock().session.as_ref().map(CaptureSession::state)
    }

    /// Kind of the most recent session, if any.
    pub fn kind(&self) -> Option<ArtifactKind> {
        self.lock().session.as_ref().map(CaptureSession::kind)
    }
}

impl TickListener for Recorder {
    fn on_tick(&mut self, tick: &Tick) {
        if let Some(session) = self.lock().session.as_mut() {
            session.offer(tick.time, &tick.surface);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/recorder.rs"]
mod tests;
