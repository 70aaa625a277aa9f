use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, SyncSender, TrySendError};

use anyhow::Context;

use crate::encode::sink::{EncodedStream, EncoderConfig, FrameEncoder};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PrismError, PrismResult};
use crate::render::backend::FrameRGBA;

/// How an encoder thread ended.
#[derive(Debug)]
pub enum EncodeOutcome {
    /// All queued frames were written and the container finalized.
    Finished(EncodedStream),
    /// The encoder rejected a frame or failed to finalize.
    Failed(PrismError),
    /// Aborted by the owner; no output.
    Aborted,
}

/// Callback receiving the outcome on the encoder thread.
pub type Completion = Box<dyn FnOnce(EncodeOutcome) + Send>;

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    frame: Arc<FrameRGBA>,
}

/// Result of handing one frame to [`ThreadedEncoder::offer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handoff {
    /// Queued for encoding.
    Queued,
    /// The queue was full; the frame was dropped.
    Dropped,
}

/// Runs a [`FrameEncoder`] on its own thread behind a bounded queue.
///
/// `offer` never blocks: when the encoder falls behind, frames are dropped rather than stalling
/// the caller. Queued frames are encoded in the order they were offered.
///
/// Only [`ThreadedEncoder::finish`] produces output. Dropping the handle without it aborts the
/// worker, so an abandoned capture never turns into a truncated artifact.
pub struct ThreadedEncoder {
    tx: Option<SyncSender<FrameMsg>>,
    aborted: Arc<AtomicBool>,
    dropped: u64,
}

impl ThreadedEncoder {
    /// Call `begin` on the current thread, then move the encoder to a worker.
    ///
    /// `completion` runs exactly once on the worker thread after the encoder finishes, fails,
    /// or is aborted.
    pub fn spawn(
        mut encoder: Box<dyn FrameEncoder>,
        cfg: EncoderConfig,
        queue_depth: usize,
        completion: Completion,
    ) -> PrismResult<Self> {
        encoder.begin(cfg)?;

        let (tx, rx) = mpsc::sync_channel::<FrameMsg>(queue_depth.max(1));
        let aborted = Arc::new(AtomicBool::new(false));
        let abort_flag = aborted.clone();

        std::thread::Builder::new()
            .name("prismwarp-encode".into())
            .spawn(move || {
                let outcome = run_encoder(encoder.as_mut(), &rx, &abort_flag);
                drop(rx);
                drop(encoder);
                completion(outcome);
            })
            .context("spawn encoder thread")?;

        Ok(Self {
            tx: Some(tx),
            aborted,
            dropped: 0,
        })
    }

    /// Queue `frame` without blocking.
    ///
    /// Errors when the worker has already stopped (its outcome goes to the completion).
    pub fn offer(&mut self, idx: FrameIndex, frame: Arc<FrameRGBA>) -> PrismResult<Handoff> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| PrismError::encoder("encoder already closed"))?;
        match tx.try_send(FrameMsg { idx, frame }) {
            Ok(()) => Ok(Handoff::Queued),
            Err(TrySendError::Full(msg)) => {
                self.dropped += 1;
                tracing::debug!(frame = msg.idx.0, dropped = self.dropped, "encoder queue full");
                Ok(Handoff::Dropped)
            }
            Err(TrySendError::Disconnected(_)) => {
                self.tx = None;
                Err(PrismError::encoder("encoder thread stopped"))
            }
        }
    }

    /// Frames dropped under backpressure so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Close the queue; the worker drains it, finalizes and reports `Finished`.
    pub fn finish(mut self) {
        self.tx = None;
    }

    /// Stop as soon as possible and discard everything; the worker reports `Aborted`.
    pub fn abort(mut self) {
        self.aborted.store(true, Ordering::Release);
        self.tx = None;
    }
}

impl Drop for ThreadedEncoder {
    fn drop(&mut self) {
        if self.tx.is_some() {
            tracing::debug!("encoder handle dropped before finish, aborting");
            self.aborted.store(true, Ordering::Release);
        }
    }
}

fn run_encoder(
    encoder: &mut dyn FrameEncoder,
    rx: &mpsc::Receiver<FrameMsg>,
    aborted: &AtomicBool,
) -> EncodeOutcome {
    loop {
        if aborted.load(Ordering::Acquire) {
            encoder.abort();
            return EncodeOutcome::Aborted;
        }
        match rx.recv() {
            Ok(msg) => {
                if let Err(e) = encoder.push_frame(msg.idx, &msg.frame) {
                    encoder.abort();
                    return EncodeOutcome::Failed(e);
                }
            }
            // Every sender is gone: either finish() or abort().
            Err(mpsc::RecvError) => {
                if aborted.load(Ordering::Acquire) {
                    encoder.abort();
                    return EncodeOutcome::Aborted;
                }
                return match encoder.finish() {
                    Ok(stream) => EncodeOutcome::Finished(stream),
                    Err(e) => EncodeOutcome::Failed(e),
                };
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/worker.rs"]
mod tests;
