use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::foundation::error::{PrismError, PrismResult};
use crate::render::driver::RenderLoop;

/// Options for [`RenderThread`].
#[derive(Clone, Debug)]
pub struct RenderThreadOpts {
    /// Target ticks per second.
    pub refresh_hz: u32,
}

impl Default for RenderThreadOpts {
    fn default() -> Self {
        Self { refresh_hz: 60 }
    }
}

/// Drives a [`RenderLoop`] on a dedicated thread at a fixed refresh rate.
pub struct RenderThread {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<RenderLoop>,
}

impl RenderThread {
    /// Move `render_loop` onto a new thread and start ticking.
    pub fn spawn(mut render_loop: RenderLoop, opts: RenderThreadOpts) -> PrismResult<Self> {
        if opts.refresh_hz == 0 {
            return Err(PrismError::validation("refresh_hz must be > 0"));
        }
        let interval = Duration::from_secs_f64(1.0 / f64::from(opts.refresh_hz));
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = std::thread::Builder::new()
            .name("prismwarp-render".into())
            .spawn(move || {
                tracing::info!(refresh_hz = opts.refresh_hz, "render thread started");
                while !stop_flag.load(Ordering::Acquire) {
                    let started = Instant::now();
                    render_loop.tick();
                    std::thread::sleep(interval.saturating_sub(started.elapsed()));
                }
                tracing::info!("render thread stopped");
                render_loop
            })
            .context("spawn render thread")?;

        Ok(Self { stop, handle })
    }

    /// Stop after the in-flight tick and hand the loop back.
    pub fn stop(self) -> PrismResult<RenderLoop> {
        self.stop.store(true, Ordering::Release);
        self.handle
            .join()
            .map_err(|_| PrismError::Other(anyhow::anyhow!("render thread panicked")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/thread.rs"]
mod tests;
