use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use crate::assets::decode::Texture;
use crate::capture::clock::Clock;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::PrismResult;
use crate::preset::model::Preset;
use crate::render::backend::FrameRGBA;
use crate::render::sampler::FrameSampler;
use crate::render::shade::shade_surface;
use crate::transform::plan::TransformPlan;

/// Render Loop Driver state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// No texture attached yet; ticks are no-ops.
    Idle,
    /// Producing one surface per tick.
    Running,
}

/// One completed tick, handed to every [`TickListener`].
#[derive(Clone, Debug)]
pub struct Tick {
    /// 0-based tick counter.
    pub index: FrameIndex,
    /// Time since the first tick.
    pub time: Duration,
    /// The surface this tick produced.
    pub surface: Arc<FrameRGBA>,
}

/// Observer notified synchronously after every tick, in render order.
///
/// Implementations must return quickly; heavy work belongs on another thread.
pub trait TickListener: Send {
    /// Called once per completed tick.
    fn on_tick(&mut self, tick: &Tick);
}

/// Shared, atomically replaceable preset.
///
/// The loop reads the slot once at the start of each tick, so a tick never observes two
/// different presets.
#[derive(Clone, Debug)]
pub struct PresetSlot {
    current: Arc<RwLock<Arc<Preset>>>,
}

impl PresetSlot {
    /// Slot holding `preset`.
    pub fn new(preset: Preset) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(preset))),
        }
    }

    /// Latest preset.
    pub fn get(&self) -> Arc<Preset> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the preset.
    pub fn set(&self, preset: Preset) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(preset);
    }

    /// Parse `bytes` and install the result. On error the last good preset stays in place.
    pub fn load(&self, bytes: &[u8]) -> PrismResult<()> {
        let preset = Preset::load(bytes)?;
        self.set(preset);
        Ok(())
    }

    /// Replace one dotted path of the current preset. On error nothing changes.
    pub fn update(&self, path: &str, value: serde_json::Value) -> PrismResult<()> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = slot.with_value(path, value)?;
        *slot = Arc::new(next);
        Ok(())
    }
}

/// Pending source-image replacement, writable from any thread.
#[derive(Clone, Debug, Default)]
pub struct TextureSlot {
    pending: Arc<Mutex<Option<Texture>>>,
}

impl TextureSlot {
    /// Queue `texture`; it replaces the current one at the start of the next tick.
    ///
    /// Queuing twice before a tick keeps only the newer texture.
    pub fn replace(&self, texture: Texture) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(texture);
    }

    fn take(&self) -> Option<Texture> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Continuously renders the current texture through the current preset.
///
/// Owns the rendered surface and the active texture; other components read the surface through
/// [`FrameSampler`] or receive it via [`TickListener`].
pub struct RenderLoop {
    canvas: Canvas,
    preset: PresetSlot,
    textures: TextureSlot,
    texture: Option<Texture>,
    clock: Arc<dyn Clock>,
    started_at: Option<Duration>,
    next_index: u64,
    sampler: FrameSampler,
    listeners: Vec<Box<dyn TickListener>>,
}

impl RenderLoop {
    /// Idle loop rendering into `canvas`.
    pub fn new(canvas: Canvas, preset: PresetSlot, clock: Arc<dyn Clock>) -> Self {
        Self {
            canvas,
            preset,
            textures: TextureSlot::default(),
            texture: None,
            clock,
            started_at: None,
            next_index: 0,
            sampler: FrameSampler::new(),
            listeners: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> LoopState {
        if self.texture.is_some() {
            LoopState::Running
        } else {
            LoopState::Idle
        }
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Attach the initial texture, moving the loop to [`LoopState::Running`].
    ///
    /// While running, prefer [`TextureSlot::replace`] from other threads.
    pub fn attach_texture(&mut self, texture: Texture) {
        tracing::debug!(
            width = texture.width,
            height = texture.height,
            "texture attached"
        );
        self.texture = Some(texture);
    }

    /// Render-loop time now, measured like [`Tick::time`]. `None` before the first tick.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at
            .map(|started| self.clock.now().saturating_sub(started))
    }

    /// Handle for queuing texture replacements.
    pub fn texture_slot(&self) -> TextureSlot {
        self.textures.clone()
    }

    /// Handle to the live preset.
    pub fn preset_slot(&self) -> PresetSlot {
        self.preset.clone()
    }

    /// Reader for the most recent surface.
    pub fn sampler(&self) -> FrameSampler {
        self.sampler.clone()
    }

    /// Register an observer for completed ticks.
    pub fn add_listener(&mut self, listener: Box<dyn TickListener>) {
        self.listeners.push(listener);
    }

    /// Produce one surface. Returns `None` while idle.
    pub fn tick(&mut self) -> Option<Tick> {
        if let Some(texture) = self.textures.take() {
            tracing::debug!(
                width = texture.width,
                height = texture.height,
                "texture replaced"
            );
            self.texture = Some(texture);
        }
        let texture = self.texture.as_ref()?;

        let now = self.clock.now();
        let started = *self.started_at.get_or_insert(now);
        let time = now.saturating_sub(started);

        let preset = self.preset.get();
        let plan = TransformPlan::from_preset(&preset);

        let mut surface = FrameRGBA::transparent(self.canvas);
        shade_surface(texture, &plan, time.as_secs_f64(), &mut surface);

        let tick = Tick {
            index: FrameIndex(self.next_index),
            time,
            surface: Arc::new(surface),
        };
        self.next_index += 1;

        self.sampler.publish(tick.surface.clone());
        for listener in &mut self.listeners {
            listener.on_tick(&tick);
        }
        Some(tick)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/driver.rs"]
mod tests;
