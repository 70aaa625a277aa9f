//! Render Loop Driver and everything that reads or writes the rendered surface.

/// Rendered frame type.
pub mod backend;
/// Render Loop Driver state machine and tick observers.
pub mod driver;
/// Most-recent-surface reader.
pub mod sampler;
/// Parallel per-pixel shading of a surface.
pub mod shade;
/// High-resolution single-frame export.
pub mod still;
/// Dedicated render thread.
pub mod thread;

pub use backend::FrameRGBA;
pub use driver::{LoopState, PresetSlot, RenderLoop, TextureSlot, Tick, TickListener};
pub use sampler::FrameSampler;
pub use shade::{render_frame, shade_surface};
pub use still::export_still;
pub use thread::{RenderThread, RenderThreadOpts};
