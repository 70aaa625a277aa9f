//! prismwarp renders an image through a two-stage procedural coordinate transform and records the
//! animated result.
//!
//! - Load or build a [`Preset`] (refraction family, displacement family, wrap mode, recording
//!   length)
//! - Drive a [`RenderLoop`] (directly, or on a [`RenderThread`]) over a decoded [`Texture`]
//! - Attach a [`Recorder`] to capture a video or palette animation, or call [`export_still`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Source texture decoding.
pub mod assets;
/// Capture sessions and artifacts.
pub mod capture;
/// Frame encoders.
pub mod encode;
/// Shared value types and errors.
pub mod foundation;
/// Parameter model.
pub mod preset;
/// Render loop, sampler and still export.
pub mod render;
/// Coordinate transform evaluator.
pub mod transform;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Vec2};
pub use crate::foundation::error::{PrismError, PrismResult};

pub use crate::assets::decode::{Texture, decode_texture};
pub use crate::capture::artifact::{Artifact, ArtifactKind};
pub use crate::capture::clock::{Clock, ManualClock, MonotonicClock};
pub use crate::capture::recorder::Recorder;
pub use crate::capture::session::{CaptureEvent, CaptureOpts, SessionState};
pub use crate::encode::ffmpeg::{FfmpegEncoder, FfmpegEncoderOpts, VideoContainer};
pub use crate::encode::palette::{PaletteEncoder, PaletteEncoderOpts};
pub use crate::encode::sink::{EncoderConfig, FrameEncoder, InMemoryEncoder};
pub use crate::preset::factory::{factory_names, factory_preset};
pub use crate::preset::model::Preset;
pub use crate::render::backend::FrameRGBA;
pub use crate::render::driver::{LoopState, PresetSlot, RenderLoop, TextureSlot, Tick, TickListener};
pub use crate::render::sampler::FrameSampler;
pub use crate::render::still::export_still;
pub use crate::render::thread::{RenderThread, RenderThreadOpts};
pub use crate::transform::evaluator::{SampleCoord, evaluate};
pub use crate::transform::plan::TransformPlan;
