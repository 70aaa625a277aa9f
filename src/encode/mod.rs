//! Frame encoders and the non-blocking handoff used by capture sessions.

/// Video encoding through the system `ffmpeg`.
pub mod ffmpeg;
/// Palette-animation (GIF) encoding.
pub mod palette;
/// Encoder contract and an in-memory encoder.
pub mod sink;
/// Encoder thread fed by a bounded queue.
pub mod worker;

pub use ffmpeg::{FfmpegEncoder, FfmpegEncoderOpts, VideoContainer, is_ffmpeg_on_path};
pub use palette::{PaletteEncoder, PaletteEncoderOpts};
pub use sink::{CapturedFrames, EncodedStream, EncoderConfig, FrameEncoder, InMemoryEncoder};
