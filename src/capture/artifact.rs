use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Kind of finished output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Streaming video container (WebM or MP4).
    Video,
    /// Palette-quantized animation (GIF).
    PaletteAnimation,
    /// Single high-resolution still (PNG).
    Still,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Video => "video",
            Self::PaletteAnimation => "palette-animation",
            Self::Still => "still",
        })
    }
}

/// Immutable encoded output delivered to the caller.
#[derive(Clone, Debug)]
pub struct Artifact {
    /// What produced it.
    pub kind: ArtifactKind,
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Suggested download name.
    pub filename: String,
    /// Encoded bytes.
    pub bytes: Arc<[u8]>,
    /// Playback duration from the container's timing (zero for stills).
    pub duration: Duration,
    /// Encoded frame count.
    pub frames: u64,
}

impl Artifact {
    /// Build an artifact named after the current wall-clock time.
    pub fn new(
        kind: ArtifactKind,
        mime: &'static str,
        extension: &str,
        bytes: Vec<u8>,
        duration: Duration,
        frames: u64,
    ) -> Self {
        Self {
            kind,
            mime,
            filename: suggested_filename(kind, extension, unix_millis()),
            bytes: bytes.into(),
            duration,
            frames,
        }
    }
}

/// `render-<millis>.<ext>` for captures, `refract-render-<millis>.<ext>` for stills.
pub fn suggested_filename(kind: ArtifactKind, extension: &str, millis: u128) -> String {
    match kind {
        ArtifactKind::Still => format!("refract-render-{millis}.{extension}"),
        ArtifactKind::Video | ArtifactKind::PaletteAnimation => {
            format!("render-{millis}.{extension}")
        }
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/capture/artifact.rs"]
mod tests;
