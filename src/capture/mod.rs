//! Capture sessions: bounded-duration tick listeners that encode frames into one artifact.
//!
//! A [`Recorder`](recorder::Recorder) owns the single capture slot. At most one session of either
//! kind is armed or active at a time.

/// Finished outputs and their naming.
pub mod artifact;
/// Time sources.
pub mod clock;
/// Single-slot coordinator and tick listener.
pub mod recorder;
/// Session state machine.
pub mod session;

pub use artifact::{Artifact, ArtifactKind};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use recorder::Recorder;
pub use session::{CaptureEvent, CaptureOpts, CaptureSession, Offer, SessionState};
