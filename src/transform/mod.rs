//! Coordinate transform evaluator: refraction followed by time-varying displacement.

/// Displacement families (stage 2).
pub mod displace;
/// Per-pixel evaluation entry point.
pub mod evaluator;
/// Hash-based noise primitives.
pub mod noise;
/// Tagged-union compile of a preset.
pub mod plan;
/// Refraction families (stage 1).
pub mod refract;
/// Out-of-range coordinate policies.
pub mod wrap;
