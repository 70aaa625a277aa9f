//! Hash-based pseudo-random and value-noise functions.
//!
//! These are stateless: equal inputs give equal outputs on one machine. They are not meant to be
//! bit-identical across floating-point environments.
use crate::foundation::core::Vec2;
use crate::foundation::math::{fract, lerp};

/// Upper bound on fBm octaves.
pub const MAX_OCTAVES: u32 = 8;

const FBM_SHIFT: f64 = 100.0;

/// Pseudo-random value in `[0, 1)` for a 2D input.
pub fn rand(n: Vec2) -> f64 {
    fract((n.x * 12.9898 + n.y * 4.1414).sin() * 43758.5453)
}

/// Smooth value noise in `[0, 1]`.
pub fn noise(p: Vec2) -> f64 {
    let i = Vec2::new(p.x.floor(), p.y.floor());
    let f = p - i;
    let u = Vec2::new(f.x * f.x * (3.0 - 2.0 * f.x), f.y * f.y * (3.0 - 2.0 * f.y));

    let a = rand(i);
    let b = rand(i + Vec2::new(1.0, 0.0));
    let c = rand(i + Vec2::new(0.0, 1.0));
    let d = rand(i + Vec2::new(1.0, 1.0));
    lerp(lerp(a, b, u.x), lerp(c, d, u.x), u.y)
}

/// Clamp a requested octave count into `[1, MAX_OCTAVES]`.
pub fn clamp_octaves(requested: i64) -> u32 {
    requested.clamp(1, i64::from(MAX_OCTAVES)) as u32
}

/// Fractional Brownian motion over [`noise`].
///
/// `octaves` is clamped into `[1, MAX_OCTAVES]`.
pub fn fbm(mut p: Vec2, octaves: u32) -> f64 {
    let octaves = octaves.clamp(1, MAX_OCTAVES);
    let shift = Vec2::new(FBM_SHIFT, FBM_SHIFT);
    let mut v = 0.0;
    let mut a = 0.5;
    for _ in 0..octaves {
        v += a * noise(p);
        p = p * 2.0 + shift;
        a *= 0.5;
    }
    v
}

#[cfg(test)]
#[path = "../../tests/unit/transform/noise.rs"]
mod tests;
