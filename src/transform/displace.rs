use crate::foundation::core::Vec2;
use crate::foundation::math::{floor_vec, fract_vec, mul_vec};
use crate::transform::noise::{fbm, noise, rand};
use crate::transform::plan::{
    BoxParams, Displacement, FlowParams, GlitchParams, RadialParams, SineParams, VoronoiParams,
};
use std::f64::consts::TAU;

const CENTER: Vec2 = Vec2::new(0.5, 0.5);

// Unit scalings applied to preset magnitudes so slider-sized numbers stay small in uv space.
const BOX_AMP_SCALE: f64 = 0.001;
const BOX_SPEED_SCALE: f64 = 0.1;
const FLOW_AMP_SCALE: f64 = 0.01;
const FLOW_SPEED_SCALE: f64 = 0.01;
const FLOW_DECORRELATE: Vec2 = Vec2::new(1.5, 1.5);
const SINE_AMP_SCALE: f64 = 0.001;
const WHIRL_ANGLE_SCALE: f64 = 8.0;
const GLITCH_ROWS: f64 = 50.0;
const GLITCH_GATE: f64 = 0.8;
const VORONOI_OFFSET_SCALE: f64 = 0.1;

/// Stage 2: additive offset for the refracted coordinate `uv` at time `t` (seconds).
///
/// `seed` is the preset seed normalized into `[0, 1]`.
pub fn displace(uv: Vec2, t: f64, d: &Displacement, seed: f64) -> Vec2 {
    match d {
        Displacement::Box(p) => box_offset(uv, t, p),
        Displacement::Flow(p) => flow_offset(uv, t, p),
        Displacement::Sine(p) => sine_offset(uv, t, p),
        Displacement::Whirl(p) => whirl_offset(uv, t, p),
        Displacement::Pinch(p) => pinch_offset(uv, t, p),
        Displacement::Glitch(p) => glitch_offset(uv, t, p),
        Displacement::Voronoi(p) => voronoi_offset(uv, t, p, seed),
        Displacement::Liquid => Vec2::ZERO,
    }
}

fn box_offset(uv: Vec2, t: f64, p: &BoxParams) -> Vec2 {
    let cell = floor_vec(mul_vec(uv, p.freq) + p.speed * (t * BOX_SPEED_SCALE));
    Vec2::new(
        cell.x.sin() * p.amp.x * BOX_AMP_SCALE,
        cell.y.cos() * p.amp.y * BOX_AMP_SCALE,
    )
}

fn flow_offset(uv: Vec2, t: f64, p: &FlowParams) -> Vec2 {
    let q = uv * p.freq + p.speed * (t * FLOW_SPEED_SCALE);
    let n1 = fbm(q, p.octaves);
    let n2 = fbm(q + FLOW_DECORRELATE, p.octaves);
    mul_vec(Vec2::new(n1 - 0.5, n2 - 0.5), p.amp) * FLOW_AMP_SCALE
}

fn sine_offset(uv: Vec2, t: f64, p: &SineParams) -> Vec2 {
    Vec2::new(
        (uv.y * p.freq.x + t * p.cycle.x).sin() * p.amp.x * SINE_AMP_SCALE,
        (uv.x * p.freq.y + t * p.cycle.y).cos() * p.amp.y * SINE_AMP_SCALE,
    )
}

/// Normalized depth inside `radius`: `1` at the center, `0` at and beyond the edge.
///
/// `None` outside the radius or when the radius is not positive.
fn falloff(rel: Vec2, radius: f64) -> Option<f64> {
    if radius <= 0.0 {
        return None;
    }
    let dist = rel.hypot();
    (dist < radius).then(|| (radius - dist) / radius)
}

fn whirl_offset(uv: Vec2, t: f64, p: &RadialParams) -> Vec2 {
    let rel = uv - CENTER;
    let Some(percent) = falloff(rel, p.radius) else {
        return Vec2::ZERO;
    };
    let theta = percent * percent * p.strength * WHIRL_ANGLE_SCALE * (t * p.speed).sin();
    let (s, c) = theta.sin_cos();
    let rotated = Vec2::new(rel.x * c - rel.y * s, rel.x * s + rel.y * c);
    rotated - rel
}

fn pinch_offset(uv: Vec2, t: f64, p: &RadialParams) -> Vec2 {
    let rel = uv - CENTER;
    let Some(percent) = falloff(rel, p.radius) else {
        return Vec2::ZERO;
    };
    rel * (percent * p.strength * (t * p.speed).sin())
}

fn glitch_offset(uv: Vec2, t: f64, p: &GlitchParams) -> Vec2 {
    let gate = noise(Vec2::new(t * p.frequency, (uv.y * GLITCH_ROWS).floor()));
    if gate > GLITCH_GATE {
        Vec2::new((rand(Vec2::new(t, t)) - 0.5) * p.amount, 0.0)
    } else {
        Vec2::ZERO
    }
}

fn voronoi_offset(uv: Vec2, t: f64, p: &VoronoiParams, seed: f64) -> Vec2 {
    let feature = nearest_feature(uv * p.scale, t, p, seed);
    (feature - CENTER) * VORONOI_OFFSET_SCALE
}

/// Cell-local feature point nearest to `q` over the 3x3 neighborhood of its cell.
fn nearest_feature(q: Vec2, t: f64, p: &VoronoiParams, seed: f64) -> Vec2 {
    let cell = floor_vec(q);
    let local = fract_vec(q);
    let seed = Vec2::new(seed, seed);

    let mut min_dist = 1.0;
    let mut nearest = Vec2::ZERO;
    for j in -1..=1 {
        for i in -1..=1 {
            let neighbor = Vec2::new(f64::from(i), f64::from(j));
            let r = rand(cell + neighbor + seed) * p.jitter;
            let point = neighbor + Vec2::new(r, r);
            let point = Vec2::new(
                0.5 + 0.5 * (t * p.speed + TAU * point.x).sin(),
                0.5 + 0.5 * (t * p.speed + TAU * point.y).sin(),
            );
            let d = (neighbor + point - local).hypot();
            if d < min_dist {
                min_dist = d;
                nearest = point;
            }
        }
    }
    nearest
}

#[cfg(test)]
#[path = "../../tests/unit/transform/displace.rs"]
mod tests;
