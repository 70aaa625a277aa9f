use crate::foundation::core::Vec2;
use crate::foundation::math::{floor_mod, floor_vec, fract, mul_vec};
use crate::transform::plan::Refraction;

const CENTER: Vec2 = Vec2::new(0.5, 0.5);

// Hex lattice period: one unit wide, sqrt(3) tall.
const HEX_PERIOD: Vec2 = Vec2::new(1.0, 1.732);

/// Stage 1: warp `uv` by static spatial partitioning.
pub fn refract(uv: Vec2, r: &Refraction) -> Vec2 {
    match *r {
        Refraction::None => uv,
        Refraction::Grid { level, cells } => {
            let center = grid_tile_center(uv, cells);
            uv + mul_vec(uv - center, level)
        }
        Refraction::Hex { level, cells } => {
            let local = hex_local(mul_vec(uv, cells));
            uv + mul_vec(local, level)
        }
        Refraction::Radial { level, rings } => {
            let rel = uv - CENTER;
            let r = floor_mod(rel.hypot() * rings, 1.0);
            uv + rel * (r * level)
        }
        Refraction::Diamond { level, bands } => {
            let rel = uv - CENTER;
            let dist = rel.x.abs() + rel.y.abs();
            uv + rel * (fract(dist * bands) * level)
        }
    }
}

/// Center of the lattice tile containing `uv`. `cells` must be positive.
pub fn grid_tile_center(uv: Vec2, cells: Vec2) -> Vec2 {
    let origin = floor_vec(mul_vec(uv, cells));
    Vec2::new(
        (origin.x + 0.5) / cells.x,
        (origin.y + 0.5) / cells.y,
    )
}

/// Offset of `p` from its nearest hexagon center.
///
/// Two rectangular lattices, the second shifted by half a period, each propose a center; the
/// closer one wins.
pub fn hex_local(p: Vec2) -> Vec2 {
    let half = HEX_PERIOD * 0.5;
    let a = Vec2::new(
        floor_mod(p.x, HEX_PERIOD.x),
        floor_mod(p.y, HEX_PERIOD.y),
    ) - half;
    let shifted = p - half;
    let b = Vec2::new(
        floor_mod(shifted.x, HEX_PERIOD.x),
        floor_mod(shifted.y, HEX_PERIOD.y),
    ) - half;
    if a.hypot() < b.hypot() { a } else { b }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/refract.rs"]
mod tests;
