use crate::foundation::core::Vec2;

/// Fractional part with floor semantics, always in `[0, 1)` for finite input.
pub(crate) fn fract(x: f64) -> f64 {
    x - x.floor()
}

/// Floored modulo (`x - y * floor(x / y)`), the sign follows `y`.
pub(crate) fn floor_mod(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub(crate) fn fract_vec(v: Vec2) -> Vec2 {
    Vec2::new(fract(v.x), fract(v.y))
}

pub(crate) fn floor_vec(v: Vec2) -> Vec2 {
    Vec2::new(v.x.floor(), v.y.floor())
}

/// Component-wise product.
pub(crate) fn mul_vec(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x * b.x, a.y * b.y)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
