use crate::foundation::core::Vec2;
use crate::foundation::math::{floor_mod, fract};
use crate::preset::model::WrapMode;

/// Resolve a sample coordinate into the unit square.
///
/// `None` means the coordinate falls on the border (only [`WrapMode::Border`] produces it).
pub fn wrap_uv(uv: Vec2, mode: WrapMode) -> Option<Vec2> {
    match mode {
        WrapMode::Repeat | WrapMode::Tile => Some(Vec2::new(fract(uv.x), fract(uv.y))),
        WrapMode::Mirror => Some(Vec2::new(mirror(uv.x), mirror(uv.y))),
        WrapMode::Clamp => Some(Vec2::new(uv.x.clamp(0.0, 1.0), uv.y.clamp(0.0, 1.0))),
        WrapMode::Border => {
            let inside = (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y);
            inside.then_some(uv)
        }
    }
}

/// Triangle wave with period 2: `[0,1]` maps to itself, `[1,2]` runs backwards.
fn mirror(x: f64) -> f64 {
    let m = floor_mod(x, 2.0);
    if m > 1.0 { 2.0 - m } else { m }
}

/// Map an integer texel index into `[0, len)` following the wrap policy.
pub(crate) fn wrap_texel(i: i64, len: u32, mode: WrapMode) -> usize {
    let n = i64::from(len.max(1));
    let idx = match mode {
        WrapMode::Repeat | WrapMode::Tile => i.rem_euclid(n),
        WrapMode::Mirror => {
            let m = i.rem_euclid(2 * n);
            if m >= n { 2 * n - 1 - m } else { m }
        }
        WrapMode::Clamp | WrapMode::Border => i.clamp(0, n - 1),
    };
    idx as usize
}

#[cfg(test)]
#[path = "../../tests/unit/transform/wrap.rs"]
mod tests;
