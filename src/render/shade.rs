use rayon::prelude::*;

use crate::assets::decode::Texture;
use crate::foundation::core::{Canvas, Vec2};
use crate::foundation::math::lerp;
use crate::preset::model::WrapMode;
use crate::render::backend::FrameRGBA;
use crate::transform::evaluator::evaluate;
use crate::transform::plan::TransformPlan;
use crate::transform::wrap::{wrap_texel, wrap_uv};

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Evaluate the transform for every pixel of `out` and write the sampled colors.
///
/// Rows are shaded in parallel; each pixel samples at its center.
pub fn shade_surface(texture: &Texture, plan: &TransformPlan, t: f64, out: &mut FrameRGBA) {
    let (w, h) = (out.width, out.height);
    if w == 0 || h == 0 {
        return;
    }
    let stride = out.stride();
    out.premultiplied = false;
    out.data
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let v = (y as f64 + 0.5) / f64::from(h);
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let uv = Vec2::new((x as f64 + 0.5) / f64::from(w), v);
                px.copy_from_slice(&shade_pixel(texture, plan, uv, t));
            }
        });
}

/// Allocate and shade a fresh frame of `canvas` size.
pub fn render_frame(texture: &Texture, plan: &TransformPlan, canvas: Canvas, t: f64) -> FrameRGBA {
    let mut frame = FrameRGBA::transparent(canvas);
    shade_surface(texture, plan, t, &mut frame);
    frame
}

fn shade_pixel(texture: &Texture, plan: &TransformPlan, uv: Vec2, t: f64) -> [u8; 4] {
    let s = evaluate(uv, t, plan);
    let base = s.unwrapped();
    match s.split {
        None => sample(texture, base, plan.wrap),
        Some(split) => {
            let shift = Vec2::new(split, 0.0);
            let r = sample(texture, base + shift, plan.wrap);
            let g = sample(texture, base, plan.wrap);
            let b = sample(texture, base - shift, plan.wrap);
            [r[0], g[1], b[2], 255]
        }
    }
}

/// Wrap `uv` and bilinearly sample the texture; transparent black on the border.
pub(crate) fn sample(texture: &Texture, uv: Vec2, mode: WrapMode) -> [u8; 4] {
    let Some(uv) = wrap_uv(uv, mode) else {
        return TRANSPARENT;
    };

    let fx = uv.x * f64::from(texture.width) - 0.5;
    let fy = uv.y * f64::from(texture.height) - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let xs = [
        wrap_texel(x0 as i64, texture.width, mode),
        wrap_texel(x0 as i64 + 1, texture.width, mode),
    ];
    let ys = [
        wrap_texel(y0 as i64, texture.height, mode),
        wrap_texel(y0 as i64 + 1, texture.height, mode),
    ];

    let p00 = texture.texel(xs[0], ys[0]);
    let p10 = texture.texel(xs[1], ys[0]);
    let p01 = texture.texel(xs[0], ys[1]);
    let p11 = texture.texel(xs[1], ys[1]);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = lerp(f64::from(p00[c]), f64::from(p10[c]), tx);
        let bottom = lerp(f64::from(p01[c]), f64::from(p11[c]), tx);
        let v = lerp(top, bottom, ty);
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/shade.rs"]
mod tests;
