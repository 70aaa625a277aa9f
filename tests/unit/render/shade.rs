use super::*;
use crate::transform::plan::{Displacement, GlitchParams, Refraction};

fn strip() -> Texture {
    Texture::from_rgba8(
        4,
        1,
        vec![
            0, 0, 0, 255, //
            10, 20, 30, 255, //
            40, 50, 60, 255, //
            70, 80, 90, 255,
        ],
    )
    .unwrap()
}

fn identity_plan(wrap: WrapMode) -> TransformPlan {
    TransformPlan {
        seed: 0.0,
        wrap,
        refraction: Refraction::None,
        displacement: Displacement::Liquid,
    }
}

#[test]
fn identity_plan_reproduces_the_texture_at_native_size() {
    let tex = Texture::test_card(8, 6);
    let frame = render_frame(
        &tex,
        &identity_plan(WrapMode::Clamp),
        Canvas::new(8, 6).unwrap(),
        3.0,
    );
    assert_eq!(frame.data.as_slice(), tex.rgba8.as_slice());
    assert!(!frame.premultiplied);
}

#[test]
fn border_outside_unit_square_is_transparent() {
    let tex = strip();
    assert_eq!(sample(&tex, Vec2::new(1.5, 0.5), WrapMode::Border), [0, 0, 0, 0]);
    assert_eq!(sample(&tex, Vec2::new(-0.1, 0.5), WrapMode::Border), [0, 0, 0, 0]);
    assert_ne!(sample(&tex, Vec2::new(0.625, 0.5), WrapMode::Border), [0, 0, 0, 0]);
}

#[test]
fn repeat_samples_the_fractional_part() {
    let tex = strip();
    assert_eq!(
        sample(&tex, Vec2::new(1.625, 0.5), WrapMode::Repeat),
        sample(&tex, Vec2::new(0.625, 0.5), WrapMode::Repeat)
    );
}

#[test]
fn bilinear_filter_blends_neighbouring_texels() {
    let tex = strip();
    // Halfway between texel 1 and texel 2.
    let px = sample(&tex, Vec2::new(0.5, 0.5), WrapMode::Clamp);
    assert_eq!(px, [25, 35, 45, 255]);
}

#[test]
fn channel_split_shifts_red_and_blue_in_opposite_directions() {
    let tex = strip();
    let plan = TransformPlan {
        seed: 0.0,
        wrap: WrapMode::Repeat,
        refraction: Refraction::None,
        displacement: Displacement::Glitch(GlitchParams {
            frequency: 0.0,
            amount: 0.0,
            split: 0.25,
        }),
    };
    let frame = render_frame(&tex, &plan, Canvas::new(4, 1).unwrap(), 0.0);
    // Pixel 1: red from texel 2, green from texel 1, blue from texel 0.
    assert_eq!(frame.pixel(1, 0), Some([40, 20, 0, 255]));
}

#[test]
fn upscaled_render_covers_every_pixel() {
    let tex = Texture::test_card(4, 4);
    let frame = render_frame(
        &tex,
        &identity_plan(WrapMode::Mirror),
        Canvas::new(16, 12).unwrap(),
        0.0,
    );
    assert_eq!(frame.data.len(), 16 * 12 * 4);
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
}
