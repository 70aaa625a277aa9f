use std::io::Cursor;
use std::time::Duration;

use anyhow::Context;

use crate::assets::decode::Texture;
use crate::capture::artifact::{Artifact, ArtifactKind};
use crate::foundation::core::Canvas;
use crate::foundation::error::{PrismError, PrismResult};
use crate::preset::model::Preset;
use crate::render::shade::render_frame;
use crate::transform::plan::TransformPlan;

/// Render one frame at `canvas * rec.highResScale` and encode it as PNG.
///
/// Independent of the render loop and of any capture session.
#[tracing::instrument(skip(texture, preset), fields(scale = preset.rec.high_res_scale))]
pub fn export_still(
    texture: &Texture,
    preset: &Preset,
    canvas: Canvas,
    time: Duration,
) -> PrismResult<Artifact> {
    let target = canvas.scaled(preset.rec.high_res_scale.max(1));
    let target = Canvas::new(target.width, target.height)?;
    let plan = TransformPlan::from_preset(preset);
    let frame = render_frame(texture, &plan, target, time.as_secs_f64());

    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data)
        .ok_or_else(|| PrismError::validation("still frame buffer does not match its size"))?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encode still as png")?;

    tracing::info!(
        width = target.width,
        height = target.height,
        bytes = png.len(),
        "still exported"
    );
    Ok(Artifact::new(
        ArtifactKind::Still,
        "image/png",
        "png",
        png,
        Duration::ZERO,
        1,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/still.rs"]
mod tests;
