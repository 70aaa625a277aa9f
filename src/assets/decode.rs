use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PrismError, PrismResult};

/// Decoded source texture.
///
/// Pixels are straight (non-premultiplied) RGBA8, row-major, tightly packed. Cloning is cheap:
/// the pixel buffer is shared.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight-alpha RGBA8 bytes.
    pub rgba8: Arc<Vec<u8>>,
}

impl Texture {
    /// Wrap an existing RGBA8 buffer. Fails when the buffer length does not match `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> PrismResult<Self> {
        if width == 0 || height == 0 {
            return Err(PrismError::validation("texture width/height must be non-zero"));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8.len() != expected {
            return Err(PrismError::validation(format!(
                "texture buffer is {} bytes, expected {expected} for {width}x{height}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// Procedural checkerboard with a colour gradient, used when no image is supplied.
    pub fn test_card(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let cell = (width.min(height) / 8).max(1);
        let mut rgba8 = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for y in 0..height {
            for x in 0..width {
                let on = ((x / cell) + (y / cell)) % 2 == 0;
                let r = (x * 255 / (width - 1).max(1)) as u8;
                let g = (y * 255 / (height - 1).max(1)) as u8;
                let b = if on { 230 } else { 40 };
                rgba8.extend_from_slice(&[r, g, b, 255]);
            }
        }
        Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        }
    }

    /// Straight-alpha texel at integer coordinates. Caller guarantees bounds.
    pub(crate) fn texel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width as usize + x) * 4;
        [
            self.rgba8[i],
            self.rgba8[i + 1],
            self.rgba8[i + 2],
            self.rgba8[i + 3],
        ]
    }
}

/// Decode PNG/JPEG/GIF/WebP/... bytes into a [`Texture`].
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_texture(bytes: &[u8]) -> PrismResult<Texture> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, "decoded texture");
    Texture::from_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
