use crate::foundation::core::Canvas;

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by the shader are straight (non-premultiplied) alpha. The `premultiplied`
/// flag is carried so encoders can flatten either representation correctly.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// All-zero (transparent black) frame covering `canvas`.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.rgba8_len()],
            premultiplied: false,
        }
    }

    /// Byte length of one row.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// RGBA8 pixel at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.stride() + x as usize * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
