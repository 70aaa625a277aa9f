use std::borrow::Cow;
use std::time::Duration;

use crate::capture::artifact::ArtifactKind;
use crate::encode::sink::{EncodedStream, EncoderConfig, FrameEncoder};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PrismError, PrismResult};
use crate::render::backend::FrameRGBA;

/// Options for [`PaletteEncoder`].
#[derive(Clone, Copy, Debug)]
pub struct PaletteEncoderOpts {
    /// Display time of each frame in milliseconds. Stored with GIF's 10 ms resolution.
    pub delay_ms: u32,
    /// NeuQuant sampling factor, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for PaletteEncoderOpts {
    fn default() -> Self {
        Self {
            delay_ms: 33,
            speed: 10,
        }
    }
}

impl PaletteEncoderOpts {
    /// Frame delay in GIF centiseconds (rounded, at least 1).
    pub fn delay_centis(&self) -> u16 {
        u16::try_from(self.delay_ms.saturating_add(5) / 10)
            .unwrap_or(u16::MAX)
            .max(1)
    }
}

/// One palette-quantized frame.
#[derive(Clone, Debug)]
pub struct IndexedFrame {
    /// Local palette, RGB triples (at most 256 entries).
    pub palette: Vec<u8>,
    /// One palette index per pixel.
    pub indices: Vec<u8>,
    /// Palette index used for fully transparent pixels, if any.
    pub transparent: Option<u8>,
}

/// Reduce `frame` to at most 256 colors with its own palette.
pub fn quantize_frame(frame: &FrameRGBA, speed: i32) -> PrismResult<IndexedFrame> {
    let (w, h) = gif_dims(frame.width, frame.height)?;
    if frame.data.len() != frame.width as usize * frame.height as usize * 4 {
        return Err(PrismError::encoder("frame.data size mismatch with width*height*4"));
    }
    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_in_place(&mut rgba);
    }
    let q = ::gif::Frame::from_rgba_speed(w, h, &mut rgba, speed.clamp(1, 30));
    Ok(IndexedFrame {
        palette: q.palette.unwrap_or_default(),
        indices: q.buffer.into_owned(),
        transparent: q.transparent,
    })
}

/// Palette-animation encoder: per-frame quantization, fixed delay, infinite loop.
///
/// Every frame carries its own local palette, so colors can shift between frames.
pub struct PaletteEncoder {
    opts: PaletteEncoderOpts,
    encoder: Option<::gif::Encoder<Vec<u8>>>,
    dims: (u16, u16),
    frames: u64,
}

impl PaletteEncoder {
    /// New encoder; nothing is allocated until `begin`.
    pub fn new(opts: PaletteEncoderOpts) -> Self {
        Self {
            opts,
            encoder: None,
            dims: (0, 0),
            frames: 0,
        }
    }
}

impl FrameEncoder for PaletteEncoder {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::PaletteAnimation
    }

    fn mime(&self) -> &'static str {
        "image/gif"
    }

    fn extension(&self) -> &'static str {
        "gif"
    }

    fn begin(&mut self, cfg: EncoderConfig) -> PrismResult<()> {
        let (w, h) = gif_dims(cfg.width, cfg.height)?;
        let mut encoder = ::gif::Encoder::new(Vec::new(), w, h, &[])
            .map_err(|e| PrismError::encoder(format!("create gif encoder: {e}")))?;
        encoder
            .set_repeat(::gif::Repeat::Infinite)
            .map_err(|e| PrismError::encoder(format!("set gif repeat: {e}")))?;
        self.encoder = Some(encoder);
        self.dims = (w, h);
        self.frames = 0;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameRGBA) -> PrismResult<()> {
        let (w, h) = self.dims;
        if frame.width != u32::from(w) || frame.height != u32::from(h) {
            return Err(PrismError::encoder(format!(
                "frame size mismatch: got {}x{}, expected {w}x{h}",
                frame.width, frame.height
            )));
        }
        let indexed = quantize_frame(frame, self.opts.speed)?;
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| PrismError::encoder("palette encoder not started"))?;

        let out = ::gif::Frame {
            width: w,
            height: h,
            delay: self.opts.delay_centis(),
            palette: Some(indexed.palette),
            transparent: indexed.transparent,
            buffer: Cow::Owned(indexed.indices),
            ..::gif::Frame::default()
        };
        encoder
            .write_frame(&out)
            .map_err(|e| PrismError::encoder(format!("write gif frame: {e}")))?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> PrismResult<EncodedStream> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| PrismError::encoder("palette encoder not started"))?;
        let bytes = encoder
            .into_inner()
            .map_err(|e| PrismError::encoder(format!("write gif trailer: {e}")))?;
        let per_frame = Duration::from_millis(u64::from(self.opts.delay_centis()) * 10);
        Ok(EncodedStream {
            bytes,
            frames: self.frames,
            duration: per_frame.saturating_mul(u32::try_from(self.frames).unwrap_or(u32::MAX)),
        })
    }

    fn abort(&mut self) {
        self.encoder = None;
        self.frames = 0;
    }
}

fn gif_dims(width: u32, height: u32) -> PrismResult<(u16, u16)> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(PrismError::encoder(format!(
            "gif frames must be between 1x1 and 65535x65535, got {width}x{height}"
        ))),
    }
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/palette.rs"]
mod tests;
