use std::io::Read;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::capture::artifact::ArtifactKind;
use crate::encode::sink::{EncodedStream, EncoderConfig, FrameEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{PrismError, PrismResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

/// Streaming video container produced by [`FfmpegEncoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VideoContainer {
    /// VP9 in WebM.
    #[default]
    WebM,
    /// H.264 in fragmented MP4.
    Mp4,
}

impl VideoContainer {
    /// MIME type of the container.
    pub fn mime(self) -> &'static str {
        match self {
            Self::WebM => "video/webm",
            Self::Mp4 => "video/mp4",
        }
    }

    /// File extension of the container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::WebM => "webm",
            Self::Mp4 => "mp4",
        }
    }

    fn output_args(self) -> &'static [&'static str] {
        match self {
            Self::WebM => &[
                "-c:v",
                "libvpx-vp9",
                "-pix_fmt",
                "yuv420p",
                "-deadline",
                "realtime",
                "-cpu-used",
                "8",
                "-b:v",
                "0",
                "-crf",
                "32",
                "-f",
                "webm",
            ],
            // Non-seekable output needs a fragmented MP4.
            Self::Mp4 => &[
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-preset",
                "veryfast",
                "-movflags",
                "frag_keyframe+empty_moov",
                "-f",
                "mp4",
            ],
        }
    }
}

/// Options for [`FfmpegEncoder`].
#[derive(Clone, Debug)]
pub struct FfmpegEncoderOpts {
    /// Output container.
    pub container: VideoContainer,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// `ffmpeg` executable name or path.
    pub program: String,
}

impl Default for FfmpegEncoderOpts {
    fn default() -> Self {
        Self {
            container: VideoContainer::WebM,
            bg_rgba: [0, 0, 0, 255],
            program: "ffmpeg".to_string(),
        }
    }
}

/// Video encoder that spawns `ffmpeg`, streams raw frames to stdin and collects the container
/// from stdout.
pub struct FfmpegEncoder {
    opts: FfmpegEncoderOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<Drain>,
    stderr_drain: Option<Drain>,

    scratch: Vec<u8>,
    cfg: Option<EncoderConfig>,
    last_idx: Option<FrameIndex>,
    frames: u64,
}

impl FfmpegEncoder {
    /// Create a new encoder; `ffmpeg` is spawned in `begin`.
    pub fn new(opts: FfmpegEncoderOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stdout_drain: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
            frames: 0,
        }
    }

    fn build_command(&self, cfg: &EncoderConfig) -> Command {
        let mut cmd = Command::new(&self.opts.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Input: raw straight-alpha RGBA8 frames, already flattened in push_frame.
        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0", "-an"]);

        // yuv420p needs even dimensions; drop the odd row/column instead of failing.
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            cmd.args(["-vf", "crop=trunc(iw/2)*2:trunc(ih/2)*2"]);
        }
        cmd.args(self.opts.container.output_args());
        cmd.arg("pipe:1");
        cmd
    }

    fn reap(&mut self) -> (Option<std::process::ExitStatus>, Vec<u8>, Vec<u8>) {
        drop(self.stdin.take());
        let status = self.child.take().and_then(|mut c| c.wait().ok());
        let stdout = join_drain(self.stdout_drain.take());
        let stderr = join_drain(self.stderr_drain.take());
        (status, stdout, stderr)
    }
}

impl FrameEncoder for FfmpegEncoder {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Video
    }

    fn mime(&self) -> &'static str {
        self.opts.container.mime()
    }

    fn extension(&self) -> &'static str {
        self.opts.container.extension()
    }

    fn begin(&mut self, cfg: EncoderConfig) -> PrismResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(PrismError::validation("fps must be non-zero"));
        }
        if cfg.width < 2 || cfg.height < 2 {
            return Err(PrismError::encoder(
                "ffmpeg encoder needs frames of at least 2x2 pixels",
            ));
        }

        let mut child = self.build_command(&cfg).spawn().map_err(|e| {
            PrismError::encoder(format!(
                "failed to spawn {} (is it installed and on PATH?): {e}",
                self.opts.program
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PrismError::encoder("failed to open ffmpeg stdin (unexpected)"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PrismError::encoder("failed to open ffmpeg stdout (unexpected)"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| PrismError::encoder("failed to open ffmpeg stderr (unexpected)"))?;

        tracing::debug!(
            container = ?self.opts.container,
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );

        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_drain = Some(spawn_drain(stdout));
        self.stderr_drain = Some(spawn_drain(stderr));
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PrismResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| PrismError::encoder("ffmpeg encoder not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(PrismError::encoder(
                "ffmpeg encoder received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(PrismError::encoder(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.opts.bg_rgba,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(PrismError::encoder("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            PrismError::encoder(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> PrismResult<EncodedStream> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| PrismError::encoder("ffmpeg encoder not started"))?;
        let (status, stdout, stderr) = self.reap();

        match status {
            Some(s) if s.success() => {}
            Some(s) => {
                return Err(PrismError::encoder(format!(
                    "ffmpeg exited with status {s}: {}",
                    String::from_utf8_lossy(&stderr).trim()
                )));
            }
            None => return Err(PrismError::encoder("failed to wait for ffmpeg to finish")),
        }
        if stdout.is_empty() {
            return Err(PrismError::encoder("ffmpeg produced no output"));
        }

        Ok(EncodedStream {
            bytes: stdout,
            frames: self.frames,
            duration: Duration::from_secs_f64(self.frames as f64 * cfg.fps.frame_duration_secs()),
        })
    }

    fn abort(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.kill();
        }
        let _ = self.reap();
        self.cfg = None;
        self.frames = 0;
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn spawn_drain(mut r: impl Read + Send + 'static) -> Drain {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn join_drain(handle: Option<Drain>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .and_then(Result::ok)
        .unwrap_or_default()
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> PrismResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PrismError::encoder(
            "frame.data size mismatch with width*height*4",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let (r, g, b) = if src_is_premul {
            (
                u16::from(s[0]) + mul_div255_u16(bg_r, inv),
                u16::from(s[1]) + mul_div255_u16(bg_g, inv),
                u16::from(s[2]) + mul_div255_u16(bg_b, inv),
            )
        } else {
            (
                mul_div255_u16(u16::from(s[0]), a) + mul_div255_u16(bg_r, inv),
                mul_div255_u16(u16::from(s[1]), a) + mul_div255_u16(bg_g, inv),
                mul_div255_u16(u16::from(s[2]), a) + mul_div255_u16(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
