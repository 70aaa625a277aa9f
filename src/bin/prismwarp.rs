use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use prismwarp::{
    Artifact, Canvas, CaptureEvent, CaptureOpts, FfmpegEncoderOpts, ManualClock, MonotonicClock,
    Preset, PresetSlot, Recorder, RenderLoop, RenderThread, RenderThreadOpts, Texture,
    VideoContainer, decode_texture, export_still, factory_names, factory_preset,
};

const MAX_OFFLINE_QUEUE: usize = 1024;

#[derive(Parser, Debug)]
#[command(name = "prismwarp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one high-resolution still as PNG.
    Still(StillArgs),
    /// Record a video or palette animation of the running effect.
    Record(RecordArgs),
    /// List the factory presets.
    Presets,
    /// Print a preset (factory name or JSON path) as JSON.
    Show(ShowArgs),
    /// Check that a preset JSON file loads.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Preset JSON path or factory preset name. Defaults to the default preset.
    #[arg(long)]
    preset: Option<String>,
    /// Source image. Defaults to a procedural test card.
    #[arg(long)]
    image: Option<PathBuf>,
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 512)]
    width: u32,
    /// Canvas height in pixels.
    #[arg(long, default_value_t = 512)]
    height: u32,
}

#[derive(Parser, Debug)]
struct StillArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Effect time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,
    /// Output PNG path. Defaults to the suggested artifact name.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RecordFormat {
    Video,
    Gif,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ContainerArg {
    Webm,
    Mp4,
}

impl From<ContainerArg> for VideoContainer {
    fn from(c: ContainerArg) -> Self {
        match c {
            ContainerArg::Webm => VideoContainer::WebM,
            ContainerArg::Mp4 => VideoContainer::Mp4,
        }
    }
}

#[derive(Parser, Debug)]
struct RecordArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Artifact format.
    #[arg(long, value_enum, default_value_t = RecordFormat::Video)]
    format: RecordFormat,
    /// Video container (ignored for gif).
    #[arg(long, value_enum, default_value_t = ContainerArg::Webm)]
    container: ContainerArg,
    /// Capture length in seconds. Overrides the preset's `rec.length`.
    #[arg(long)]
    length: Option<f64>,
    /// Drive the loop from the wall clock on a render thread instead of stepping time offline.
    #[arg(long)]
    realtime: bool,
    /// Render ticks per second.
    #[arg(long, default_value_t = 60)]
    refresh_hz: u32,
    /// Output path. Defaults to the suggested artifact name.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// Factory preset name or preset JSON path.
    preset: String,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Preset JSON path.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Record(args) => cmd_record(args),
        Command::Presets => cmd_presets(),
        Command::Show(args) => cmd_show(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn resolve_preset(name_or_path: Option<&str>) -> anyhow::Result<Preset> {
    let Some(name_or_path) = name_or_path else {
        return Ok(Preset::default());
    };
    let path = Path::new(name_or_path);
    if path.is_file() {
        return Preset::from_path(path).with_context(|| format!("load preset {}", path.display()));
    }
    factory_preset(name_or_path).with_context(|| {
        format!(
            "'{name_or_path}' is neither a preset file nor a factory preset ({})",
            factory_names().join(", ")
        )
    })
}

fn resolve_source(args: &SourceArgs) -> anyhow::Result<(Preset, Texture, Canvas)> {
    let preset = resolve_preset(args.preset.as_deref())?;
    let canvas = Canvas::new(args.width, args.height)?;
    let texture = match &args.image {
        Some(path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read image {}", path.display()))?;
            decode_texture(&bytes).with_context(|| format!("decode image {}", path.display()))?
        }
        None => Texture::test_card(args.width, args.height),
    };
    Ok((preset, texture, canvas))
}

fn write_artifact(artifact: &Artifact, out: Option<PathBuf>) -> anyhow::Result<()> {
    let out = out.unwrap_or_else(|| PathBuf::from(&artifact.filename));
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    std::fs::write(&out, &artifact.bytes)
        .with_context(|| format!("write {}", out.display()))?;
    eprintln!(
        "wrote {} ({}, {} frames, {:.2}s)",
        out.display(),
        artifact.mime,
        artifact.frames,
        artifact.duration.as_secs_f64()
    );
    Ok(())
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let (preset, texture, canvas) = resolve_source(&args.source)?;
    let time = Duration::try_from_secs_f64(args.time).context("--time must be >= 0")?;
    let artifact = export_still(&texture, &preset, canvas, time)?;
    write_artifact(&artifact, args.out)
}

fn cmd_record(args: RecordArgs) -> anyhow::Result<()> {
    let (mut preset, texture, canvas) = resolve_source(&args.source)?;
    if let Some(length) = args.length {
        preset = preset.with_value("rec.length.value", length.into())?;
    }
    if args.refresh_hz == 0 {
        anyhow::bail!("--refresh-hz must be > 0");
    }
    let length = preset.capture_length();

    let mut opts = CaptureOpts::default();
    if !args.realtime {
        // Offline ticks outrun the encoder; size the queue to the capture, up to a memory cap.
        let expected = usize::try_from(opts.frames_for(length))
            .unwrap_or(usize::MAX)
            .saturating_add(2);
        if expected > MAX_OFFLINE_QUEUE {
            tracing::warn!(
                frames = expected,
                cap = MAX_OFFLINE_QUEUE,
                "capture is longer than the offline queue; frames may be dropped"
            );
        }
        opts.queue_depth = expected.clamp(opts.queue_depth, MAX_OFFLINE_QUEUE);
    }
    let (recorder, events) = Recorder::with_channel(opts);

    match args.format {
        RecordFormat::Video => recorder.start_video(
            FfmpegEncoderOpts {
                container: args.container.into(),
                ..FfmpegEncoderOpts::default()
            },
            &preset,
        )?,
        RecordFormat::Gif => recorder.start_palette(&preset)?,
    }

    let slot = PresetSlot::new(preset);
    let tick_interval = Duration::from_secs_f64(1.0 / f64::from(args.refresh_hz));

    if args.realtime {
        let mut render_loop = RenderLoop::new(canvas, slot, Arc::new(MonotonicClock::new()));
        render_loop.attach_texture(texture);
        render_loop.add_listener(Box::new(recorder.clone()));
        let thread = RenderThread::spawn(
            render_loop,
            RenderThreadOpts {
                refresh_hz: args.refresh_hz,
            },
        )?;
        while recorder.is_busy() {
            std::thread::sleep(tick_interval);
        }
        thread.stop()?;
    } else {
        let clock = Arc::new(ManualClock::new());
        let mut render_loop = RenderLoop::new(canvas, slot, clock.clone());
        render_loop.attach_texture(texture);
        render_loop.add_listener(Box::new(recorder.clone()));
        while recorder.is_busy() {
            render_loop.tick();
            clock.advance(tick_interval);
        }
    }

    let event = events
        .recv_timeout(length.saturating_add(Duration::from_secs(120)))
        .context("wait for capture to finalize")?;
    match event {
        CaptureEvent::Completed(artifact) => write_artifact(&artifact, args.out),
        CaptureEvent::Failed { kind, error } => {
            Err(anyhow::Error::new(error).context(format!("{kind} capture failed")))
        }
        CaptureEvent::Cancelled { kind } => anyhow::bail!("{kind} capture was cancelled"),
    }
}

fn cmd_presets() -> anyhow::Result<()> {
    println!("default");
    for name in factory_names() {
        println!("{name}");
    }
    Ok(())
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let preset = resolve_preset(Some(&args.preset))?;
    let json = preset.to_json_bytes()?;
    println!("{}", String::from_utf8_lossy(&json));
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    Preset::from_path(&args.in_path)
        .with_context(|| format!("validate {}", args.in_path.display()))?;
    eprintln!("ok: {}", args.in_path.display());
    Ok(())
}
