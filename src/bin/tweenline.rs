use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tweenline::{Engine, EngineConfig, ExportFormat};

#[derive(Parser, Debug)]
#[command(name = "tweenline", version)]
struct Cli {
    /// Log lifecycle events at debug level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the scene at one point in time.
    Frame(FrameArgs),
    /// Render a range of the scene as numbered image files.
    Sequence(SequenceArgs),
    /// Load a scene and print what was built, as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct SurfaceArgs {
    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override surface width.
    #[arg(long)]
    width: Option<u32>,

    /// Override surface height.
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scene time in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output image path; `.jpg`/`.jpeg` selects JPEG, anything else PNG.
    #[arg(long)]
    out: PathBuf,

    /// JPEG quality in `0..=1`.
    #[arg(long, default_value_t = 0.92)]
    quality: f64,

    #[command(flatten)]
    surface: SurfaceArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
}

impl From<FormatChoice> for ExportFormat {
    fn from(f: FormatChoice) -> Self {
        match f {
            FormatChoice::Png => ExportFormat::Png,
            FormatChoice::Jpeg => ExportFormat::Jpeg,
        }
    }
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `frame_00000.<ext>` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// First sample time in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Last sample time in milliseconds (defaults to the scene duration).
    #[arg(long)]
    end: Option<f64>,

    /// Samples per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    #[command(flatten)]
    surface: SurfaceArgs,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    surface: SurfaceArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load_engine(in_path: &Path, surface: &SurfaceArgs) -> anyhow::Result<Engine> {
    let mut config = match &surface.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    }
    .with_env_overrides();
    if let Some(w) = surface.width {
        config.width = w;
    }
    if let Some(h) = surface.height {
        config.height = h;
    }

    let json = std::fs::read_to_string(in_path)
        .with_context(|| format!("read scene '{}'", in_path.display()))?;
    let mut engine = Engine::headless(config).context("create engine")?;
    engine
        .load_from_json(&json)
        .with_context(|| format!("load scene '{}'", in_path.display()))?;
    Ok(engine)
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut engine = load_engine(&args.in_path, &args.surface)?;
    engine.seek(args.time)?;

    let format = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse::<ExportFormat>().ok())
        .unwrap_or(ExportFormat::Png);
    let frame = engine.export_frame(format, args.quality)?;

    if let Some(parent) = args.out.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(&args.out, &frame.bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let mut engine = load_engine(&args.in_path, &args.surface)?;
    let end = match args.end {
        Some(end) => end,
        None => engine.get_state()?.duration_ms,
    };
    let frames = engine.export_sequence(args.start, end, args.fps, args.format.into())?;

    ensure_dir(&args.out_dir)?;
    for (i, frame) in frames.iter().enumerate() {
        let path = args
            .out_dir
            .join(format!("frame_{i:05}.{}", frame.format.extension()));
        std::fs::write(&path, &frame.bytes)
            .with_context(|| format!("write image '{}'", path.display()))?;
    }

    eprintln!("wrote {} frames to {}", frames.len(), args.out_dir.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let mut engine = load_engine(&args.in_path, &args.surface)?;
    let state = engine.get_state()?;
    let shapes: Vec<_> = engine
        .shapes()
        .iter()
        .map(|s| {
            let b = s.bounds();
            serde_json::json!({
                "id": s.id(),
                "type": s.type_name(),
                "layer": s.layer,
                "zIndex": s.z_index,
                "visible": s.visible,
                "bounds": [b.x0, b.y0, b.x1, b.y1],
            })
        })
        .collect();
    let out = serde_json::json!({
        "state": state,
        "warnings": engine.warnings(),
        "shapes": shapes,
        "performance": engine.get_performance_stats()?,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    engine.destroy();
    Ok(())
}
