use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "scorecast",
    version,
    about = "Generate a transparent video overlay from a CSV table and a markup template"
)]
struct Cli {
    /// CSV file with a `timestamp` column and one column per template value.
    csv_file: PathBuf,

    /// Template file with `{{name}}` placeholders (SVG for `--backend svg`, HTML for chromium).
    template_file: PathBuf,

    /// Output video path.
    output_file: PathBuf,

    /// Total video duration in seconds (default: last timestamp + 1s).
    #[arg(short, long)]
    duration: Option<f64>,

    /// Frames per second.
    #[arg(short, long, default_value_t = 5)]
    fps: u32,

    /// Output video codec.
    #[arg(short, long, default_value = "prores")]
    codec: String,

    /// Output pixel format (must carry alpha).
    #[arg(long, default_value = "yuva420p")]
    pix_fmt: String,

    /// Set an additional template value (repeatable).
    #[arg(long = "set", value_name = "NAME=VAL")]
    params: Vec<String>,

    /// Additional ffmpeg argument, passed verbatim (repeatable).
    #[arg(short = 'E', value_name = "ARG", allow_hyphen_values = true)]
    ffmpeg_extras: Vec<String>,

    /// Do not delete generated frames.
    #[arg(long)]
    keep: bool,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Render backend.
    #[arg(long, value_enum, default_value_t = BackendChoice::Svg)]
    backend: BackendChoice,

    /// Chromium binary used by `--backend chromium`.
    #[arg(long, default_value = "chromium")]
    chromium: PathBuf,

    /// Extra font directory for the svg backend.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Write the run report as JSON to this path.
    #[arg(long)]
    stats_json: Option<PathBuf>,

    /// Render frames but skip encoding.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Svg,
    Chromium,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cmd_generate(cli)
}

fn cmd_generate(cli: Cli) -> anyhow::Result<()> {
    let globals = scorecast::GlobalParams::parse_assignments(&cli.params)?;

    tracing::info!(path = %cli.csv_file.display(), "reading input table");
    let timeline = scorecast::Timeline::from_path(&cli.csv_file)?;

    tracing::info!(path = %cli.template_file.display(), "reading template");
    let template = scorecast::Template::from_path(&cli.template_file)?;

    let opts = scorecast::OverlayOpts {
        fps: cli.fps,
        duration: cli.duration,
        viewport: scorecast::Viewport::new(cli.width, cli.height)?,
        keep_frames: cli.keep,
        ..scorecast::OverlayOpts::default()
    };
    let mut pipeline = scorecast::OverlayPipeline::new(timeline, template, globals, opts)?;

    let kind = match cli.backend {
        BackendChoice::Svg => scorecast::BackendKind::Svg,
        BackendChoice::Chromium => scorecast::BackendKind::Chromium,
    };
    let backend_opts = scorecast::BackendOpts {
        svg: scorecast::SvgBackendOpts {
            resources_dir: cli.template_file.parent().map(|p| p.to_path_buf()),
            font_dir: cli.font_dir.clone(),
        },
        chromium: scorecast::ChromiumBackendOpts {
            program: cli.chromium.clone(),
            ..scorecast::ChromiumBackendOpts::default()
        },
    };
    let mut backend = scorecast::create_backend(kind, &backend_opts)?;

    let report = if cli.dry_run {
        let mut encoder = scorecast::InMemoryEncoder::new();
        pipeline.run(backend.as_mut(), &mut encoder, &cli.output_file)?
    } else {
        let mut encoder = scorecast::FfmpegEncoder::new(scorecast::FfmpegEncoderOpts {
            codec: cli.codec.clone(),
            pix_fmt: cli.pix_fmt.clone(),
            extra_args: cli.ffmpeg_extras.clone(),
            ..scorecast::FfmpegEncoderOpts::default()
        });
        pipeline.run(backend.as_mut(), &mut encoder, &cli.output_file)?
    };

    if let Some(path) = cli.stats_json.as_deref() {
        scorecast::ensure_parent_dir(path)?;
        let json = serde_json::to_string_pretty(&report).context("serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("write run report '{}'", path.display()))?;
    }

    if cli.dry_run {
        eprintln!("dry run: rendered {} frames", report.stats.frames_total);
    } else {
        eprintln!("wrote {}", report.out_path.display());
    }
    Ok(())
}
