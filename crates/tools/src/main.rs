use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use catalog::{JsonFilePlaceSource, PlaceSource, annotate_frame_images};
use clap::{Parser, Subcommand};
use scene::NormalizeReport;
use tools::capture::{CommandCapturer, capture_frames};
use tools::frames::{FrameStatus, plan_frames, record_indices};
use tools::report::{category_lines, filtered_state, list_lines};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use viewer::ViewerConfig;

#[derive(Parser, Debug)]
#[command(name = "placemap", version, about = "Inspect and prepare place map data")]
struct Cli {
    /// Path to places.json.
    #[arg(long, env = "PLACEMAP_DATA", default_value = "web/data/places.json", global = true)]
    data: PathBuf,

    /// Optional viewer config (JSON).
    #[arg(long, env = "PLACEMAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print visible places in display order.
    List {
        #[arg(long, default_value = "")]
        query: String,
        /// Only show these categories (repeatable).
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Print category chips with counts and colors.
    Categories,
    /// Plan and capture still frames for timestamped videos.
    Frames {
        #[arg(long, default_value = "web/assets/frames")]
        output_dir: PathBuf,
        #[arg(long, default_value = "web")]
        web_root: PathBuf,
        /// Capture even when the frame file exists.
        #[arg(long)]
        force: bool,
        /// Download videos and grab the missing frames.
        #[arg(long)]
        capture: bool,
        /// Store paths of frames on disk back into the data file.
        #[arg(long)]
        write: bool,
        #[arg(long, env = "PLACEMAP_YT_DLP", default_value = "yt-dlp")]
        yt_dlp: PathBuf,
        #[arg(long, env = "PLACEMAP_FFMPEG", default_value = "ffmpeg")]
        ffmpeg: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ViewerConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        Command::List { query, categories } => {
            let (report, _) = load(&cli.data, &config)?;
            let state = filtered_state(report.places, &query, &categories);
            print_lines(&list_lines(&state))
        }
        Command::Categories => {
            let (report, _) = load(&cli.data, &config)?;
            let state = filtered_state(report.places, "", &[]);
            print_lines(&category_lines(&state))
        }
        Command::Frames {
            output_dir,
            web_root,
            force,
            capture,
            write,
            yt_dlp,
            ffmpeg,
        } => {
            let capturer = capture.then_some(CommandCapturer { yt_dlp, ffmpeg });
            let options = FrameOptions {
                output_dir: &output_dir,
                web_root: &web_root,
                force,
                write,
            };
            frames(&cli.data, &config, options, capturer)
        }
    }
}

fn load(data: &Path, config: &ViewerConfig) -> Result<(NormalizeReport, usize)> {
    let batch = JsonFilePlaceSource::new(data)
        .load()
        .with_context(|| format!("loading places from {}", data.display()))?;
    let total = batch.records.len();
    let report = config.normalizer()?.normalize(batch.records);
    for dropped in &report.dropped {
        warn!("{dropped}");
    }
    info!(
        loaded = report.places.len(),
        dropped = report.dropped.len(),
        revision = batch.revision.as_deref().unwrap_or("-"),
        "places loaded"
    );
    Ok((report, total))
}

struct FrameOptions<'a> {
    output_dir: &'a Path,
    web_root: &'a Path,
    force: bool,
    write: bool,
}

fn frames(
    data: &Path,
    config: &ViewerConfig,
    options: FrameOptions<'_>,
    capturer: Option<CommandCapturer>,
) -> Result<()> {
    let (report, total) = load(data, config)?;
    let indices = record_indices(total, &report.dropped);
    let plan = plan_frames(
        &report.places,
        &indices,
        options.output_dir,
        options.web_root,
        options.force,
    );

    let mut out = io::stdout().lock();
    for job in &plan.jobs {
        let tag = match job.status {
            FrameStatus::Present => "skip",
            FrameStatus::Capture => "todo",
        };
        writeln!(
            out,
            "[{tag}] {} @ {}s -> {}",
            job.video_id, job.seconds, job.web_path
        )?;
    }
    writeln!(
        out,
        "Planned: {} to capture, {} present, {} videos",
        plan.to_capture().count(),
        plan.present(),
        plan.videos()
    )?;

    let mut captured = BTreeSet::new();
    if let Some(mut capturer) = capturer {
        let cache = tempfile::Builder::new()
            .prefix("placemap-frames-")
            .tempdir()
            .context("creating video cache")?;
        let result = capture_frames(&plan, cache.path(), &mut capturer);
        for idx in &result.captured {
            let job = &plan.jobs[*idx];
            writeln!(out, "[ok] {} @ {}s -> {}", job.video_id, job.seconds, job.web_path)?;
        }
        for (idx, err) in &result.failed {
            let job = &plan.jobs[*idx];
            writeln!(out, "[fail] {} @ {}s: {err}", job.video_id, job.seconds)?;
        }
        writeln!(
            out,
            "Done. Captured: {}, failed: {}, videos: {}",
            result.captured.len(),
            result.failed.len(),
            result.videos
        )?;
        captured = result.captured;
    } else if plan.to_capture().next().is_some() {
        warn!("frames missing on disk are not stored; pass --capture to grab them");
    }

    let annotations = plan.annotations(&captured);
    if options.write && !annotations.is_empty() {
        let payload = fs::read_to_string(data)
            .with_context(|| format!("reading {}", data.display()))?;
        let updated = annotate_frame_images(&payload, &annotations)?;
        fs::write(data, updated).with_context(|| format!("writing {}", data.display()))?;
        info!(path = %data.display(), frames = annotations.len(), "frame paths stored");
    }
    Ok(())
}

fn print_lines(lines: &[String]) -> Result<()> {
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
