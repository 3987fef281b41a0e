//! irodori: CLI driver for the color-space scatter core.
//!
//! Decodes an image file, drives the frame-budgeted scan to completion
//! (printing progress the way the in-engine text collaborator would),
//! reports a summary, and optionally writes the resulting scatter as an
//! ASCII PLY point cloud or CSV for external viewers.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin irodori -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use irodori_core::{
    ColorScene, RepeatPolicy, RetireMode, ScanSummary, SceneConfig, SceneObserver, TickOutcome,
};

/// Default frame budget in milliseconds, matching
/// [`SceneConfig::DEFAULT_FRAME_BUDGET`] (1/30 second).
const DEFAULT_FRAME_BUDGET_MS: f64 = 1000.0 / 30.0;

/// Color-space scatter visualization for images.
///
/// Maps each distinct color of the input image to a positioned, scaled
/// point in RGB space: position encodes the channel values, scale
/// encodes how often the color occurs.
#[derive(Parser)]
#[command(name = "irodori", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Number of representors pre-allocated in the pool. Images with
    /// more distinct colors than this are truncated.
    #[arg(long, default_value_t = SceneConfig::DEFAULT_POOL_CAPACITY)]
    pool_capacity: usize,

    /// Frame budget in milliseconds before the scan yields.
    #[arg(long, default_value_t = DEFAULT_FRAME_BUDGET_MS)]
    frame_budget_ms: f64,

    /// Scale added each time an already-seen color repeats.
    #[arg(long, default_value_t = SceneConfig::DEFAULT_SCALE_INCREMENT)]
    scale_increment: f32,

    /// Cleanup retires `max(registered / divisor, 1)` handles per frame.
    #[arg(long, default_value_t = SceneConfig::DEFAULT_CLEANUP_CHUNK_DIVISOR)]
    chunk_divisor: usize,

    /// What to do, beyond the scale bump, when a color repeats.
    #[arg(long, value_enum, default_value_t = Repeat::Restart)]
    repeat_policy: Repeat,

    /// Run the chunked cleanup pass after the scan and report on it.
    #[arg(long)]
    cleanup: bool,

    /// Suppress per-frame progress output.
    #[arg(long)]
    quiet: bool,

    /// Output the scan summary as JSON instead of a human-readable
    /// report.
    #[arg(long)]
    json: bool,

    /// Write the scatter as an ASCII PLY point cloud to this path.
    #[arg(long)]
    ply: Option<PathBuf>,

    /// Write the scatter as CSV to this path.
    #[arg(long)]
    csv: Option<PathBuf>,
}

/// Repeat policy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Repeat {
    /// Re-issue the place-and-animate instruction on every repeat
    /// (source-faithful).
    Restart,
    /// Only bump the target scale.
    ScaleOnly,
}

/// Build a [`SceneConfig`] from CLI arguments.
fn config_from_cli(cli: &Cli) -> SceneConfig {
    SceneConfig {
        pool_capacity: cli.pool_capacity,
        frame_budget: Duration::from_secs_f64(cli.frame_budget_ms.max(0.0) / 1000.0),
        scale_increment: cli.scale_increment,
        cleanup_chunk_divisor: cli.chunk_divisor,
        repeat_policy: match cli.repeat_policy {
            Repeat::Restart => RepeatPolicy::RestartAnimation,
            Repeat::ScaleOnly => RepeatPolicy::ScaleOnly,
        },
        ..SceneConfig::default()
    }
}

/// Stderr stand-in for the in-engine progress text collaborator.
struct ProgressText;

impl SceneObserver for ProgressText {
    fn on_processing_started(&mut self) {
        eprintln!("Load progress ... 0%");
    }

    fn on_progress(&mut self, percent: u8) {
        eprintln!("Load progress ... {percent}%");
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let image = match irodori_core::decode_rgba(&image_bytes) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error decoding {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut scene = match ColorScene::new(config_from_cli(&cli)) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if !cli.quiet {
        scene.subscribe(Box::new(ProgressText));
    }

    eprintln!(
        "Image: {} ({}x{}, {} pixels)",
        cli.image_path.display(),
        image.width(),
        image.height(),
        u64::from(image.width()) * u64::from(image.height()),
    );

    if let Err(e) = scene.process_image(&image) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    // Host frame loop: tick until the scan finishes.
    let scan_start = Instant::now();
    let mut frames = 0u64;
    let summary = loop {
        frames += 1;
        match scene.tick() {
            TickOutcome::InProgress => {}
            TickOutcome::ScanComplete(summary) => break summary,
            outcome @ (TickOutcome::Idle | TickOutcome::CleanupComplete) => {
                eprintln!("Unexpected scene state: {outcome:?}");
                return ExitCode::FAILURE;
            }
        }
    };
    let scan_duration = scan_start.elapsed();

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing summary: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&summary, frames, scan_duration);
    }

    if let Some(code) = write_exports(&cli, &scene, &summary) {
        return code;
    }

    if cli.cleanup {
        run_cleanup(&mut scene);
    }

    ExitCode::SUCCESS
}

/// Print the human-readable scan report.
fn print_report(summary: &ScanSummary, frames: u64, duration: Duration) {
    println!("Scan Report\n{}", "=".repeat(40));
    println!("Pixels:          {}", summary.total_pixels);
    println!("Represented:     {}", summary.pixels_processed);
    println!("Distinct colors: {}", summary.distinct_colors);
    println!("Frames:          {frames} ({} yields)", summary.yields);
    println!(
        "Duration:        {:.3}ms",
        duration.as_secs_f64() * 1000.0,
    );
    if summary.truncated {
        println!("Warning: representor pool exhausted; image only partially represented");
    }
}

/// Write any requested export files. Returns an exit code on failure.
fn write_exports(cli: &Cli, scene: &ColorScene, summary: &ScanSummary) -> Option<ExitCode> {
    if cli.ply.is_none() && cli.csv.is_none() {
        return None;
    }

    let placements = scene.placements();

    if let Some(ref ply_path) = cli.ply {
        let source = cli
            .image_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let description = format!(
            "pool={} distinct={} increment={}",
            scene.config().pool_capacity,
            summary.distinct_colors,
            scene.config().scale_increment,
        );
        let metadata = irodori_export::PlyMetadata {
            source: Some(source),
            description: Some(&description),
        };
        let ply = irodori_export::to_ply(&placements, &metadata);
        match std::fs::write(ply_path, &ply) {
            Ok(()) => eprintln!("PLY written to {} ({} bytes)", ply_path.display(), ply.len()),
            Err(e) => {
                eprintln!("Error writing PLY to {}: {e}", ply_path.display());
                return Some(ExitCode::FAILURE);
            }
        }
    }

    if let Some(ref csv_path) = cli.csv {
        let csv = irodori_export::to_csv(&placements);
        match std::fs::write(csv_path, &csv) {
            Ok(()) => eprintln!("CSV written to {} ({} bytes)", csv_path.display(), csv.len()),
            Err(e) => {
                eprintln!("Error writing CSV to {}: {e}", csv_path.display());
                return Some(ExitCode::FAILURE);
            }
        }
    }

    None
}

/// Drive the chunked cleanup pass and report on it.
fn run_cleanup(scene: &mut ColorScene) {
    scene.start_cleanup(RetireMode::Deactivate);
    let cleanup_start = Instant::now();
    let mut frames = 0u64;
    loop {
        frames += 1;
        match scene.tick() {
            TickOutcome::CleanupComplete => break,
            TickOutcome::InProgress => {}
            TickOutcome::Idle | TickOutcome::ScanComplete(_) => break,
        }
    }
    eprintln!(
        "Cleanup complete: {frames} frames, {:.3}ms; {} colors registered, pool cursor {}",
        cleanup_start.elapsed().as_secs_f64() * 1000.0,
        scene.distinct_colors(),
        scene.pool().cursor(),
    );
}
