//! epicycle-bench: CLI tool for series parameter experimentation and diagnostics.
//!
//! Runs the Fourier series approximation on a drawn path stored as JSON,
//! printing per-stage timing, integration convergence, and fit error.
//! Useful for:
//!
//! - Seeing how harmonic count and tolerance trade accuracy for time
//! - Checking how closely a drawing is retraced at a given harmonic count
//! - Spotting harmonics whose integrals exhaust the refinement budget
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin epicycle-bench -- [OPTIONS] <PATH_JSON>
//! ```
//!
//! The input is a JSON array of `{"x": .., "y": ..}` objects or `[x, y]`
//! pairs in drawing order.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use epicycle_series::diagnostics::{Clock, SeriesDiagnostics};
use epicycle_series::{Point, Polyline, SeriesConfig};
use serde::Deserialize;
use tracing::Level;

/// Series parameter experimentation and diagnostics for epicycle.
///
/// Approximates a drawn path with a Fourier series and prints detailed
/// per-stage timing, convergence, and fit diagnostics.
#[derive(Parser)]
#[command(name = "epicycle-bench", version)]
struct Cli {
    /// Path to the input drawing (JSON array of points).
    path_json: PathBuf,

    /// Harmonic half-count N (the series has 2N + 1 terms).
    #[arg(long, default_value_t = SeriesConfig::DEFAULT_HARMONICS)]
    harmonics: u32,

    /// Absolute integration tolerance per coefficient (0 = default precision).
    #[arg(long, default_value_t = SeriesConfig::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Reconstruction range start (defaults to 1).
    #[arg(long, requires = "end")]
    start: Option<usize>,

    /// Reconstruction range end, exclusive (defaults to the point count).
    #[arg(long, requires = "start")]
    end: Option<usize>,

    /// Write SVG output to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full series config as a JSON string.
    ///
    /// When provided, all other series parameter flags are ignored.
    /// The JSON must be a valid `SeriesConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// One input point in either accepted JSON shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum InputPoint {
    Object(Point),
    Pair([f64; 2]),
}

impl From<InputPoint> for Point {
    fn from(p: InputPoint) -> Self {
        match p {
            InputPoint::Object(point) => point,
            InputPoint::Pair([x, y]) => Self::new(x, y),
        }
    }
}

/// Build a [`SeriesConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<SeriesConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(SeriesConfig {
        harmonics: cli.harmonics,
        tolerance: cli.tolerance,
    })
}

/// Read and parse the input drawing.
fn load_points(path: &Path) -> Result<Vec<Point>, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    let points: Vec<InputPoint> = serde_json::from_str(&json)
        .map_err(|e| format!("Error parsing {}: {e}", path.display()))?;
    Ok(points.into_iter().map(Point::from).collect())
}

/// Map `-v` occurrences to a log level.
const fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let points = match load_points(&cli.path_json) {
        Ok(points) => points,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Drawing: {} ({} points)",
        cli.path_json.display(),
        points.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        match epicycle_series::diagnostics::approximate_with_diagnostics(
            &points, &config, &StdClock,
        ) {
            Ok((approximation, diagnostics)) => {
                if cli.json {
                    match serde_json::to_string_pretty(&diagnostics) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            eprintln!("Error serializing diagnostics: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", diagnostics.report());
                }

                // Write SVG on the first run only.
                if run == 0
                    && let Some(ref svg_path) = cli.svg
                {
                    let reconstruction = match (cli.start, cli.end) {
                        (Some(start), Some(end)) => {
                            epicycle_series::reconstruct(&approximation.coefficients, start, end)
                        }
                        _ => approximation.reconstruction.clone(),
                    };
                    write_svg(&cli, &config, &points, &reconstruction, svg_path);
                }

                all_diagnostics.push(diagnostics);
            }
            Err(e) => {
                eprintln!("Series error: {e}");
                return ExitCode::FAILURE;
            }
        }

        if cli.runs > 1 {
            eprintln!();
        }
    }

    // Print summary when multiple runs.
    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Serialize the drawing and reconstruction to `svg_path`.
fn write_svg(
    cli: &Cli,
    config: &SeriesConfig,
    points: &[Point],
    reconstruction: &Polyline,
    svg_path: &Path,
) {
    let title = cli
        .path_json
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bench");
    let desc = format!("{config:#?}");
    let metadata = epicycle_export::SvgMetadata {
        title: Some(title),
        description: Some(&desc),
    };
    let input = Polyline::new(points.to_vec());
    let svg = epicycle_export::to_svg(&input, reconstruction, &metadata);
    match std::fs::write(svg_path, &svg) {
        Ok(()) => {
            eprintln!(
                "SVG written to {} ({} bytes)",
                svg_path.display(),
                svg.len(),
            );
        }
        Err(e) => {
            eprintln!("Error writing SVG to {}: {e}", svg_path.display());
        }
    }
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&SeriesDiagnostics) -> Duration;

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[SeriesDiagnostics]) {
    debug_assert!(!all_diagnostics.is_empty(), "no diagnostics to summarize");

    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    // Per-stage means.
    println!();
    println!("{:<24} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(40));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Validate", |d| d.validate.duration),
        ("Synthesis", |d| d.synthesis.duration),
        ("Reconstruction", |d| d.reconstruction.duration),
    ];

    for (name, extractor) in stage_extractors {
        let stage_mean = all_diagnostics
            .iter()
            .map(|d| extractor(d).as_secs_f64() * 1000.0)
            .sum::<f64>()
            / all_diagnostics.len() as f64;
        println!("{name:<24} {stage_mean:>10.3}ms");
    }
}
