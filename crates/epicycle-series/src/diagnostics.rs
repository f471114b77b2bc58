//! Series diagnostics: timing, convergence, and fit error for each stage.
//!
//! Collected by [`approximate_with_diagnostics`] alongside the normal
//! results. Timestamps come from a caller-supplied [`Clock`] so the crate
//! stays free of platform time APIs.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::reconstruct::reconstruct;
use crate::sample::PathSampler;
use crate::synthesize::{HarmonicReport, synthesize_with_report};
use crate::types::{Approximation, Path, Point, Polyline, SeriesConfig, SeriesError};

/// Source of timestamps for stage timing.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single approximation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDiagnostics {
    /// Stage 0: config validation and path construction.
    pub validate: StageDiagnostics,
    /// Stage 1: coefficient synthesis.
    pub synthesis: StageDiagnostics,
    /// Stage 2: series reconstruction.
    pub reconstruction: StageDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: SeriesSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Path validation metrics.
    Validate {
        /// Number of input points.
        point_count: usize,
        /// Distance between the first and last point. Zero for a closed
        /// path; large gaps show up as a jump in the reconstruction.
        closure_gap: f64,
    },
    /// Coefficient synthesis metrics.
    Synthesis {
        /// Harmonic half-count `N`.
        harmonics: u32,
        /// Requested tolerance (`0` = default precision).
        tolerance: f64,
        /// Number of coefficients (`2N + 1`).
        coefficient_count: usize,
        /// Harmonics whose integral met the tolerance.
        converged_count: usize,
        /// Largest per-harmonic error estimate.
        max_error_estimate: f64,
        /// Mean refinement levels per harmonic.
        mean_levels: f64,
        /// Most refinement levels used by any harmonic.
        max_levels: usize,
    },
    /// Reconstruction metrics.
    Reconstruction {
        /// Range start after normalization.
        start: usize,
        /// Range end after normalization.
        end: usize,
        /// Points produced.
        point_count: usize,
        /// Largest distance between a reconstructed point and the path
        /// sampled at the same parameter.
        max_deviation: f64,
    },
}

/// High-level summary for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Number of input points.
    pub point_count: usize,
    /// Number of coefficients.
    pub coefficient_count: usize,
    /// Harmonics that converged.
    pub converged_count: usize,
    /// Points in the reconstruction.
    pub output_point_count: usize,
    /// Fit error of the reconstruction.
    pub max_deviation: f64,
}

impl SeriesDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Series Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Path: {} points  |  Coefficients: {}",
            self.summary.point_count, self.summary.coefficient_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Validate", &self.validate),
            ("Synthesis", &self.synthesis),
            ("Reconstruction", &self.reconstruction),
        ];
        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Converged: {}/{}  |  Output points: {}  |  Max deviation: {:.4}",
            self.summary.converged_count,
            self.summary.coefficient_count,
            self.summary.output_point_count,
            self.summary.max_deviation,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Validate {
            point_count,
            closure_gap,
        } => format!("{point_count} pts, closure gap {closure_gap:.3}"),
        StageMetrics::Synthesis {
            harmonics,
            tolerance,
            coefficient_count,
            converged_count,
            max_error_estimate,
            mean_levels,
            max_levels,
        } => format!(
            "N={harmonics} tol={tolerance:e} {converged_count}/{coefficient_count} converged, err<={max_error_estimate:.2e} levels mean={mean_levels:.1} max={max_levels}",
        ),
        StageMetrics::Reconstruction {
            start,
            end,
            point_count,
            max_deviation,
        } => format!("[{start}, {end}) -> {point_count} pts, max deviation {max_deviation:.4}"),
    }
}

/// Convergence statistics over a synthesis run.
pub(crate) struct ConvergenceStats {
    /// Harmonics that met the tolerance.
    pub converged: usize,
    /// Largest error estimate.
    pub max_error: f64,
    /// Mean levels per harmonic.
    pub mean_levels: f64,
    /// Most levels used.
    pub max_levels: usize,
}

/// Summarize per-harmonic reports.
pub(crate) fn convergence_stats(reports: &[HarmonicReport]) -> ConvergenceStats {
    let converged = reports.iter().filter(|r| r.converged).count();
    let max_error = reports
        .iter()
        .map(|r| r.error_estimate)
        .fold(0.0, f64::max);
    let max_levels = reports.iter().map(|r| r.levels).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let mean_levels = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.levels).sum::<usize>() as f64 / reports.len() as f64
    };
    ConvergenceStats {
        converged,
        max_error,
        mean_levels,
        max_levels,
    }
}

/// Largest distance between reconstructed sample `k` (for `k` in
/// `[start, start + len)`) and the path sampled at `k / span`.
///
/// Over the default range each sample sits on a jump of the step-function
/// path, where the series tends to the midpoint of the two neighbouring
/// points. The result therefore has a floor of about half the point
/// spacing however many harmonics are used.
pub(crate) fn max_deviation(
    sampler: &PathSampler<'_>,
    reconstruction: &Polyline,
    start: usize,
) -> f64 {
    let span = reconstruction.len();
    if span == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let span = span as f64;
    reconstruction
        .points()
        .iter()
        .zip(start..)
        .map(|(p, k)| {
            #[allow(clippy::cast_precision_loss)]
            let t = k as f64 / span;
            let t = if t > 1.0 { t.fract() } else { t };
            p.distance(Point::from(sampler.sample(t)))
        })
        .fold(0.0, f64::max)
}

/// Run [`crate::approximate`] while collecting per-stage diagnostics.
///
/// # Errors
///
/// Same as [`crate::approximate`].
pub fn approximate_with_diagnostics<C: Clock>(
    points: &[Point],
    config: &SeriesConfig,
    clock: &C,
) -> Result<(Approximation, SeriesDiagnostics), SeriesError> {
    let run_start = clock.now();

    // 0. Validate.
    let stage_start = clock.now();
    config.validate()?;
    let path = Path::new(points)?;
    let closure_gap = match (points.first(), points.last()) {
        (Some(first), Some(last)) => first.distance(*last),
        _ => 0.0,
    };
    let validate = StageDiagnostics {
        duration: clock.elapsed(&stage_start),
        metrics: StageMetrics::Validate {
            point_count: path.len(),
            closure_gap,
        },
    };

    // 1. Synthesis.
    let stage_start = clock.now();
    let (coefficients, reports) = synthesize_with_report(&path, config);
    let stats = convergence_stats(&reports);
    let synthesis = StageDiagnostics {
        duration: clock.elapsed(&stage_start),
        metrics: StageMetrics::Synthesis {
            harmonics: config.harmonics,
            tolerance: config.tolerance,
            coefficient_count: coefficients.len(),
            converged_count: stats.converged,
            max_error_estimate: stats.max_error,
            mean_levels: stats.mean_levels,
            max_levels: stats.max_levels,
        },
    };

    // 2. Reconstruction.
    let stage_start = clock.now();
    let (start, end) = crate::default_range(&path);
    let reconstruction = reconstruct(&coefficients, start, end);
    let deviation = max_deviation(
        &PathSampler::new(&path),
        &reconstruction,
        start,
    );
    let reconstruction_diag = StageDiagnostics {
        duration: clock.elapsed(&stage_start),
        metrics: StageMetrics::Reconstruction {
            start,
            end,
            point_count: reconstruction.len(),
            max_deviation: deviation,
        },
    };

    let summary = SeriesSummary {
        point_count: path.len(),
        coefficient_count: coefficients.len(),
        converged_count: stats.converged,
        output_point_count: reconstruction.len(),
        max_deviation: deviation,
    };

    let diagnostics = SeriesDiagnostics {
        validate,
        synthesis,
        reconstruction: reconstruction_diag,
        total_duration: clock.elapsed(&run_start),
        summary,
    };

    Ok((
        Approximation {
            coefficients,
            reconstruction,
        },
        diagnostics,
    ))
}
