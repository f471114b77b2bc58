//! Coefficient synthesis: project the sampled path onto the Fourier basis.
//!
//! For every harmonic `k` in `-N..=N` the coefficient is
//!
//! ```text
//! C_k = ∫₀¹ path(t) · exp(-i·2π·k·t) dt
//! ```
//!
//! computed with [`romberg`]. Each harmonic only reads the path and owns
//! its output slot, so with the `parallel` feature the integrals run on
//! the rayon pool. Results are identical either way.

use std::f64::consts::TAU;

use num_complex::Complex64;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::integrate::{Integral, romberg};
use crate::sample::PathSampler;
use crate::types::{CoefficientSequence, Path, SeriesConfig};

/// The integrand for one harmonic: `path(t) · exp(-i·2π·k·t)`.
#[derive(Debug, Clone, Copy)]
pub struct HarmonicIntegrand<'a> {
    sampler: PathSampler<'a>,
    harmonic: i64,
}

impl<'a> HarmonicIntegrand<'a> {
    /// Bind a sampler to harmonic `k`.
    #[must_use]
    pub const fn new(sampler: PathSampler<'a>, harmonic: i64) -> Self {
        Self { sampler, harmonic }
    }

    /// The harmonic index `k`.
    #[must_use]
    pub const fn harmonic(&self) -> i64 {
        self.harmonic
    }

    /// Evaluate the integrand at `t`.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Complex64 {
        #[allow(clippy::cast_precision_loss)]
        let k = self.harmonic as f64;
        self.sampler.sample(t) * Complex64::cis(-TAU * k * t)
    }

    /// Integrate over `t ∈ [0, 1]`.
    #[must_use]
    pub fn integrate(&self, tolerance: f64) -> Integral {
        romberg(|t| self.evaluate(t), 0.0, 1.0, tolerance)
    }
}

/// Convergence record for one harmonic's integral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicReport {
    /// Harmonic index `k`.
    pub harmonic: i64,
    /// Refinement levels used.
    pub levels: usize,
    /// Achieved error estimate.
    pub error_estimate: f64,
    /// Whether the tolerance was met.
    pub converged: bool,
}

/// Compute the `2N + 1` Fourier coefficients of `path`.
#[must_use]
pub fn synthesize(path: &Path, config: &SeriesConfig) -> CoefficientSequence {
    synthesize_with_report(path, config).0
}

/// Like [`synthesize`], also returning per-harmonic convergence records
/// in the same (ascending harmonic) order.
#[must_use]
pub fn synthesize_with_report(
    path: &Path,
    config: &SeriesConfig,
) -> (CoefficientSequence, Vec<HarmonicReport>) {
    tracing::debug!(
        points = path.len(),
        harmonics = config.harmonics,
        tolerance = config.tolerance,
        "synthesizing coefficients"
    );

    let integrals = integrate_harmonics(path, config);

    let mut coefficients = Vec::with_capacity(integrals.len());
    let mut reports = Vec::with_capacity(integrals.len());
    for (harmonic, integral) in integrals {
        if !integral.converged {
            tracing::trace!(
                harmonic,
                error_estimate = integral.error_estimate,
                "integral did not converge within the level budget"
            );
        }
        coefficients.push(integral.value);
        reports.push(HarmonicReport {
            harmonic,
            levels: integral.levels,
            error_estimate: integral.error_estimate,
            converged: integral.converged,
        });
    }

    (CoefficientSequence::from_synthesis(coefficients), reports)
}

/// Integrate every harmonic in `-N..=N`, in ascending order.
fn integrate_harmonics(path: &Path, config: &SeriesConfig) -> Vec<(i64, Integral)> {
    let sampler = PathSampler::new(path);
    let n = i64::from(config.harmonics);

    #[cfg(not(feature = "parallel"))]
    let harmonics = -n..=n;
    #[cfg(feature = "parallel")]
    let harmonics = (-n..=n).into_par_iter();

    harmonics
        .map(|k| integrate_harmonic(sampler, k, config.tolerance))
        .collect()
}

fn integrate_harmonic(sampler: PathSampler<'_>, harmonic: i64, tolerance: f64) -> (i64, Integral) {
    (
        harmonic,
        HarmonicIntegrand::new(sampler, harmonic).integrate(tolerance),
    )
}
