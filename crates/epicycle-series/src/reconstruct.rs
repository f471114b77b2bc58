//! Series reconstruction: evaluate partial sums back into points.
//!
//! The inverse of [`crate::synthesize`]. A reconstruction range
//! `[start, end)` is treated as one full period of `span = end - start`
//! integer samples, so sample `k` sits at angle `2π·k/span`.

use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::types::{CoefficientSequence, Point, Polyline, harmonic_offset};

/// Evaluate the series at each integer sample in `[start, end)`.
///
/// Bounds given in the wrong order are swapped, so `(5, 1)` and `(1, 5)`
/// produce the same points. An empty range produces an empty polyline.
#[must_use]
pub fn reconstruct(coefficients: &CoefficientSequence, start: usize, end: usize) -> Polyline {
    let (start, end) = if start > end {
        (end, start)
    } else {
        (start, end)
    };
    let span = end - start;
    if span == 0 {
        return Polyline::new(Vec::new());
    }

    #[allow(clippy::cast_precision_loss)]
    let omega = TAU / span as f64;

    let points = (start..end)
        .map(|k| {
            #[allow(clippy::cast_precision_loss)]
            let angle = omega * k as f64;
            Point::from(partial_sum(coefficients, angle))
        })
        .collect();
    Polyline::new(points)
}

/// Evaluate the series at a continuous parameter `t`, one period being
/// `t ∈ [0, 1]`.
#[must_use]
pub fn evaluate(coefficients: &CoefficientSequence, t: f64) -> Complex64 {
    partial_sum(coefficients, TAU * t)
}

/// `Σ C_n · exp(i·n·angle)` over all harmonics.
fn partial_sum(coefficients: &CoefficientSequence, angle: f64) -> Complex64 {
    let mut harmonic = -harmonic_offset(coefficients.harmonic_count());
    let mut sum = Complex64::new(0.0, 0.0);
    for &c in coefficients.as_slice() {
        #[allow(clippy::cast_precision_loss)]
        let n = harmonic as f64;
        sum += c * Complex64::cis(n * angle);
        harmonic += 1;
    }
    sum
}
