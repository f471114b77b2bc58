//! epicycle-series: Fourier series approximation of drawn paths (sans-IO).
//!
//! Approximates a closed 2D path with a complex Fourier series through:
//! sampling -> per-harmonic Romberg integration -> coefficient sequence ->
//! partial-sum reconstruction.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! point slices and returns structured data. Export and command-line
//! handling live in `epicycle-export` and `epicycle-bench`.

pub mod diagnostics;
pub mod integrate;
pub mod reconstruct;
pub mod sample;
pub mod synthesize;
pub mod types;

pub use integrate::{Integral, integrate, romberg};
pub use reconstruct::{evaluate, reconstruct};
pub use sample::PathSampler;
pub use synthesize::{HarmonicIntegrand, HarmonicReport, synthesize, synthesize_with_report};
pub use types::{
    Approximation, CoefficientSequence, Path, Point, Polyline, SeriesConfig, SeriesError,
};

/// Default reconstruction range for `path`: `[1, L)`.
///
/// Sample `k` of this range sits at parameter `k / (L - 1)`. The sampled
/// path is a step function that jumps from point `k - 1` to point `k`
/// exactly there, so the partial sums converge to the midpoint of those
/// two points rather than to point `k` itself.
#[must_use]
pub const fn default_range(path: &Path) -> (usize, usize) {
    (1, path.len())
}

/// Approximate a drawn path with a Fourier series and reconstruct it.
///
/// # Steps
///
/// 1. Validate the configuration and build a [`Path`]
/// 2. Synthesize the `2N + 1` coefficients
/// 3. Reconstruct over [`default_range`]
///
/// # Errors
///
/// Returns [`SeriesError::InvalidConfig`] if `config` fails
/// [`SeriesConfig::validate`].
/// Returns [`SeriesError::TooFewPoints`] or [`SeriesError::NonFinitePoint`]
/// if `points` is not a valid path.
pub fn approximate(points: &[Point], config: &SeriesConfig) -> Result<Approximation, SeriesError> {
    config.validate()?;
    let path = Path::new(points)?;

    let coefficients = synthesize(&path, config);

    let (start, end) = default_range(&path);
    let reconstruction = reconstruct(&coefficients, start, end);

    Ok(Approximation {
        coefficients,
        reconstruction,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn closed_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
        ]
    }

    #[test]
    fn approximate_rejects_short_path() {
        let result = approximate(&[Point::new(1.0, 1.0)], &SeriesConfig::default());
        assert!(matches!(result, Err(SeriesError::TooFewPoints { count: 1 })));
    }

    #[test]
    fn approximate_rejects_invalid_config() {
        let config = SeriesConfig {
            tolerance: -1.0,
            ..SeriesConfig::default()
        };
        let result = approximate(&closed_square(), &config);
        assert!(matches!(result, Err(SeriesError::InvalidConfig(_))));
    }

    #[test]
    fn approximate_reconstructs_default_range() {
        let config = SeriesConfig {
            harmonics: 8,
            tolerance: 1e-6,
        };
        let result = approximate(&closed_square(), &config).unwrap();
        assert_eq!(result.coefficients.len(), 17);
        assert_eq!(result.reconstruction.len(), 4);
        assert!((result.coefficients.dc() - num_complex::Complex64::new(0.5, 0.5)).norm() < 1e-3);
    }

    #[test]
    fn default_range_skips_first_point() {
        let path = Path::new(&closed_square()).unwrap();
        assert_eq!(default_range(&path), (1, 5));
    }

    #[test]
    fn default_range_lands_between_points() {
        let points = closed_square();
        let config = SeriesConfig {
            harmonics: 16,
            tolerance: 1e-6,
        };
        let result = approximate(&points, &config).unwrap();
        for (k, p) in (1..points.len()).zip(result.reconstruction.points()) {
            let a = points[k - 1];
            let b = points[k];
            let midpoint = Point::new(f64::midpoint(a.x, b.x), f64::midpoint(a.y, b.y));
            assert!(p.distance(midpoint) < 0.05, "k={k}: {p:?}");
            assert!(p.distance(b) > 0.4, "k={k}: {p:?}");
        }
    }

    #[test]
    fn approximation_serde_round_trip() {
        let config = SeriesConfig {
            harmonics: 2,
            tolerance: 1e-6,
        };
        let result = approximate(&closed_square(), &config).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: Approximation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.coefficients.len(), result.coefficients.len());
        assert_eq!(back.reconstruction.len(), result.reconstruction.len());
    }
}
