//! Shared types for the epicycle series pipeline.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A 2D point in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for Complex64 {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Complex64> for Point {
    fn from(c: Complex64) -> Self {
        Self::new(c.re, c.im)
    }
}

/// A sequence of connected points forming a line strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// A validated input path: at least two finite points in drawing order.
///
/// Sampling divides by `len() - 1`, so a path is only constructible
/// through [`Path::new`], which rejects shorter inputs. Samples are
/// stored as [`Complex64`] so the integrand never converts per call.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    samples: Vec<Complex64>,
}

impl Path {
    /// Minimum number of points a path must contain.
    pub const MIN_POINTS: usize = 2;

    /// Build a path from drawn points.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::TooFewPoints`] if fewer than
    /// [`Path::MIN_POINTS`] points are given, or
    /// [`SeriesError::NonFinitePoint`] if any coordinate is NaN or
    /// infinite.
    pub fn new(points: &[Point]) -> Result<Self, SeriesError> {
        if points.len() < Self::MIN_POINTS {
            return Err(SeriesError::TooFewPoints {
                count: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(SeriesError::NonFinitePoint { index });
        }
        Ok(Self {
            samples: points.iter().copied().map(Complex64::from).collect(),
        })
    }

    /// Number of points in the path. Always at least two.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; present for API symmetry with [`Polyline`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The path points as complex samples (`x + iy`).
    #[must_use]
    pub fn samples(&self) -> &[Complex64] {
        &self.samples
    }

    /// Copy the path back out as a [`Polyline`].
    #[must_use]
    pub fn to_polyline(&self) -> Polyline {
        Polyline::new(self.samples.iter().copied().map(Point::from).collect())
    }
}

/// Fourier coefficients ordered by ascending harmonic, `-N..=N`.
///
/// The length is always `2N + 1` and harmonic 0 sits at index `N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Complex64>", into = "Vec<Complex64>")]
pub struct CoefficientSequence(Vec<Complex64>);

impl CoefficientSequence {
    /// Wrap raw coefficients ordered from harmonic `-N` to `N`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::EvenCoefficientCount`] if the length is
    /// even (including zero), since no `N` satisfies `len == 2N + 1`.
    pub fn new(coefficients: Vec<Complex64>) -> Result<Self, SeriesError> {
        if coefficients.len() % 2 == 0 {
            return Err(SeriesError::EvenCoefficientCount {
                len: coefficients.len(),
            });
        }
        Ok(Self(coefficients))
    }

    /// Wrap coefficients produced for harmonics `-N..=N`.
    pub(crate) fn from_synthesis(coefficients: Vec<Complex64>) -> Self {
        debug_assert!(coefficients.len() % 2 == 1, "synthesis yields 2N + 1 terms");
        Self(coefficients)
    }

    /// Harmonic half-count `N`.
    #[must_use]
    pub const fn harmonic_count(&self) -> usize {
        self.0.len() / 2
    }

    /// Number of coefficients (`2N + 1`).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; the sequence holds at least the DC term.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coefficient of harmonic `k`, if `|k| <= N`.
    #[must_use]
    pub fn get(&self, k: i64) -> Option<Complex64> {
        let n = i64::try_from(self.harmonic_count()).ok()?;
        let index = usize::try_from(k.checked_add(n)?).ok()?;
        self.0.get(index).copied()
    }

    /// The harmonic-0 coefficient: the mean of the sampled path.
    #[must_use]
    pub fn dc(&self) -> Complex64 {
        self.0[self.harmonic_count()]
    }

    /// All coefficients in ascending harmonic order.
    #[must_use]
    pub fn as_slice(&self) -> &[Complex64] {
        &self.0
    }

    /// Iterate `(harmonic, coefficient)` pairs from `-N` to `N`.
    pub fn harmonics(&self) -> impl Iterator<Item = (i64, Complex64)> + '_ {
        let n = harmonic_offset(self.harmonic_count());
        self.0
            .iter()
            .zip(-n..)
            .map(|(&c, k)| (k, c))
    }
}

impl TryFrom<Vec<Complex64>> for CoefficientSequence {
    type Error = SeriesError;

    fn try_from(coefficients: Vec<Complex64>) -> Result<Self, Self::Error> {
        Self::new(coefficients)
    }
}

impl From<CoefficientSequence> for Vec<Complex64> {
    fn from(seq: CoefficientSequence) -> Self {
        seq.0
    }
}

/// Convert a harmonic half-count to a signed offset.
///
/// Counts are bounded by [`SeriesConfig::MAX_HARMONICS`] well before
/// `i64` overflow; saturate rather than panic on absurd inputs.
pub(crate) fn harmonic_offset(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Configuration for coefficient synthesis.
///
/// # Invariants
///
/// `tolerance` must be finite and non-negative; `0.0` selects
/// [`crate::integrate::DEFAULT_TOLERANCE`]. `harmonics` must not exceed
/// [`SeriesConfig::MAX_HARMONICS`]. Checked by [`SeriesConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Harmonic half-count `N`; the series has `2N + 1` terms.
    pub harmonics: u32,

    /// Absolute error target for each coefficient integral.
    pub tolerance: f64,
}

impl SeriesConfig {
    /// Default harmonic half-count.
    pub const DEFAULT_HARMONICS: u32 = 16;
    /// Default tolerance (`0.0` means the integrator's default precision).
    pub const DEFAULT_TOLERANCE: f64 = 0.0;
    /// Upper bound on `harmonics`.
    pub const MAX_HARMONICS: u32 = 4096;

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidConfig`] describing the first
    /// violated invariant.
    pub fn validate(&self) -> Result<(), SeriesError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SeriesError::InvalidConfig(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        if self.harmonics > Self::MAX_HARMONICS {
            return Err(SeriesError::InvalidConfig(format!(
                "harmonics must be at most {}, got {}",
                Self::MAX_HARMONICS,
                self.harmonics
            )));
        }
        Ok(())
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            harmonics: Self::DEFAULT_HARMONICS,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

/// Result of a full approximation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approximation {
    /// The synthesized coefficients.
    pub coefficients: CoefficientSequence,

    /// The series evaluated over the default reconstruction range.
    pub reconstruction: Polyline,
}

/// Errors raised while validating inputs to the series pipeline.
///
/// The numeric routines themselves never fail; integration that runs out
/// of refinement levels returns its best estimate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    /// The path has fewer than two points.
    #[error("path needs at least 2 points, got {count}")]
    TooFewPoints {
        /// Number of points supplied.
        count: usize,
    },

    /// A path point has a NaN or infinite coordinate.
    #[error("path point {index} has a non-finite coordinate")]
    NonFinitePoint {
        /// Index of the first offending point.
        index: usize,
    },

    /// Series configuration is invalid.
    #[error("invalid series configuration: {0}")]
    InvalidConfig(String),

    /// A coefficient sequence must have odd length `2N + 1`.
    #[error("coefficient sequence length must be odd, got {len}")]
    EvenCoefficientCount {
        /// Length supplied.
        len: usize,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Point tests ---

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_complex_conversion() {
        let c = Complex64::from(Point::new(1.5, -2.0));
        assert_eq!(c, Complex64::new(1.5, -2.0));
        assert_eq!(Point::from(c), Point::new(1.5, -2.0));
    }

    #[test]
    fn point_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f64::INFINITY).is_finite());
    }

    // --- Polyline tests ---

    #[test]
    fn polyline_first_and_last() {
        let pl = Polyline::new(vec![
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
            Point::new(5.0, 6.0),
        ]);
        assert_eq!(pl.len(), 3);
        assert_eq!(pl.first(), Some(&Point::new(1.0, 2.0)));
        assert_eq!(pl.last(), Some(&Point::new(5.0, 6.0)));
    }

    #[test]
    fn polyline_empty() {
        let pl = Polyline::new(vec![]);
        assert!(pl.is_empty());
        assert!(pl.first().is_none());
    }

    // --- Path tests ---

    #[test]
    fn path_rejects_empty_and_single_point() {
        assert_eq!(Path::new(&[]), Err(SeriesError::TooFewPoints { count: 0 }));
        assert_eq!(
            Path::new(&[Point::new(1.0, 1.0)]),
            Err(SeriesError::TooFewPoints { count: 1 }),
        );
    }

    #[test]
    fn path_rejects_non_finite_point() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(f64::NAN, 1.0),
        ];
        assert_eq!(
            Path::new(&points),
            Err(SeriesError::NonFinitePoint { index: 2 })
        );
    }

    #[test]
    fn path_keeps_drawing_order() {
        let points = vec![Point::new(0.0, 0.0), Point::new(2.0, 1.0)];
        let path = Path::new(&points).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.samples()[1], Complex64::new(2.0, 1.0));
        assert_eq!(path.to_polyline().into_points(), points);
    }

    // --- CoefficientSequence tests ---

    #[test]
    fn coefficients_reject_even_length() {
        assert_eq!(
            CoefficientSequence::new(vec![]),
            Err(SeriesError::EvenCoefficientCount { len: 0 })
        );
        assert_eq!(
            CoefficientSequence::new(vec![Complex64::new(0.0, 0.0); 4]),
            Err(SeriesError::EvenCoefficientCount { len: 4 })
        );
    }

    #[test]
    fn coefficients_index_by_harmonic() {
        let raw: Vec<Complex64> = (0..5).map(|i| Complex64::new(f64::from(i), 0.0)).collect();
        let seq = CoefficientSequence::new(raw).unwrap();
        assert_eq!(seq.harmonic_count(), 2);
        assert_eq!(seq.dc(), Complex64::new(2.0, 0.0));
        assert_eq!(seq.get(-2), Some(Complex64::new(0.0, 0.0)));
        assert_eq!(seq.get(2), Some(Complex64::new(4.0, 0.0)));
        assert_eq!(seq.get(3), None);
        assert_eq!(seq.get(-3), None);

        let harmonics: Vec<i64> = seq.harmonics().map(|(k, _)| k).collect();
        assert_eq!(harmonics, vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn coefficients_serde_rejects_even_length() {
        let json = "[[1.0,0.0],[0.0,1.0]]";
        let result: Result<CoefficientSequence, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    // --- SeriesConfig tests ---

    #[test]
    fn series_config_defaults() {
        let config = SeriesConfig::default();
        assert_eq!(config.harmonics, 16);
        assert!(config.tolerance.abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn series_config_rejects_negative_tolerance() {
        let config = SeriesConfig {
            tolerance: -1e-3,
            ..SeriesConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SeriesError::InvalidConfig(_))
        ));
    }

    #[test]
    fn series_config_rejects_nan_tolerance() {
        let config = SeriesConfig {
            tolerance: f64::NAN,
            ..SeriesConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn series_config_rejects_too_many_harmonics() {
        let config = SeriesConfig {
            harmonics: SeriesConfig::MAX_HARMONICS + 1,
            ..SeriesConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn series_config_serde_round_trip() {
        let config = SeriesConfig {
            harmonics: 8,
            tolerance: 1e-6,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SeriesConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn series_config_partial_json_uses_defaults() {
        let config: SeriesConfig = serde_json::from_str(r#"{"harmonics": 4}"#).unwrap();
        assert_eq!(config.harmonics, 4);
        assert!(config.tolerance.abs() < f64::EPSILON);
    }

    // --- SeriesError tests ---

    #[test]
    fn error_display() {
        assert_eq!(
            SeriesError::TooFewPoints { count: 1 }.to_string(),
            "path needs at least 2 points, got 1"
        );
        assert_eq!(
            SeriesError::InvalidConfig("bad".to_string()).to_string(),
            "invalid series configuration: bad"
        );
    }
}
