//! Path sampling: view a discrete path as a function of `t` in `[0, 1]`.
//!
//! The integrator needs a continuous parameterization of the drawn path.
//! [`PathSampler`] maps a parameter value onto the recorded points by
//! nearest-previous lookup: index `floor(t * (L - 1))`, no interpolation.
//! The path therefore becomes a step function, and reconstruction
//! fidelity is bounded by the point spacing as well as by the harmonic
//! count.

use num_complex::Complex64;

use crate::types::Path;

/// A borrowed path viewed as a step function of `t`.
///
/// Sampling never mutates the path.
#[derive(Debug, Clone, Copy)]
pub struct PathSampler<'a> {
    samples: &'a [Complex64],
}

impl<'a> PathSampler<'a> {
    /// Borrow `path` for sampling.
    #[must_use]
    pub fn new(path: &'a Path) -> Self {
        Self {
            samples: path.samples(),
        }
    }

    /// Path value at parameter `t`.
    ///
    /// `t = 0` is the first point and `t = 1` the last. Values outside
    /// `[0, 1]` are clamped.
    #[must_use]
    pub fn sample(&self, t: f64) -> Complex64 {
        self.samples[self.index(t)]
    }

    /// Point index selected for parameter `t`.
    #[must_use]
    pub fn index(&self, t: f64) -> usize {
        let last = self.samples.len() - 1;
        let t = t.clamp(0.0, 1.0);
        #[allow(clippy::cast_precision_loss)]
        let position = t * last as f64;
        // Truncation toward zero; `position` is non-negative and at most `last`.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = position as usize;
        index.min(last)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn square() -> Path {
        Path::new(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn endpoints() {
        let path = square();
        let sampler = PathSampler::new(&path);
        assert_eq!(sampler.sample(0.0), Complex64::new(0.0, 0.0));
        assert_eq!(sampler.sample(1.0), Complex64::new(0.0, 1.0));
    }

    #[test]
    fn truncates_instead_of_rounding() {
        let path = square();
        let sampler = PathSampler::new(&path);
        // 0.3 * 3 = 0.9 -> index 0, even though index 1 is closer.
        assert_eq!(sampler.index(0.3), 0);
        assert_eq!(sampler.sample(0.3), Complex64::new(0.0, 0.0));
        // 0.5 * 3 = 1.5 -> index 1.
        assert_eq!(sampler.sample(0.5), Complex64::new(1.0, 0.0));
        // 0.99 * 3 = 2.97 -> index 2.
        assert_eq!(sampler.sample(0.99), Complex64::new(1.0, 1.0));
    }

    #[test]
    fn two_point_path() {
        let path = Path::new(&[Point::new(-1.0, 0.0), Point::new(1.0, 0.0)]).unwrap();
        let sampler = PathSampler::new(&path);
        assert_eq!(sampler.sample(0.0), Complex64::new(-1.0, 0.0));
        assert_eq!(sampler.sample(0.999), Complex64::new(-1.0, 0.0));
        assert_eq!(sampler.sample(1.0), Complex64::new(1.0, 0.0));
    }

    #[test]
    fn grid_parameters_hit_their_point() {
        let path = square();
        let sampler = PathSampler::new(&path);
        assert_eq!(sampler.index(1.0 / 3.0), 1);
        assert_eq!(sampler.index(2.0 / 3.0), 2);
    }

    #[test]
    fn out_of_range_parameter_is_clamped() {
        let path = square();
        let sampler = PathSampler::new(&path);
        assert_eq!(sampler.index(-0.5), 0);
        assert_eq!(sampler.index(1.5), 3);
    }
}
