//! Romberg integration of complex-valued functions of a real argument.
//!
//! Trapezoid estimates on a grid that doubles at each level are combined
//! by Richardson extrapolation. Only two rows of the Romberg table are
//! kept (the previous level and the current one), so memory is fixed by
//! [`MAX_LEVELS`] regardless of the integrand.
//!
//! The routine never fails. If the tolerance is not met within
//! [`MAX_LEVELS`] refinements, the last extrapolated value is returned
//! with [`Integral::converged`] set to `false`.

use num_complex::Complex64;

/// Refinement budget: the finest grid has `2^MAX_LEVELS` intervals.
pub const MAX_LEVELS: usize = 20;

/// Tolerance substituted when the caller passes `0.0`.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Outcome of a Romberg integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integral {
    /// Best available estimate of the integral.
    pub value: Complex64,
    /// Magnitude of the difference between the last two diagonal
    /// entries of the Romberg table.
    pub error_estimate: f64,
    /// Number of refinement levels evaluated.
    pub levels: usize,
    /// Whether `error_estimate` fell below the tolerance.
    pub converged: bool,
}

/// Integrate `f` over `[a, b]` to an absolute `tolerance`.
///
/// A `tolerance` that is not strictly positive selects
/// [`DEFAULT_TOLERANCE`]. Convergence is only checked from the second
/// level on.
pub fn romberg<F>(f: F, a: f64, b: f64, tolerance: f64) -> Integral
where
    F: Fn(f64) -> Complex64,
{
    let tolerance = if tolerance > 0.0 {
        tolerance
    } else {
        DEFAULT_TOLERANCE
    };

    let zero = Complex64::new(0.0, 0.0);
    let mut rows = [[zero; MAX_LEVELS + 1]; 2];
    let mut current = 0;
    let mut h = b - a;
    let mut error_estimate = f64::INFINITY;

    // Level 0: single trapezoid, stored as the "previous" row.
    rows[1][0] = (f(a) + f(b)) * (h * 0.5);

    for level in 1..=MAX_LEVELS {
        let previous = 1 - current;
        h /= 2.0;

        // Only the odd grid points are new at this level.
        let mut midpoint_sum = zero;
        for j in 1..=(1_u32 << (level - 1)) {
            midpoint_sum += f(f64::from(2 * j - 1).mul_add(h, a));
        }
        rows[current][0] = midpoint_sum * h + rows[previous][0] / 2.0;

        let mut weight = 1.0;
        for order in 1..=level {
            weight *= 4.0;
            rows[current][order] = (rows[current][order - 1] * weight
                - rows[previous][order - 1])
                / (weight - 1.0);
        }

        error_estimate = (rows[current][level] - rows[previous][level - 1]).norm();
        if level > 1 && error_estimate < tolerance {
            return Integral {
                value: rows[current][level],
                error_estimate,
                levels: level,
                converged: true,
            };
        }

        current = previous;
    }

    Integral {
        value: rows[1 - current][MAX_LEVELS],
        error_estimate,
        levels: MAX_LEVELS,
        converged: false,
    }
}

/// Integrate `f` over `[a, b]`, returning only the estimate.
///
/// See [`romberg`] for the convergence diagnostics.
pub fn integrate<F>(f: F, a: f64, b: f64, tolerance: f64) -> Complex64
where
    F: Fn(f64) -> Complex64,
{
    romberg(f, a, b, tolerance).value
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{E, TAU};

    use super::*;

    fn close(a: Complex64, b: Complex64, eps: f64) -> bool {
        (a - b).norm() < eps
    }

    #[test]
    fn constant_integrand_is_exact() {
        let result = romberg(|_| Complex64::new(2.5, -1.0), 0.0, 1.0, 1e-6);
        assert!(result.converged);
        assert_eq!(result.levels, 2);
        assert!(close(result.value, Complex64::new(2.5, -1.0), 1e-12));
    }

    #[test]
    fn polynomial_integrand() {
        let result = romberg(|t| Complex64::new(t * t, 3.0 * t), 0.0, 1.0, 1e-12);
        assert!(result.converged);
        assert!(close(result.value, Complex64::new(1.0 / 3.0, 1.5), 1e-12));
    }

    #[test]
    fn reversed_bounds_negate_the_integral() {
        let forward = integrate(|t| Complex64::new(t * t, 3.0 * t), 0.0, 1.0, 1e-12);
        let backward = integrate(|t| Complex64::new(t * t, 3.0 * t), 1.0, 0.0, 1e-12);
        assert!(close(forward, -backward, 1e-12));
    }

    #[test]
    fn zero_tolerance_uses_default_precision() {
        let result = romberg(|t| Complex64::new(t.exp(), 0.0), 0.0, 1.0, 0.0);
        assert!(result.converged);
        assert!(result.error_estimate < DEFAULT_TOLERANCE);
        assert!(close(result.value, Complex64::new(E - 1.0, 0.0), 1e-12));
    }

    #[test]
    fn basis_functions_are_orthogonal() {
        // Integrate exp(i2πt) against exp(-i2πkt): 1 for k = 1, else 0.
        for k in -2_i32..=2 {
            let value = integrate(
                |t| Complex64::cis(TAU * t) * Complex64::cis(-TAU * f64::from(k) * t),
                0.0,
                1.0,
                1e-9,
            );
            let expected = if k == 1 { 1.0 } else { 0.0 };
            assert!(
                close(value, Complex64::new(expected, 0.0), 1e-9),
                "k={k}: got {value}"
            );
        }
    }

    #[test]
    fn discontinuous_integrand_exhausts_budget_silently() {
        // A step at a non-dyadic point defeats extrapolation; the error
        // only shrinks linearly with the grid spacing.
        let step = |t: f64| {
            if t < 1.0 / 3.0 {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        };
        let result = romberg(step, 0.0, 1.0, 1e-15);
        assert!(!result.converged);
        assert_eq!(result.levels, MAX_LEVELS);
        assert!(result.error_estimate.is_finite());
        assert!(close(result.value, Complex64::new(1.0 / 3.0, 0.0), 1e-4));
    }

    #[test]
    fn integrate_matches_romberg_value() {
        let f = |t: f64| Complex64::new(t.sin(), t.cos());
        assert_eq!(integrate(f, 0.0, 2.0, 1e-8), romberg(f, 0.0, 2.0, 1e-8).value);
    }
}
