//! Special functions used by the approximation models.

use std::f64::consts::SQRT_2;

/// Error function, Abramowitz & Stegun formula 7.1.26.
///
/// Maximum absolute error is about `1.5e-7`, which is well below the display precision of
/// any probability this crate reports.
///
/// # Examples
///
/// ```
/// # use selprob_stats::special::erf;
/// assert!(erf(0.0).abs() < 1e-8);
/// assert!((erf(1.0) - 0.842_700_79).abs() < 1e-6);
/// assert!((erf(-1.0) + 0.842_700_79).abs() < 1e-6);
/// ```
#[must_use]
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Cumulative distribution function of `Normal(mu, sigma^2)` at `x`.
///
/// A zero (or negative) `sigma` is treated as a point mass at `mu`.
#[must_use]
pub fn normal_cdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return if x >= mu { 1.0 } else { 0.0 };
    }
    0.5 * (1.0 + erf((x - mu) / (sigma * SQRT_2)))
}

/// Natural logarithm of `n!`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn ln_factorial(n: usize) -> f64 {
    (2..=n).map(|i| (i as f64).ln()).sum()
}
