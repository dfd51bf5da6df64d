//! Binomial coefficients and binomial point probabilities.
//!
//! All values are `f64`. [`choose`] keeps intermediate magnitudes bounded by multiplying and
//! dividing one factor at a time over the shorter side of the coefficient, so it stays exact
//! for small arguments and finite up to `choose(1020, 510)` or so. Beyond that it returns
//! `f64::INFINITY`, and callers switch to the log-space variants ([`ln_choose`],
//! [`ln_binomial_point_mass`]).

/// Computes the binomial coefficient "n choose k".
///
/// Returns `0.0` when `k > n`; that is an impossible selection, not an error.
///
/// The product runs over `min(k, n - k)` factors and divides at every step, so the
/// running value never exceeds the final coefficient by more than a factor of `k`.
///
/// # Examples
///
/// ```
/// # use selprob_stats::combinatorics::choose;
/// assert_eq!(choose(52, 5), 2_598_960.0);
/// assert_eq!(choose(7, 0), 1.0);
/// assert_eq!(choose(3, 4), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn choose(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = usize::min(k, n - k);
    let mut result = 1.0;
    for i in 1..=k {
        result *= (n - k + i) as f64;
        result /= i as f64;
    }
    result
}

/// Natural logarithm of [`choose`].
///
/// Returns `f64::NEG_INFINITY` when `k > n`, matching `ln(0)`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn ln_choose(n: usize, k: usize) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = usize::min(k, n - k);
    (1..=k)
        .map(|i| ((n - k + i) as f64).ln() - (i as f64).ln())
        .sum()
}

/// Probability of exactly `k` successes in `n` independent trials with success probability `p`.
///
/// Computes `choose(n, k) * p^k * (1 - p)^(n - k)` directly when that is representable and
/// falls back to [`ln_binomial_point_mass`] when the coefficient overflows or the powers
/// underflow.
///
/// Returns `0.0` when `p` is outside `[0, 1]` (including NaN) or `k > n`.
///
/// # Examples
///
/// ```
/// # use selprob_stats::combinatorics::binomial_point_mass;
/// assert!((binomial_point_mass(4, 2, 0.5) - 0.375).abs() < 1e-12);
/// assert_eq!(binomial_point_mass(4, 2, 1.5), 0.0);
/// assert_eq!(binomial_point_mass(4, 0, 0.0), 1.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn binomial_point_mass(n: usize, k: usize, p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) || k > n {
        return 0.0;
    }
    // Degenerate trials: avoid 0^0 and ln(0).
    if p <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if p >= 1.0 {
        return if k == n { 1.0 } else { 0.0 };
    }

    let direct = choose(n, k) * p.powf(k as f64) * (1.0 - p).powf((n - k) as f64);
    if direct.is_normal() {
        direct
    } else {
        ln_binomial_point_mass(n, k, p).exp()
    }
}

/// Natural logarithm of [`binomial_point_mass`].
///
/// Returns `f64::NEG_INFINITY` for zero-probability outcomes, and NaN when `p` is outside
/// `[0, 1]`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn ln_binomial_point_mass(n: usize, k: usize, p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if k > n {
        return f64::NEG_INFINITY;
    }
    let success = if k == 0 { 0.0 } else { k as f64 * p.ln() };
    let failure = if k == n {
        0.0
    } else {
        (n - k) as f64 * (-p).ln_1p()
    };
    ln_choose(n, k) + success + failure
}
