//! Mean, variance and skewness of discrete distributions, with a shape classification.

use std::fmt;

/// Moments of a discrete distribution supported on `0..len`.
///
/// The distribution is given as non-negative weights indexed by outcome: either a probability
/// mass function or raw frequency counts from a simulation. Weights are normalized
/// internally, so both work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// The expected outcome `E[K]`.
    pub mean: f64,
    /// The variance `E[(K - E[K])^2]`.
    pub variance: f64,
    /// The standard deviation (square root of the variance).
    pub std_dev: f64,
    /// The standardized third central moment. Zero when the variance is zero.
    pub skewness: f64,
}

/// Coarse description of a distribution's asymmetry, derived from its skewness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionShape {
    /// `|skewness| < 0.1`
    Symmetric,
    /// `0.1 <= |skewness| < 0.5`
    ModeratelySymmetric,
    /// `skewness >= 0.5`: the tail extends to the right.
    RightSkewed,
    /// `skewness <= -0.5`: the tail extends to the left.
    LeftSkewed,
}

impl fmt::Display for DistributionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Symmetric => "approximately symmetric",
            Self::ModeratelySymmetric => "moderately symmetric",
            Self::RightSkewed => "right-skewed",
            Self::LeftSkewed => "left-skewed",
        };
        f.write_str(s)
    }
}

impl Moments {
    /// Computes moments from weights indexed by outcome.
    ///
    /// # Returns
    ///
    /// * `Some(Moments)` - if the weights have a positive, finite total
    /// * `None` - if `weights` is empty, sums to zero, or contains non-finite values
    ///
    /// # Examples
    ///
    /// ```
    /// # use selprob_stats::moments::Moments;
    /// // Frequency counts work as well as probabilities.
    /// let moments = Moments::from_weights(&[10.0, 0.0, 10.0]).unwrap();
    /// assert!((moments.mean - 1.0).abs() < 1e-12);
    /// assert!((moments.std_dev - 1.0).abs() < 1e-12);
    /// assert_eq!(moments.skewness, 0.0);
    ///
    /// assert!(Moments::from_weights(&[]).is_none());
    /// assert!(Moments::from_weights(&[0.0, 0.0]).is_none());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_weights(weights: &[f64]) -> Option<Self> {
        let total = weights.iter().sum::<f64>();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }

        let probs = || weights.iter().map(|w| w / total).enumerate();
        let mean = probs().map(|(k, p)| k as f64 * p).sum::<f64>();
        let central = |power: i32| {
            probs()
                .map(|(k, p)| (k as f64 - mean).powi(power) * p)
                .sum::<f64>()
        };
        let variance = central(2).max(0.0);
        let std_dev = variance.sqrt();
        let skewness = if std_dev <= f64::EPSILON * mean.abs().max(1.0) {
            0.0
        } else {
            central(3) / std_dev.powi(3)
        };

        Some(Self {
            mean,
            variance,
            std_dev,
            skewness,
        })
    }

    /// Computes moments from integer frequency counts.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_counts(counts: &[u64]) -> Option<Self> {
        let weights = counts.iter().map(|&c| c as f64).collect::<Vec<_>>();
        Self::from_weights(&weights)
    }

    /// Classifies the distribution's asymmetry from its skewness.
    #[must_use]
    pub fn shape(&self) -> DistributionShape {
        match self.skewness {
            s if s.abs() < 0.1 => DistributionShape::Symmetric,
            s if s >= 0.5 => DistributionShape::RightSkewed,
            s if s <= -0.5 => DistributionShape::LeftSkewed,
            _ => DistributionShape::ModeratelySymmetric,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_mass() {
        let moments = Moments::from_weights(&[0.0, 0.0, 1.0]).unwrap();
        assert!((moments.mean - 2.0).abs() < 1e-12);
        assert_eq!(moments.variance, 0.0);
        assert_eq!(moments.skewness, 0.0);
        assert_eq!(moments.shape(), DistributionShape::Symmetric);
    }

    #[test]
    fn test_binomial_moments() {
        // Binomial(4, 0.5): mean 2, variance 1, skewness 0
        let pmf = [0.0625, 0.25, 0.375, 0.25, 0.0625];
        let moments = Moments::from_weights(&pmf).unwrap();
        assert!((moments.mean - 2.0).abs() < 1e-12);
        assert!((moments.variance - 1.0).abs() < 1e-12);
        assert!(moments.skewness.abs() < 1e-12);
    }

    #[test]
    fn test_right_skew() {
        // Geometric-like tail to the right.
        let pmf = [0.6, 0.25, 0.1, 0.05];
        let moments = Moments::from_weights(&pmf).unwrap();
        assert!(moments.skewness > 0.5);
        assert_eq!(moments.shape(), DistributionShape::RightSkewed);
    }

    #[test]
    fn test_left_skew_mirrors_right_skew() {
        let right = Moments::from_weights(&[0.6, 0.25, 0.1, 0.05]).unwrap();
        let left = Moments::from_weights(&[0.05, 0.1, 0.25, 0.6]).unwrap();
        assert!((right.skewness + left.skewness).abs() < 1e-12);
        assert_eq!(left.shape(), DistributionShape::LeftSkewed);
    }

    #[test]
    fn test_counts_match_weights() {
        let from_counts = Moments::from_counts(&[3, 5, 2]).unwrap();
        let from_weights = Moments::from_weights(&[0.3, 0.5, 0.2]).unwrap();
        assert!((from_counts.mean - from_weights.mean).abs() < 1e-12);
        assert!((from_counts.variance - from_weights.variance).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(Moments::from_counts(&[]).is_none());
        assert!(Moments::from_counts(&[0, 0, 0]).is_none());
        assert!(Moments::from_weights(&[f64::NAN, 1.0]).is_none());
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(DistributionShape::RightSkewed.to_string(), "right-skewed");
    }
}
