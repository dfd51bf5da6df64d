//! Numeric building blocks for the selection-probability engine.
//!
//! This crate has no dependencies and knows nothing about populations or samples. It provides:
//!
//! - **Combinatorics**: overflow-resistant binomial coefficients and binomial point masses
//! - **Special functions**: error function, normal CDF and log-factorials used by the
//!   approximation models
//! - **Moments**: mean, variance, standard deviation and skewness of a discrete
//!   distribution over `0..len`
//!
//! # Modules
//!
//! - [`combinatorics`]: `choose`, `ln_choose` and binomial point probabilities
//! - [`special`]: `erf`, `normal_cdf`, `ln_factorial`
//! - [`moments`]: moments and shape classification of probability mass functions
//!
//! # Examples
//!
//! ## Binomial coefficients
//!
//! ```
//! use selprob_stats::combinatorics::choose;
//!
//! assert_eq!(choose(10, 4), 210.0);
//! assert_eq!(choose(4, 10), 0.0);
//! ```
//!
//! ## Binomial point masses
//!
//! ```
//! use selprob_stats::combinatorics::binomial_point_mass;
//!
//! let p = binomial_point_mass(50, 0, 0.05);
//! assert!((p - 0.95_f64.powi(50)).abs() < 1e-12);
//! ```
//!
//! ## Moments of a probability mass function
//!
//! ```
//! use selprob_stats::moments::Moments;
//!
//! let moments = Moments::from_weights(&[0.25, 0.5, 0.25]).unwrap();
//! assert!((moments.mean - 1.0).abs() < 1e-12);
//! assert!((moments.variance - 0.5).abs() < 1e-12);
//! ```

pub mod combinatorics;
pub mod moments;
pub mod special;
