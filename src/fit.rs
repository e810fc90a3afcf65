//! Maximum-likelihood fitting of fire size and fire count distributions.
//!
//! All of the shape/location/scale families are fitted with the location fixed at zero, so each
//! fit estimates only a shape and a scale.
use crate::distribution::{DistributionKind, FittedParameters};
use thiserror::Error;

mod mle;
pub use mle::{fit_exponential, fit_gamma, fit_pareto, fit_weibull};

/// An error which occurred while fitting a distribution to a sample
#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    /// The sample contained no values
    #[error("Cannot fit {0} distribution to an empty sample")]
    EmptyInput(DistributionKind),
    /// The sample contained a value the distribution cannot produce
    #[error("Value {value} is outside the support of the {kind} distribution")]
    OutsideSupport {
        /// The distribution being fitted
        kind: DistributionKind,
        /// The offending value
        value: f64,
    },
    /// The sample does not contain enough information to fit the distribution
    #[error("Cannot fit {kind} distribution to a degenerate sample: {reason}")]
    Degenerate {
        /// The distribution being fitted
        kind: DistributionKind,
        /// Why the sample is degenerate
        reason: &'static str,
    },
    /// The numerical solver failed to find the maximum-likelihood estimate
    #[error("Fitting {kind} distribution did not converge after {iterations} iterations")]
    Convergence {
        /// The distribution being fitted
        kind: DistributionKind,
        /// The number of iterations attempted
        iterations: u32,
    },
}

/// Fit the fire size distributions to a sample of fire sizes.
///
/// # Returns
///
/// Exponential, Weibull and Pareto fits, in that order.
pub fn fit_size_distribution(sample: &[f64]) -> Result<FittedParameters, FitError> {
    Ok([
        fit_exponential(sample)?,
        fit_weibull(sample)?,
        fit_pareto(sample)?,
    ]
    .into_iter()
    .collect())
}

/// Fit the rate distributions of the fire count process to a sample of fire counts.
///
/// # Returns
///
/// Gamma and exponential fits, in that order.
pub fn fit_count_process(sample: &[f64]) -> Result<FittedParameters, FitError> {
    Ok([fit_gamma(sample)?, fit_exponential(sample)?]
        .into_iter()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::FittedDistribution;
    use crate::fixture::{annual_counts, fire_sizes};
    use float_cmp::assert_approx_eq;
    use itertools::assert_equal;
    use rstest::rstest;

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_fit_size_distribution_exponential_is_mean() {
        let parameters = fit_size_distribution(&[100.0, 200.0, 300.0, 400.0]).unwrap();
        assert_eq!(
            parameters.get(DistributionKind::Exponential),
            Some(&FittedDistribution::Exponential { scale: 250.0 })
        );
        assert_eq!(parameters.get(DistributionKind::Exponential).unwrap().scale(), 250.0);
    }

    #[rstest]
    #[allow(clippy::float_cmp)]
    fn test_fit_size_distribution(fire_sizes: Vec<f64>) {
        let parameters = fit_size_distribution(&fire_sizes).unwrap();
        assert_equal(
            parameters.iter().map(|(kind, _)| *kind),
            [
                DistributionKind::Exponential,
                DistributionKind::Weibull,
                DistributionKind::Pareto,
            ],
        );

        let mean = fire_sizes.iter().sum::<f64>() / fire_sizes.len() as f64;
        assert_approx_eq!(
            f64,
            parameters.get(DistributionKind::Exponential).unwrap().scale(),
            mean,
            epsilon = 1e-9
        );

        for (_, distribution) in parameters.iter().skip(1) {
            let (shape, location, scale) = distribution.shape_loc_scale().unwrap().as_tuple();
            assert!(location == 0.0);
            assert!(shape.is_finite() && shape > 0.0);
            assert!(scale.is_finite() && scale > 0.0);
        }
    }

    #[rstest]
    #[allow(clippy::float_cmp)]
    fn test_fit_count_process(annual_counts: Vec<f64>) {
        let parameters = fit_count_process(&annual_counts).unwrap();
        assert_equal(
            parameters.iter().map(|(kind, _)| *kind),
            [DistributionKind::Gamma, DistributionKind::Exponential],
        );

        let gamma = parameters.get(DistributionKind::Gamma).unwrap();
        let params = gamma.shape_loc_scale().unwrap();
        assert!(params.location == 0.0);

        // The MLE of the gamma mean is the sample mean
        let mean = annual_counts.iter().sum::<f64>() / annual_counts.len() as f64;
        assert_approx_eq!(f64, params.shape * params.scale, mean, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_size_distribution_empty() {
        assert_eq!(
            fit_size_distribution(&[]),
            Err(FitError::EmptyInput(DistributionKind::Exponential))
        );
    }

    #[test]
    fn test_fit_count_process_empty() {
        assert_eq!(
            fit_count_process(&[]),
            Err(FitError::EmptyInput(DistributionKind::Gamma))
        );
    }

    #[test]
    fn test_fit_count_process_zero_count() {
        // Years with no fires fall outside the support of the gamma distribution
        assert_eq!(
            fit_count_process(&[3.0, 0.0, 5.0]),
            Err(FitError::OutsideSupport {
                kind: DistributionKind::Gamma,
                value: 0.0
            })
        );
    }

    #[test]
    fn test_fit_error_message() {
        let err = FitError::Convergence {
            kind: DistributionKind::Weibull,
            iterations: 10,
        };
        assert_eq!(
            err.to_string(),
            "Fitting weibull distribution did not converge after 10 iterations"
        );
    }
}
