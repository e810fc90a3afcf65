//! Maximum-likelihood estimators for the individual distribution families.
use super::FitError;
use crate::distribution::{DistributionKind, FittedDistribution, ShapeLocScale};
use statrs::function::gamma::digamma;
use statrs::statistics::Statistics;

/// The maximum number of iterations for the shape parameter solver
const MAX_ITERATIONS: u32 = 500;

/// The maximum number of times the initial bracket for the solver is widened
const MAX_BRACKET_STEPS: u32 = 64;

/// Relative tolerance for convergence of the shape parameter
const TOLERANCE: f64 = 1e-12;

/// Above this value, polygamma functions are evaluated with their asymptotic expansions
const ASYMPTOTIC_THRESHOLD: f64 = 10.0;

/// Fit an exponential distribution, whose scale is the sample mean
pub fn fit_exponential(sample: &[f64]) -> Result<FittedDistribution, FitError> {
    let kind = DistributionKind::Exponential;
    if sample.is_empty() {
        return Err(FitError::EmptyInput(kind));
    }
    if let Some(&value) = sample.iter().find(|x| !(x.is_finite() && **x >= 0.0)) {
        return Err(FitError::OutsideSupport { kind, value });
    }

    let scale = Statistics::mean(sample);
    if scale <= 0.0 {
        return Err(FitError::Degenerate {
            kind,
            reason: "all values are zero",
        });
    }

    Ok(FittedDistribution::Exponential { scale })
}

/// Fit a Weibull distribution with its location fixed at zero.
///
/// The shape `k` is the root of the profile likelihood equation
/// `Σ xᵏ ln x / Σ xᵏ - 1/k - mean(ln x) = 0`, after which the scale is `(mean xᵏ)^(1/k)`.
pub fn fit_weibull(sample: &[f64]) -> Result<FittedDistribution, FitError> {
    let kind = DistributionKind::Weibull;
    check_positive_sample(kind, sample)?;

    let logs: Vec<f64> = sample.iter().map(|x| x.ln()).collect();
    let mean_log = Statistics::mean(&logs);
    // Powers are computed relative to the largest value to avoid overflow
    let max_log = Statistics::max(&logs);

    let equation = |shape: f64| {
        let (mut sum_w, mut sum_wy, mut sum_wyy) = (0.0, 0.0, 0.0);
        for &y in &logs {
            let w = (shape * (y - max_log)).exp();
            sum_w += w;
            sum_wy += w * y;
            sum_wyy += w * y * y;
        }
        let weighted_mean = sum_wy / sum_w;
        let value = weighted_mean - 1.0 / shape - mean_log;
        let derivative = sum_wyy / sum_w - weighted_mean * weighted_mean + 1.0 / (shape * shape);
        (value, derivative)
    };
    let shape = find_root(kind, equation, 1.0)?;

    let mean_power = Statistics::mean(logs.iter().map(|y| (shape * (y - max_log)).exp()));
    let scale = (max_log + mean_power.ln() / shape).exp();

    Ok(FittedDistribution::Weibull(ShapeLocScale::new(shape, scale)))
}

/// Fit a Pareto distribution with its location fixed at zero.
///
/// The scale is the smallest value in the sample and the shape is `n / Σ ln(x / scale)`.
pub fn fit_pareto(sample: &[f64]) -> Result<FittedDistribution, FitError> {
    let kind = DistributionKind::Pareto;
    check_positive_sample(kind, sample)?;

    let scale = Statistics::min(sample);
    let sum_log_ratio: f64 = sample.iter().map(|x| (x / scale).ln()).sum();
    if sum_log_ratio <= 0.0 {
        return Err(FitError::Degenerate {
            kind,
            reason: "all values are equal",
        });
    }
    let shape = sample.len() as f64 / sum_log_ratio;

    Ok(FittedDistribution::Pareto(ShapeLocScale::new(shape, scale)))
}

/// Fit a gamma distribution with its location fixed at zero.
///
/// With `s = ln(mean x) - mean(ln x)`, the shape `a` is the root of `ln a - ψ(a) = s` and the
/// scale is `mean x / a`.
pub fn fit_gamma(sample: &[f64]) -> Result<FittedDistribution, FitError> {
    let kind = DistributionKind::Gamma;
    check_positive_sample(kind, sample)?;

    let mean = Statistics::mean(sample);
    let mean_log = Statistics::mean(sample.iter().map(|x| x.ln()));
    let s = mean.ln() - mean_log;
    if s <= 0.0 {
        return Err(FitError::Degenerate {
            kind,
            reason: "sample has no spread",
        });
    }

    let initial = (3.0 - s + ((s - 3.0).powi(2) + 24.0 * s).sqrt()) / (12.0 * s);
    let equation = |shape: f64| (log_minus_digamma(shape) - s, 1.0 / shape - trigamma(shape));
    let shape = find_root(kind, equation, initial)?;

    Ok(FittedDistribution::Gamma(ShapeLocScale::new(
        shape,
        mean / shape,
    )))
}

/// Check that a sample can be used to fit a two-parameter distribution on `(0, ∞)`
fn check_positive_sample(kind: DistributionKind, sample: &[f64]) -> Result<(), FitError> {
    if sample.is_empty() {
        return Err(FitError::EmptyInput(kind));
    }
    if let Some(&value) = sample.iter().find(|x| !(x.is_finite() && **x > 0.0)) {
        return Err(FitError::OutsideSupport { kind, value });
    }
    if Statistics::max(sample) <= Statistics::min(sample) {
        return Err(FitError::Degenerate {
            kind,
            reason: "all values are equal",
        });
    }

    Ok(())
}

/// Find the root of a monotonic function on `(0, ∞)`.
///
/// `equation` returns the value of the function and its derivative. A bracket around `initial`
/// is widened until it contains a sign change, then Newton steps are taken, falling back to
/// bisection whenever a step would leave the bracket.
fn find_root<F>(kind: DistributionKind, equation: F, initial: f64) -> Result<f64, FitError>
where
    F: Fn(f64) -> (f64, f64),
{
    let not_converged = |iterations| FitError::Convergence { kind, iterations };

    let (mut lo, mut hi) = (initial, initial);
    let mut steps = 0;
    let lo_negative = loop {
        let (f_lo, _) = equation(lo);
        let (f_hi, _) = equation(hi);
        if !(f_lo.is_finite() && f_hi.is_finite()) {
            return Err(not_converged(steps));
        }
        if (f_lo < 0.0) != (f_hi < 0.0) {
            break f_lo < 0.0;
        }

        steps += 1;
        if steps > MAX_BRACKET_STEPS {
            return Err(not_converged(steps));
        }
        lo /= 2.0;
        hi *= 2.0;
    };

    let mut x = initial;
    for _ in 0..MAX_ITERATIONS {
        let (value, derivative) = equation(x);
        if !value.is_finite() {
            return Err(not_converged(MAX_ITERATIONS));
        }

        if (value < 0.0) == lo_negative {
            lo = x;
        } else {
            hi = x;
        }
        if hi - lo <= TOLERANCE * x {
            return Ok(x);
        }

        let newton = x - value / derivative;
        let next = if newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        if (next - x).abs() <= TOLERANCE * next.abs() {
            return Ok(next);
        }
        x = next;
    }

    Err(not_converged(MAX_ITERATIONS))
}

/// Computes `ln x - ψ(x)`.
///
/// For large `x` the two terms almost cancel, so the asymptotic expansion is used instead.
fn log_minus_digamma(x: f64) -> f64 {
    if x < ASYMPTOTIC_THRESHOLD {
        return x.ln() - digamma(x);
    }

    let inv = 1.0 / x;
    let inv2 = inv * inv;
    inv / 2.0
        + inv2 * (1.0 / 12.0 - inv2 * (1.0 / 120.0 - inv2 * (1.0 / 252.0 - inv2 / 240.0)))
}

/// The trigamma function, i.e. the derivative of the digamma function
fn trigamma(x: f64) -> f64 {
    // Shift the argument up with the recurrence ψ₁(x) = ψ₁(x + 1) + 1/x², then use the
    // asymptotic expansion
    let mut x = x;
    let mut acc = 0.0;
    while x < ASYMPTOTIC_THRESHOLD {
        acc += 1.0 / (x * x);
        x += 1.0;
    }

    let inv = 1.0 / x;
    let inv2 = inv * inv;
    acc + inv
        + inv2 / 2.0
        + inv
            * inv2
            * (1.0 / 6.0
                - inv2 * (1.0 / 30.0 - inv2 * (1.0 / 42.0 - inv2 * (1.0 / 30.0 - inv2 * 5.0 / 66.0))))
}
