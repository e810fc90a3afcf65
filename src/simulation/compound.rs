//! Monte Carlo sampling of the compound Poisson fire process.
//!
//! Fire counts are generated in two stages: a rate is drawn for each period from a fitted rate
//! distribution, then a Poisson count is drawn with that rate as its mean. The randomness of the
//! rate makes the counts over-dispersed compared with a plain Poisson process; with a gamma rate
//! distribution, the counts are negative binomial.
use crate::distribution::{DistributionKind, FittedParameters, InvalidParameters};
use indexmap::IndexMap;
use log::warn;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use thiserror::Error;

/// The rate distributions used to simulate fire counts
pub const RATE_MODELS: [DistributionKind; 2] = [DistributionKind::Gamma, DistributionKind::Exponential];

/// The fire size distributions which can be used to simulate burned area
pub const SIZE_MODELS: [DistributionKind; 3] = [
    DistributionKind::Exponential,
    DistributionKind::Weibull,
    DistributionKind::Pareto,
];

/// Simulated fire rates for each period, keyed by rate distribution
pub type SimulatedRates = IndexMap<DistributionKind, Vec<f64>>;

/// Simulated numbers of fires for each period, keyed by rate distribution
pub type SimulatedCounts = IndexMap<DistributionKind, Vec<u64>>;

/// Simulated total burned area in hectares, keyed by fire size distribution
pub type SimulatedFireAreas = IndexMap<DistributionKind, f64>;

/// An error which occurred while simulating the fire process
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// A required rate distribution had not been fitted
    #[error("No fitted {0} distribution available for simulating fire rates")]
    MissingDistribution(DistributionKind),
    /// A fitted distribution could not be sampled from
    #[error(transparent)]
    InvalidParameters(#[from] InvalidParameters),
    /// A rate could not be used as the mean of a Poisson distribution
    #[error("Invalid fire rate: {0}")]
    InvalidRate(f64),
}

/// Draw a fire rate for each of `num_periods` periods from each rate distribution.
///
/// `parameters` must contain gamma and exponential fits (see
/// [`fit_count_process`](crate::fit::fit_count_process)).
pub fn simulate_rates<R: Rng + ?Sized>(
    parameters: &FittedParameters,
    num_periods: usize,
    rng: &mut R,
) -> Result<SimulatedRates, SimulationError> {
    let mut rates = SimulatedRates::new();
    for kind in RATE_MODELS {
        let sampler = parameters
            .get(kind)
            .ok_or(SimulationError::MissingDistribution(kind))?
            .sampler()?;
        let draws = (0..num_periods).map(|_| sampler.sample(rng)).collect();
        rates.insert(kind, draws);
    }

    Ok(rates)
}

/// Draw a Poisson fire count for each simulated rate
pub fn draw_counts<R: Rng + ?Sized>(
    rates: &SimulatedRates,
    rng: &mut R,
) -> Result<SimulatedCounts, SimulationError> {
    let mut counts = SimulatedCounts::new();
    for (kind, rates) in rates {
        let draws = rates
            .iter()
            .map(|&rate| draw_poisson(rate, rng))
            .collect::<Result<_, _>>()?;
        counts.insert(*kind, draws);
    }

    Ok(counts)
}

/// Simulate the number of fires in each of `num_periods` periods for each rate distribution
pub fn simulate_counts<R: Rng + ?Sized>(
    parameters: &FittedParameters,
    num_periods: usize,
    rng: &mut R,
) -> Result<SimulatedCounts, SimulationError> {
    let rates = simulate_rates(parameters, num_periods, rng)?;
    draw_counts(&rates, rng)
}

/// Simulate the total area burned by `num_fires` fires for each fire size distribution.
///
/// Only exponential, Weibull and Pareto distributions are used; any other distribution in
/// `size_parameters` is skipped with a warning.
pub fn simulate_total_area<R: Rng + ?Sized>(
    num_fires: u64,
    size_parameters: &FittedParameters,
    rng: &mut R,
) -> Result<SimulatedFireAreas, SimulationError> {
    let mut areas = SimulatedFireAreas::new();
    for (kind, distribution) in size_parameters {
        if !SIZE_MODELS.contains(kind) {
            warn!("Ignoring {kind} distribution: it is not a fire size distribution");
            continue;
        }

        let sampler = distribution.sampler()?;
        let total = (0..num_fires).map(|_| sampler.sample(rng)).sum();
        areas.insert(*kind, total);
    }

    Ok(areas)
}

/// Draw from a Poisson distribution with mean `rate`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_poisson<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> Result<u64, SimulationError> {
    if !(rate.is_finite() && rate >= 0.0) {
        return Err(SimulationError::InvalidRate(rate));
    }
    if rate <= 0.0 {
        // A rate of exactly zero always gives zero fires
        return Ok(0);
    }

    let poisson = Poisson::new(rate).map_err(|_| SimulationError::InvalidRate(rate))?;
    let count: f64 = poisson.sample(rng);
    Ok(count as u64)
}
