//! Parametric distributions fitted to fire sizes and fire counts.
use derive_more::Display;
use indexmap::IndexMap;
use rand::Rng;
use rand_distr::Distribution;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use statrs::distribution::{self as pdf, Continuous};
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;

/// The families of distribution which can be fitted to fire data
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DistributionKind {
    /// Exponential distribution, parameterised by its mean
    Exponential,
    /// Weibull distribution
    Weibull,
    /// Pareto (type I) distribution
    Pareto,
    /// Gamma distribution
    Gamma,
}

/// Indicates that a distribution name was not recognised
#[derive(Debug, Error, PartialEq)]
#[error("Unrecognised distribution: {0}")]
pub struct UnrecognisedDistribution(pub String);

impl FromStr for DistributionKind {
    type Err = UnrecognisedDistribution;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| UnrecognisedDistribution(s.to_string()))
    }
}

impl Serialize for DistributionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DistributionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// Indicates that a distribution cannot be constructed from its parameters
#[derive(Debug, Error, PartialEq)]
#[error("Invalid parameters for {kind} distribution: {message}")]
pub struct InvalidParameters {
    /// The distribution family
    pub kind: DistributionKind,
    /// What was wrong with the parameters
    pub message: String,
}

impl InvalidParameters {
    fn new<T: ToString>(kind: DistributionKind, message: T) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// The parameters of a shape/location/scale distribution.
///
/// The order of the fields is fixed: consumers which treat the parameters as a tuple (see
/// [`ShapeLocScale::as_tuple`]) rely on it being `(shape, location, scale)`.
#[derive(Clone, Copy, Debug, PartialEq, Display)]
#[display("shape={shape:.2}, loc={location:.2}, scale={scale:.2}")]
pub struct ShapeLocScale {
    /// Shape parameter (> 0)
    pub shape: f64,
    /// Location parameter (0 for all fitted distributions)
    pub location: f64,
    /// Scale parameter (> 0)
    pub scale: f64,
}

impl ShapeLocScale {
    /// Create parameters with the location pinned to zero
    pub fn new(shape: f64, scale: f64) -> Self {
        Self {
            shape,
            location: 0.0,
            scale,
        }
    }

    /// The parameters as a `(shape, location, scale)` tuple
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.shape, self.location, self.scale)
    }
}

/// A distribution together with its fitted parameters
#[derive(Clone, Copy, Debug, PartialEq, Display)]
pub enum FittedDistribution {
    /// Exponential distribution with the given mean
    #[display("scale={scale:.2}")]
    Exponential {
        /// The mean of the distribution (> 0)
        scale: f64,
    },
    /// Weibull distribution
    Weibull(ShapeLocScale),
    /// Pareto distribution, where `shape` is the tail index
    Pareto(ShapeLocScale),
    /// Gamma distribution
    Gamma(ShapeLocScale),
}

impl FittedDistribution {
    /// The family this distribution belongs to
    pub fn kind(&self) -> DistributionKind {
        match self {
            Self::Exponential { .. } => DistributionKind::Exponential,
            Self::Weibull(_) => DistributionKind::Weibull,
            Self::Pareto(_) => DistributionKind::Pareto,
            Self::Gamma(_) => DistributionKind::Gamma,
        }
    }

    /// The shape, location and scale parameters, if the distribution has them
    pub fn shape_loc_scale(&self) -> Option<&ShapeLocScale> {
        match self {
            Self::Exponential { .. } => None,
            Self::Weibull(params) | Self::Pareto(params) | Self::Gamma(params) => Some(params),
        }
    }

    /// The scale parameter
    pub fn scale(&self) -> f64 {
        match self {
            Self::Exponential { scale } => *scale,
            Self::Weibull(params) | Self::Pareto(params) | Self::Gamma(params) => params.scale,
        }
    }

    /// The location parameter
    pub fn location(&self) -> f64 {
        self.shape_loc_scale().map_or(0.0, |params| params.location)
    }

    /// The number of parameters estimated from data (the location is fixed, not estimated)
    pub fn num_free_parameters(&self) -> u32 {
        match self {
            Self::Exponential { .. } => 1,
            _ => 2,
        }
    }

    /// Check that the parameters describe a valid distribution
    fn check_parameters(&self) -> Result<(), InvalidParameters> {
        let kind = self.kind();
        let scale = self.scale();
        if !(scale.is_finite() && scale > 0.0) {
            return Err(InvalidParameters::new(
                kind,
                format!("scale must be finite and positive, got {scale}"),
            ));
        }

        if let Some(params) = self.shape_loc_scale() {
            if !(params.shape.is_finite() && params.shape > 0.0) {
                return Err(InvalidParameters::new(
                    kind,
                    format!("shape must be finite and positive, got {}", params.shape),
                ));
            }
            if !params.location.is_finite() {
                return Err(InvalidParameters::new(kind, "location must be finite"));
            }
        }

        Ok(())
    }

    /// Create a sampler for drawing random values from this distribution
    pub fn sampler(&self) -> Result<Sampler, InvalidParameters> {
        self.check_parameters()?;
        let kind = self.kind();
        let inner = match self {
            Self::Exponential { scale } => SamplerKind::Exponential(
                rand_distr::Exp::new(1.0 / scale)
                    .map_err(|err| InvalidParameters::new(kind, err))?,
            ),
            // rand_distr takes the scale before the shape for Weibull and Pareto
            Self::Weibull(params) => SamplerKind::Weibull(
                rand_distr::Weibull::new(params.scale, params.shape)
                    .map_err(|err| InvalidParameters::new(kind, err))?,
            ),
            Self::Pareto(params) => SamplerKind::Pareto(
                rand_distr::Pareto::new(params.scale, params.shape)
                    .map_err(|err| InvalidParameters::new(kind, err))?,
            ),
            Self::Gamma(params) => SamplerKind::Gamma(
                rand_distr::Gamma::new(params.shape, params.scale)
                    .map_err(|err| InvalidParameters::new(kind, err))?,
            ),
        };

        Ok(Sampler {
            location: self.location(),
            inner,
        })
    }

    /// Create the probability density function for this distribution
    pub fn density(&self) -> Result<Density, InvalidParameters> {
        self.check_parameters()?;
        let kind = self.kind();
        let inner: Box<dyn Continuous<f64, f64>> = match self {
            Self::Exponential { scale } => Box::new(
                pdf::Exp::new(1.0 / scale).map_err(|err| InvalidParameters::new(kind, err))?,
            ),
            Self::Weibull(params) => Box::new(
                pdf::Weibull::new(params.shape, params.scale)
                    .map_err(|err| InvalidParameters::new(kind, err))?,
            ),
            Self::Pareto(params) => Box::new(
                pdf::Pareto::new(params.scale, params.shape)
                    .map_err(|err| InvalidParameters::new(kind, err))?,
            ),
            // statrs uses the rate parameterisation
            Self::Gamma(params) => Box::new(
                pdf::Gamma::new(params.shape, 1.0 / params.scale)
                    .map_err(|err| InvalidParameters::new(kind, err))?,
            ),
        };

        Ok(Density {
            location: self.location(),
            inner,
        })
    }

    /// The log-likelihood of `sample` under this distribution
    pub fn log_likelihood(&self, sample: &[f64]) -> Result<f64, InvalidParameters> {
        let density = self.density()?;
        Ok(sample.iter().map(|&x| density.ln_pdf(x)).sum())
    }

    /// Akaike information criterion of this distribution for `sample`
    pub fn aic(&self, sample: &[f64]) -> Result<f64, InvalidParameters> {
        let log_likelihood = self.log_likelihood(sample)?;
        Ok(2.0 * f64::from(self.num_free_parameters()) - 2.0 * log_likelihood)
    }
}

/// The underlying `rand_distr` distribution of a [`Sampler`]
#[derive(Clone, Copy, Debug)]
enum SamplerKind {
    Exponential(rand_distr::Exp<f64>),
    Weibull(rand_distr::Weibull<f64>),
    Pareto(rand_distr::Pareto<f64>),
    Gamma(rand_distr::Gamma<f64>),
}

/// Draws random values from a [`FittedDistribution`]
#[derive(Clone, Copy, Debug)]
pub struct Sampler {
    location: f64,
    inner: SamplerKind,
}

impl Distribution<f64> for Sampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let value = match &self.inner {
            SamplerKind::Exponential(dist) => dist.sample(rng),
            SamplerKind::Weibull(dist) => dist.sample(rng),
            SamplerKind::Pareto(dist) => dist.sample(rng),
            SamplerKind::Gamma(dist) => dist.sample(rng),
        };

        self.location + value
    }
}

/// The probability density function of a [`FittedDistribution`]
pub struct Density {
    location: f64,
    inner: Box<dyn Continuous<f64, f64>>,
}

impl Density {
    /// Probability density at `x`
    pub fn pdf(&self, x: f64) -> f64 {
        self.inner.pdf(x - self.location)
    }

    /// Log of the probability density at `x`
    pub fn ln_pdf(&self, x: f64) -> f64 {
        self.inner.ln_pdf(x - self.location)
    }
}

/// Fitted distributions, keyed by distribution family.
///
/// Entries keep the order in which they were inserted. The key of each entry is always the
/// family of its distribution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FittedParameters(IndexMap<DistributionKind, FittedDistribution>);

impl FittedParameters {
    /// Create an empty set of parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fitted distribution, replacing any previous one of the same family
    pub fn insert(&mut self, distribution: FittedDistribution) -> Option<FittedDistribution> {
        self.0.insert(distribution.kind(), distribution)
    }

    /// Get the fitted distribution for the given family
    pub fn get(&self, kind: DistributionKind) -> Option<&FittedDistribution> {
        self.0.get(&kind)
    }

    /// Iterate over the fitted distributions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&DistributionKind, &FittedDistribution)> {
        self.0.iter()
    }

    /// The number of fitted distributions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no fitted distributions
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A copy containing only the given families, in the order given
    pub fn select(&self, kinds: &[DistributionKind]) -> Self {
        kinds
            .iter()
            .filter_map(|kind| self.get(*kind).copied())
            .collect()
    }
}

impl FromIterator<FittedDistribution> for FittedParameters {
    fn from_iter<I: IntoIterator<Item = FittedDistribution>>(iter: I) -> Self {
        let mut parameters = Self::new();
        for distribution in iter {
            parameters.insert(distribution);
        }

        parameters
    }
}

impl<'a> IntoIterator for &'a FittedParameters {
    type Item = (&'a DistributionKind, &'a FittedDistribution);
    type IntoIter = indexmap::map::Iter<'a, DistributionKind, FittedDistribution>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
