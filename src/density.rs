//! Histograms of observed data and fitted density curves, for comparing fits visually.
use crate::distribution::{FittedDistribution, InvalidParameters};
use crate::fire::Variable;

/// How a variable's histogram and density curves are laid out
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotSettings {
    /// Number of histogram bins
    pub bins: usize,
    /// Values above this are clipped to it before binning
    pub upper_limit: Option<f64>,
    /// First point at which fitted densities are evaluated
    pub x_start: f64,
    /// Last point at which fitted densities are evaluated
    pub x_stop: f64,
    /// Number of points at which fitted densities are evaluated
    pub num_points: usize,
}

impl Variable {
    /// The histogram and density curve layout for this variable
    pub fn plot_settings(self) -> PlotSettings {
        match self {
            Self::FireSize => PlotSettings {
                bins: 50,
                upper_limit: Some(30000.0),
                x_start: 300.0,
                x_stop: 30000.0,
                num_points: 1000,
            },
            Self::FireCount => PlotSettings {
                bins: 15,
                upper_limit: None,
                x_start: 0.0,
                x_stop: 120.0,
                num_points: 1000,
            },
        }
    }
}

/// A single bin of a histogram
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramBin {
    /// Lower edge of the bin
    pub lower: f64,
    /// Upper edge of the bin
    pub upper: f64,
    /// Proportion of values in the bin divided by the bin width
    pub density: f64,
}

/// Compute a density-normalised histogram of `data` with equal-width bins.
///
/// The bins span the range of the (clipped) data. All bins are half-open except the last, which
/// also includes its upper edge. If all values are equal, the bins span half a unit either side.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn histogram(data: &[f64], bins: usize, upper_limit: Option<f64>) -> Vec<HistogramBin> {
    if data.is_empty() || bins == 0 {
        return Vec::new();
    }

    let clipped: Vec<f64> = data
        .iter()
        .map(|&x| upper_limit.map_or(x, |limit| x.min(limit)))
        .collect();
    let (mut min, mut max) = clipped
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
            (min.min(x), max.max(x))
        });
    if max <= min {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for x in clipped {
        let index = (((x - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    let total = data.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            density: count as f64 / (total * width),
        })
        .collect()
}

/// `num` evenly spaced values from `start` to `stop` inclusive
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// Evaluate the density of a fitted distribution at each of `xs`
pub fn density_curve(
    distribution: &FittedDistribution,
    xs: &[f64],
) -> Result<Vec<f64>, InvalidParameters> {
    let density = distribution.density()?;
    Ok(xs.iter().map(|&x| density.pdf(x)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ShapeLocScale;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_histogram() {
        let bins = histogram(&[0.0, 1.0, 1.5, 4.0], 4, None);
        assert_eq!(bins.len(), 4);
        assert_approx_eq!(f64, bins[0].lower, 0.0);
        assert_approx_eq!(f64, bins[3].upper, 4.0);

        // Max value is counted in the last bin
        let densities: Vec<f64> = bins.iter().map(|bin| bin.density).collect();
        assert_eq!(densities, [0.25, 0.5, 0.0, 0.25]);
    }

    #[test]
    fn test_histogram_clipped() {
        let bins = histogram(&[1.0, 2.0, 100.0], 2, Some(3.0));
        assert_approx_eq!(f64, bins[1].upper, 3.0);
        // 100 is clipped into the last bin
        assert_approx_eq!(f64, bins[1].density, 2.0 / 3.0);
    }

    #[test]
    fn test_histogram_integrates_to_one() {
        let data = [3.0, 7.0, 7.5, 12.0, 30.0, 31.0, 2.0];
        let total: f64 = histogram(&data, 5, None)
            .iter()
            .map(|bin| bin.density * (bin.upper - bin.lower))
            .sum();
        assert_approx_eq!(f64, total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_histogram_constant() {
        let bins = histogram(&[2.0, 2.0], 1, None);
        assert_eq!(
            bins,
            [HistogramBin {
                lower: 1.5,
                upper: 2.5,
                density: 1.0
            }]
        );
    }

    #[rstest]
    #[case(&[], 10)]
    #[case(&[1.0], 0)]
    fn test_histogram_empty(#[case] data: &[f64], #[case] bins: usize) {
        assert!(histogram(data, bins, None).is_empty());
    }

    #[rstest]
    #[case(0.0, 1.0, 0, vec![])]
    #[case(2.0, 5.0, 1, vec![2.0])]
    #[case(0.0, 1.0, 5, vec![0.0, 0.25, 0.5, 0.75, 1.0])]
    fn test_linspace(
        #[case] start: f64,
        #[case] stop: f64,
        #[case] num: usize,
        #[case] expected: Vec<f64>,
    ) {
        assert_eq!(linspace(start, stop, num), expected);
    }

    #[test]
    fn test_density_curve() {
        let distribution = FittedDistribution::Gamma(ShapeLocScale::new(1.0, 2.0));
        let densities = density_curve(&distribution, &[1.0, 2.0]).unwrap();

        // A gamma distribution with shape 1 is exponential
        assert_approx_eq!(f64, densities[0], 0.5 * (-0.5f64).exp(), epsilon = 1e-12);
        assert_approx_eq!(f64, densities[1], 0.5 * (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_plot_settings() {
        let settings = Variable::FireSize.plot_settings();
        assert_eq!(linspace(settings.x_start, settings.x_stop, settings.num_points).len(), 1000);
        assert_eq!(Variable::FireCount.plot_settings().upper_limit, None);
    }
}
