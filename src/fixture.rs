//! Fixtures for tests
use crate::distribution::{FittedDistribution, FittedParameters, ShapeLocScale};
use crate::fire::{FireRecord, Period, Season, Zone};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.err().unwrap().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Fire sizes in hectares, heavily right-skewed like real fire data
#[fixture]
pub fn fire_sizes() -> Vec<f64> {
    vec![
        12.5, 150.0, 3.2, 870.0, 45.0, 2300.0, 0.8, 310.0, 96.0, 15400.0, 5.5, 640.0,
    ]
}

/// Number of fires in each of twelve years
#[fixture]
pub fn annual_counts() -> Vec<f64> {
    vec![
        12.0, 7.0, 21.0, 15.0, 9.0, 30.0, 18.0, 11.0, 25.0, 14.0, 6.0, 19.0,
    ]
}

#[fixture]
pub fn size_parameters() -> FittedParameters {
    [
        FittedDistribution::Exponential { scale: 400.0 },
        FittedDistribution::Weibull(ShapeLocScale::new(0.4, 390.0)),
        FittedDistribution::Pareto(ShapeLocScale::new(0.3, 0.8)),
    ]
    .into_iter()
    .collect()
}

#[fixture]
pub fn count_parameters() -> FittedParameters {
    [
        FittedDistribution::Gamma(ShapeLocScale::new(4.8, 3.2)),
        FittedDistribution::Exponential { scale: 15.6 },
    ]
    .into_iter()
    .collect()
}

fn fire_record(fire_id: &str, year: u32, size_ha: f64, zone: Zone) -> FireRecord {
    FireRecord {
        fire_id: fire_id.into(),
        year,
        report_date: format!("{year}/07/01"),
        size_ha,
        zone,
        season: Season::Summer,
        period: Period::from_year(year),
    }
}

#[fixture]
pub fn fire_records() -> Vec<FireRecord> {
    vec![
        fire_record("F1", 1990, 5.0, Zone::IntensiveMeasured),
        fire_record("F2", 1980, 250.0, Zone::Extensive),
        fire_record("F3", 1990, 40.0, Zone::IntensiveMeasured),
        fire_record("F4", 2010, 1200.0, Zone::Extensive),
    ]
}
