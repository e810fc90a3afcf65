//! Fire records and the samples extracted from them.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Fire management zone category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Zone {
    /// Zones where fires are mostly monitored rather than suppressed
    #[strum(to_string = "Extensive")]
    #[serde(rename = "Extensive")]
    Extensive,
    /// Zones where fires are actively suppressed
    #[strum(to_string = "Intensive Measured")]
    #[serde(rename = "Intensive Measured")]
    IntensiveMeasured,
}

impl Zone {
    /// Map a fire management zone designation onto a [`Zone`].
    ///
    /// Designations outside the lookup table (including parks) give `None`.
    pub fn from_fmz_design(design: &str) -> Option<Self> {
        match design {
            "Hudson Bay Zone" => Some(Self::Extensive),
            "Great Lakes/St. Lawrence Zone" | "Boreal Zone" | "Northern Boreal Zone" => {
                Some(Self::IntensiveMeasured)
            }
            _ => None,
        }
    }
}

/// Season in which a fire was reported
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Season {
    /// December to February
    Winter,
    /// March to May
    Spring,
    /// June to August
    Summer,
    /// September to November
    Fall,
}

impl Season {
    /// Get the season for a month number (1-12)
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Self::Winter),
            3..=5 => Some(Self::Spring),
            6..=8 => Some(Self::Summer),
            9..=11 => Some(Self::Fall),
            _ => None,
        }
    }
}

/// Whether a fire occurred before or after the change in fire management practice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Period {
    /// 2005 and earlier
    #[strum(to_string = "Before 2005")]
    #[serde(rename = "Before 2005")]
    Before2005,
    /// 2006 onwards
    #[strum(to_string = "After 2005")]
    #[serde(rename = "After 2005")]
    After2005,
}

impl Period {
    /// Get the period for a year
    pub fn from_year(year: u32) -> Self {
        if year > 2005 {
            Self::After2005
        } else {
            Self::Before2005
        }
    }
}

/// A cleaned fire record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FireRecord {
    /// Unique identifier for the fire
    pub fire_id: String,
    /// Year in which the fire occurred
    pub year: u32,
    /// Date on which the fire was reported
    pub report_date: String,
    /// Final size of the fire in hectares
    pub size_ha: f64,
    /// The fire management zone the fire started in
    pub zone: Zone,
    /// Season in which the fire occurred
    pub season: Season,
    /// Management period in which the fire occurred
    pub period: Period,
}

impl FireRecord {
    /// Whether the fire is larger than `threshold` hectares
    pub fn is_large(&self, threshold: f64) -> bool {
        self.size_ha > threshold
    }
}

/// The quantity a sample measures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Size of individual fires in hectares
    FireSize,
    /// Number of fires per year
    FireCount,
}

/// A subset of fire records which is analysed separately
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum SampleGroup {
    /// All fires
    All,
    /// Fires in the extensive zone
    #[strum(to_string = "Extensive")]
    #[serde(rename = "Extensive")]
    Extensive,
    /// Fires in the intensive measured zone
    #[strum(to_string = "Intensive Measured")]
    #[serde(rename = "Intensive Measured")]
    IntensiveMeasured,
}

impl SampleGroup {
    /// The zone this group is restricted to, if any
    pub fn zone(self) -> Option<Zone> {
        match self {
            Self::All => None,
            Self::Extensive => Some(Zone::Extensive),
            Self::IntensiveMeasured => Some(Zone::IntensiveMeasured),
        }
    }

    /// Whether the record belongs to this group
    pub fn contains(self, record: &FireRecord) -> bool {
        self.zone().is_none_or(|zone| zone == record.zone)
    }

    /// Iterate over the records belonging to this group
    pub fn records(self, records: &[FireRecord]) -> impl Iterator<Item = &FireRecord> {
        records.iter().filter(move |record| self.contains(record))
    }

    /// The sizes of the fires in this group, in hectares
    pub fn fire_sizes(self, records: &[FireRecord]) -> Vec<f64> {
        self.records(records).map(|record| record.size_ha).collect()
    }

    /// The number of fires in each year, ordered by year.
    ///
    /// Only years with at least one fire are included.
    pub fn annual_fire_counts(self, records: &[FireRecord]) -> Vec<f64> {
        self.records(records)
            .counts_by(|record| record.year)
            .into_iter()
            .sorted_by_key(|(year, _)| *year)
            .map(|(_, count)| count as f64)
            .collect()
    }

    /// Get a sample of the given variable from the records in this group
    pub fn sample(self, variable: Variable, records: &[FireRecord]) -> Vec<f64> {
        match variable {
            Variable::FireSize => self.fire_sizes(records),
            Variable::FireCount => self.annual_fire_counts(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::fire_records;
    use rstest::rstest;

    #[rstest]
    #[case("Hudson Bay Zone", Some(Zone::Extensive))]
    #[case("Great Lakes/St. Lawrence Zone", Some(Zone::IntensiveMeasured))]
    #[case("Boreal Zone", Some(Zone::IntensiveMeasured))]
    #[case("Northern Boreal Zone", Some(Zone::IntensiveMeasured))]
    #[case("Parks Zone", None)]
    #[case("boreal zone", None)]
    fn test_zone_from_fmz_design(#[case] design: &str, #[case] expected: Option<Zone>) {
        assert_eq!(Zone::from_fmz_design(design), expected);
    }

    #[rstest]
    #[case(1, Some(Season::Winter))]
    #[case(2, Some(Season::Winter))]
    #[case(3, Some(Season::Spring))]
    #[case(5, Some(Season::Spring))]
    #[case(6, Some(Season::Summer))]
    #[case(8, Some(Season::Summer))]
    #[case(9, Some(Season::Fall))]
    #[case(11, Some(Season::Fall))]
    #[case(12, Some(Season::Winter))]
    #[case(0, None)]
    #[case(13, None)]
    fn test_season_from_month(#[case] month: u32, #[case] expected: Option<Season>) {
        assert_eq!(Season::from_month(month), expected);
    }

    #[rstest]
    #[case(1976, Period::Before2005)]
    #[case(2005, Period::Before2005)]
    #[case(2006, Period::After2005)]
    fn test_period_from_year(#[case] year: u32, #[case] expected: Period) {
        assert_eq!(Period::from_year(year), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(Zone::IntensiveMeasured.to_string(), "Intensive Measured");
        assert_eq!(Period::After2005.to_string(), "After 2005");
        assert_eq!(Variable::FireCount.to_string(), "fire_count");
        assert_eq!(SampleGroup::All.to_string(), "All");
    }

    #[rstest]
    fn test_fire_sizes(fire_records: Vec<FireRecord>) {
        assert_eq!(
            SampleGroup::All.fire_sizes(&fire_records),
            [5.0, 250.0, 40.0, 1200.0]
        );
        assert_eq!(
            SampleGroup::Extensive.fire_sizes(&fire_records),
            [250.0, 1200.0]
        );
        assert_eq!(
            SampleGroup::IntensiveMeasured.fire_sizes(&fire_records),
            [5.0, 40.0]
        );
    }

    #[rstest]
    fn test_annual_fire_counts(fire_records: Vec<FireRecord>) {
        // Records are in 1990, 1980, 1990 and 2010
        assert_eq!(
            SampleGroup::All.annual_fire_counts(&fire_records),
            [1.0, 2.0, 1.0]
        );
        assert_eq!(
            SampleGroup::Extensive.annual_fire_counts(&fire_records),
            [1.0, 1.0]
        );
    }

    #[rstest]
    fn test_is_large(fire_records: Vec<FireRecord>) {
        let large = fire_records
            .iter()
            .filter(|record| record.is_large(100.0))
            .count();
        assert_eq!(large, 2);
    }
}
