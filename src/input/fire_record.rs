//! Code for reading [`FireRecord`]s from a CSV file.
use super::*;
use crate::fire::{FireRecord, Period, Season, Zone};
use itertools::Itertools;
use log::debug;
use serde::Deserialize;

const FIRE_RECORDS_FILE_NAME: &str = "fire_records.csv";

/// Fire management zone designation for provincial parks, which are excluded from the analysis
const PARKS_ZONE: &str = "Parks Zone";

/// Cause codes retained in the analysis: natural (N) and unknown (U)
const RETAINED_CAUSES: [&str; 2] = ["N", "U"];

/// A row of the fire records CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct FireRecordRaw {
    fire_id: String,
    year: u32,
    month: u32,
    rep_date: Option<String>,
    size_ha: f64,
    cause: String,
    fmz_design: String,
}

impl FireRecordRaw {
    /// Whether the record passes the cleaning rules which don't depend on other records
    fn is_retained(&self, first_year: u32) -> bool {
        RETAINED_CAUSES.contains(&self.cause.as_str())
            && self.rep_date.as_deref().is_some_and(|date| !date.is_empty())
            && self.year >= first_year
    }
}

/// Read fire records from the model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `first_year` - Records from before this year are discarded
///
/// # Returns
///
/// The cleaned fire records, in file order, or an error.
pub fn read_fire_records(model_dir: &Path, first_year: u32) -> Result<Vec<FireRecord>> {
    let file_path = model_dir.join(FIRE_RECORDS_FILE_NAME);
    let records_csv = read_csv(&file_path)?;
    read_fire_records_from_iter(records_csv, first_year).with_context(|| input_err_msg(&file_path))
}

fn read_fire_records_from_iter<I>(iter: I, first_year: u32) -> Result<Vec<FireRecord>>
where
    I: Iterator<Item = FireRecordRaw>,
{
    let mut num_rows = 0;
    let mut records = Vec::new();

    // Parks are removed before deduplication
    let candidates = iter
        .inspect(|_| num_rows += 1)
        .filter(|raw| raw.fmz_design != PARKS_ZONE)
        .unique_by(|raw| raw.fire_id.clone())
        .filter(|raw| raw.is_retained(first_year));
    for raw in candidates {
        let Some(zone) = Zone::from_fmz_design(&raw.fmz_design) else {
            continue;
        };

        let season = Season::from_month(raw.month)
            .with_context(|| format!("Invalid month for fire {}: {}", raw.fire_id, raw.month))?;
        ensure!(
            raw.size_ha.is_finite() && raw.size_ha >= 0.0,
            "Invalid size_ha for fire {}: must be a finite number >= 0",
            raw.fire_id
        );

        records.push(FireRecord {
            year: raw.year,
            report_date: raw.rep_date.unwrap_or_default(),
            size_ha: raw.size_ha,
            zone,
            season,
            period: Period::from_year(raw.year),
            fire_id: raw.fire_id,
        });
    }

    ensure!(!records.is_empty(), "No fire records remain after filtering");
    debug!(
        "Kept {} of {num_rows} fire records after filtering",
        records.len()
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    fn raw(fire_id: &str, year: u32, cause: &str, fmz_design: &str) -> FireRecordRaw {
        FireRecordRaw {
            fire_id: fire_id.into(),
            year,
            month: 7,
            rep_date: Some(format!("{year}/07/15")),
            size_ha: 10.0,
            cause: cause.into(),
            fmz_design: fmz_design.into(),
        }
    }

    fn fire_ids(records: &[FireRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|record| record.fire_id.as_str())
            .collect()
    }

    #[test]
    fn test_read_fire_records_from_iter() {
        let mut no_date = raw("F5", 1990, "N", "Boreal Zone");
        no_date.rep_date = None;
        let mut empty_date = raw("F6", 1990, "N", "Boreal Zone");
        empty_date.rep_date = Some(String::new());
        let rows = [
            raw("F1", 1990, "N", "Boreal Zone"),
            raw("F2", 1990, "H", "Boreal Zone"),
            raw("F3", 1975, "N", "Boreal Zone"),
            raw("F4", 1990, "U", "Hudson Bay Zone"),
            no_date,
            empty_date,
            raw("F7", 1990, "N", "Parks Zone"),
            raw("F8", 2006, "N", "Great Lakes/St. Lawrence Zone"),
            raw("F9", 1990, "N", "Some Other Zone"),
        ];

        let records = read_fire_records_from_iter(rows.into_iter(), 1976).unwrap();
        assert_eq!(fire_ids(&records), ["F1", "F4", "F8"]);
        assert_eq!(records[0].zone, Zone::IntensiveMeasured);
        assert_eq!(records[1].zone, Zone::Extensive);
        assert_eq!(records[2].season, Season::Summer);
        assert_eq!(records[2].period, Period::After2005);
        assert_eq!(records[2].report_date, "2006/07/15");
    }

    #[test]
    fn test_read_fire_records_duplicates() {
        let mut second = raw("F1", 1991, "N", "Hudson Bay Zone");
        second.size_ha = 99.0;
        let rows = [raw("F1", 1990, "N", "Boreal Zone"), second];

        // The first occurrence is kept
        let records = read_fire_records_from_iter(rows.into_iter(), 1976).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 1990);

        // Unless it is in a park
        let rows = [
            raw("F1", 1990, "N", "Parks Zone"),
            raw("F1", 1991, "N", "Hudson Bay Zone"),
        ];
        let records = read_fire_records_from_iter(rows.into_iter(), 1976).unwrap();
        assert_eq!(records[0].year, 1991);

        // Deduplication happens before cause filtering
        let rows = [
            raw("F1", 1990, "H", "Boreal Zone"),
            raw("F1", 1991, "N", "Boreal Zone"),
        ];
        assert!(read_fire_records_from_iter(rows.into_iter(), 1976).is_err());
    }

    #[test]
    fn test_read_fire_records_first_year() {
        let rows = [
            raw("F1", 1990, "N", "Boreal Zone"),
            raw("F2", 2000, "N", "Boreal Zone"),
        ];
        let records = read_fire_records_from_iter(rows.into_iter(), 2000).unwrap();
        assert_eq!(fire_ids(&records), ["F2"]);
    }

    #[test]
    fn test_read_fire_records_bad_month() {
        let mut row = raw("F1", 1990, "N", "Boreal Zone");
        row.month = 13;
        assert_error!(
            read_fire_records_from_iter([row].into_iter(), 1976),
            "Invalid month for fire F1: 13"
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_read_fire_records_bad_size(#[case] size_ha: f64) {
        let mut row = raw("F1", 1990, "N", "Boreal Zone");
        row.size_ha = size_ha;
        assert_error!(
            read_fire_records_from_iter([row].into_iter(), 1976),
            "Invalid size_ha for fire F1: must be a finite number >= 0"
        );
    }

    #[test]
    fn test_read_fire_records_all_filtered() {
        let rows = [raw("F1", 1990, "H", "Boreal Zone")];
        assert_error!(
            read_fire_records_from_iter(rows.into_iter(), 1976),
            "No fire records remain after filtering"
        );
    }

    #[test]
    fn test_read_fire_records_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(FIRE_RECORDS_FILE_NAME),
            "fire_id,year,month,rep_date,size_ha,cause,fmz_design\n\
             A1,1990,7,1990/07/03,12.0,N,Boreal Zone\n\
             A2,1991,1,,3.0,N,Boreal Zone\n\
             A3,1992,12,1992/12/01,0.1,U,Hudson Bay Zone\n",
        )
        .unwrap();

        let records = read_fire_records(dir.path(), 1976).unwrap();
        assert_eq!(fire_ids(&records), ["A1", "A3"]);
        assert_eq!(records[1].season, Season::Winter);
    }

    #[test]
    fn test_read_fire_records_missing_column() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(FIRE_RECORDS_FILE_NAME);
        fs::write(
            &file_path,
            "fire_id,year,month,rep_date,size_ha,cause\n\
             A1,1990,7,1990/07/03,12.0,N\n",
        )
        .unwrap();

        assert_error!(read_fire_records(dir.path(), 1976), input_err_msg(&file_path));
    }
}
