//! Integration tests for the `run` command.
use fire_regime::cli::{RunOpts, handle_run_command};
use fire_regime::settings::Settings;
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Get the path to the demo model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("demos/ontario")
}

/// Count the data rows in an output CSV file
fn count_rows(output_dir: &Path, file_name: &str) -> usize {
    csv::Reader::from_path(output_dir.join(file_name))
        .unwrap()
        .records()
        .map(Result::unwrap)
        .count()
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("FIRE_REGIME_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        debug_model: true,
        seed: Some(42),
        ..RunOpts::default()
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();

    let file_names = fs::read_dir(&output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .sorted()
        .collect_vec();
    assert_eq!(
        file_names,
        [
            "debug_fire_records.csv",
            "densities.csv",
            "fire_regime_error.log",
            "fire_regime_info.log",
            "fitted_parameters.csv",
            "histograms.csv",
            "metadata.toml",
            "simulated_areas.csv",
            "simulated_counts.csv",
        ]
    );

    // Three samples, each with three size fits and two count fits
    assert_eq!(count_rows(&output_dir, "fitted_parameters.csv"), 15);

    // Three samples, each with two rate models simulated for 200 periods
    assert_eq!(count_rows(&output_dir, "simulated_counts.csv"), 1200);

    // ...and three size models for each simulated period
    assert_eq!(count_rows(&output_dir, "simulated_areas.csv"), 3600);

    let metadata = fs::read_to_string(output_dir.join("metadata.toml")).unwrap();
    assert!(metadata.contains("seed = \"42\""));

    // Running again fails because the output folder isn't empty...
    assert!(handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).is_err());

    // ...unless we allow it to be overwritten
    let opts = RunOpts {
        overwrite: true,
        debug_model: false,
        ..opts
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();
    assert!(!output_dir.join("debug_fire_records.csv").exists());
}
