//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::distribution::DistributionKind;
use crate::input::{input_err_msg, read_toml};
use crate::simulation::compound::SIZE_MODELS;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_num_periods, usize, 1000);
define_param_default!(default_first_year, u32, 1976);
define_param_default!(default_size_models, Vec<DistributionKind>, SIZE_MODELS.to_vec());

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelParameters {
    /// The number of periods (years) of fire activity to simulate
    #[serde(default = "default_num_periods")]
    pub num_periods: usize,
    /// Fire records from before this year are discarded
    #[serde(default = "default_first_year")]
    pub first_year: u32,
    /// If set, only fires larger than this size (in hectares) are analysed
    pub large_fire_threshold: Option<f64>,
    /// The fire size distributions used to simulate burned area
    #[serde(default = "default_size_models")]
    pub size_models: Vec<DistributionKind>,
    /// Seed for the random number generator.
    ///
    /// If this is not given, a seed is chosen at random and recorded in the output metadata.
    pub seed: Option<u64>,
}

/// Check that the `num_periods` parameter is valid
fn check_num_periods(value: usize) -> Result<()> {
    ensure!(value > 0, "num_periods cannot be zero");

    Ok(())
}

/// Check that the `large_fire_threshold` parameter is valid
fn check_large_fire_threshold(value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "large_fire_threshold must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the `size_models` parameter is valid
fn check_size_models(models: &[DistributionKind]) -> Result<()> {
    ensure!(!models.is_empty(), "`size_models` is empty");
    ensure!(models.iter().all_unique(), "`size_models` contains duplicates");
    for kind in models {
        ensure!(
            SIZE_MODELS.contains(kind),
            "{kind} is not a fire size distribution. Valid options: {}",
            SIZE_MODELS.iter().join(", ")
        );
    }

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_num_periods(self.num_periods)?;
        if let Some(threshold) = self.large_fire_threshold {
            check_large_fire_threshold(threshold)?;
        }
        check_size_models(&self.size_models)?;

        Ok(())
    }
}
