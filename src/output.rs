//! The module responsible for writing output data to disk.
use crate::density::HistogramBin;
use crate::distribution::{DistributionKind, FittedParameters};
use crate::fire::{FireRecord, SampleGroup, Variable};
use crate::simulation::{SimulatedCounts, SimulatedFireAreas, SimulatedRates};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "fire_regime_results";

/// The output file name for fitted distribution parameters
const PARAMETERS_FILE_NAME: &str = "fitted_parameters.csv";

/// The output file name for simulated fire rates and counts
const COUNTS_FILE_NAME: &str = "simulated_counts.csv";

/// The output file name for simulated burned areas
const AREAS_FILE_NAME: &str = "simulated_areas.csv";

/// The output file name for histograms of observed data
const HISTOGRAMS_FILE_NAME: &str = "histograms.csv";

/// The output file name for fitted density curves
const DENSITIES_FILE_NAME: &str = "densities.csv";

/// The output file name for the cleaned fire records
const FIRE_RECORDS_FILE_NAME: &str = "debug_fire_records.csv";

/// Get the default output directory for the model specified at `model_dir`
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory for the model, optionally overwriting existing data
///
/// # Arguments
///
/// * `output_dir` - The output directory to create/overwrite
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// Whether an existing non-empty folder was deleted
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut entries) = fs::read_dir(output_dir) {
        if entries.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the fitted parameters CSV file.
///
/// `shape` and `location` are empty for exponential distributions.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ParameterRow {
    sample: SampleGroup,
    variable: Variable,
    distribution: DistributionKind,
    shape: Option<f64>,
    location: Option<f64>,
    scale: f64,
    log_likelihood: f64,
    aic: f64,
}

/// Represents a row in the simulated counts CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CountRow {
    sample: SampleGroup,
    rate_model: DistributionKind,
    period: usize,
    rate: f64,
    num_fires: u64,
}

/// Represents a row in the simulated areas CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct AreaRow {
    sample: SampleGroup,
    rate_model: DistributionKind,
    period: usize,
    num_fires: u64,
    size_model: DistributionKind,
    total_area_ha: f64,
}

/// Represents a row in the histograms CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct HistogramRow {
    sample: SampleGroup,
    variable: Variable,
    lower: f64,
    upper: f64,
    density: f64,
}

/// Represents a row in the densities CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DensityRow {
    sample: SampleGroup,
    variable: Variable,
    distribution: DistributionKind,
    x: f64,
    density: f64,
}

/// For writing extra debug information about the model
struct DebugDataWriter {
    fire_records_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        let file_path = output_path.join(FIRE_RECORDS_FILE_NAME);

        Ok(Self {
            fire_records_writer: csv::Writer::from_path(file_path)?,
        })
    }

    /// Write the cleaned fire records to file
    fn write_fire_records(&mut self, records: &[FireRecord]) -> Result<()> {
        for record in records {
            self.fire_records_writer.serialize(record)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.fire_records_writer.flush()?;

        Ok(())
    }
}

/// An object for writing fitted parameters and simulation results to file
pub struct DataWriter {
    parameters_writer: csv::Writer<File>,
    counts_writer: csv::Writer<File>,
    areas_writer: csv::Writer<File>,
    histograms_writer: csv::Writer<File>,
    densities_writer: csv::Writer<File>,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include extra CSV files for debugging model
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let debug_writer = if save_debug_info {
            // Create debug CSV files
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            parameters_writer: new_writer(PARAMETERS_FILE_NAME)?,
            counts_writer: new_writer(COUNTS_FILE_NAME)?,
            areas_writer: new_writer(AREAS_FILE_NAME)?,
            histograms_writer: new_writer(HISTOGRAMS_FILE_NAME)?,
            densities_writer: new_writer(DENSITIES_FILE_NAME)?,
            debug_writer,
        })
    }

    /// Write the cleaned fire records, if debug info is enabled
    pub fn write_fire_records(&mut self, records: &[FireRecord]) -> Result<()> {
        if let Some(wtr) = &mut self.debug_writer {
            wtr.write_fire_records(records)?;
        }

        Ok(())
    }

    /// Write fitted parameters, along with their goodness of fit to `data`
    pub fn write_parameters(
        &mut self,
        sample: SampleGroup,
        variable: Variable,
        parameters: &FittedParameters,
        data: &[f64],
    ) -> Result<()> {
        for (kind, distribution) in parameters {
            let (shape, location) = match distribution.shape_loc_scale() {
                Some(params) => (Some(params.shape), Some(params.location)),
                None => (None, None),
            };
            let row = ParameterRow {
                sample,
                variable,
                distribution: *kind,
                shape,
                location,
                scale: distribution.scale(),
                log_likelihood: distribution.log_likelihood(data)?,
                aic: distribution.aic(data)?,
            };
            self.parameters_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write a histogram of observed data
    pub fn write_histogram(
        &mut self,
        sample: SampleGroup,
        variable: Variable,
        bins: &[HistogramBin],
    ) -> Result<()> {
        for bin in bins {
            let row = HistogramRow {
                sample,
                variable,
                lower: bin.lower,
                upper: bin.upper,
                density: bin.density,
            };
            self.histograms_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write the density of a fitted distribution evaluated at each of `xs`
    pub fn write_density_curve(
        &mut self,
        sample: SampleGroup,
        variable: Variable,
        distribution: DistributionKind,
        xs: &[f64],
        densities: &[f64],
    ) -> Result<()> {
        for (&x, &density) in xs.iter().zip(densities) {
            let row = DensityRow {
                sample,
                variable,
                distribution,
                x,
                density,
            };
            self.densities_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write simulated rates and the fire counts drawn from them
    pub fn write_counts(
        &mut self,
        sample: SampleGroup,
        rates: &SimulatedRates,
        counts: &SimulatedCounts,
    ) -> Result<()> {
        for (rate_model, rates) in rates {
            let counts = counts
                .get(rate_model)
                .with_context(|| format!("No simulated counts for {rate_model} rates"))?;
            for (period, (&rate, &num_fires)) in rates.iter().zip(counts).enumerate() {
                let row = CountRow {
                    sample,
                    rate_model: *rate_model,
                    period,
                    rate,
                    num_fires,
                };
                self.counts_writer.serialize(row)?;
            }
        }

        Ok(())
    }

    /// Write the simulated burned area for one period
    pub fn write_areas(
        &mut self,
        sample: SampleGroup,
        rate_model: DistributionKind,
        period: usize,
        num_fires: u64,
        areas: &SimulatedFireAreas,
    ) -> Result<()> {
        for (size_model, &total_area_ha) in areas {
            let row = AreaRow {
                sample,
                rate_model,
                period,
                num_fires,
                size_model: *size_model,
                total_area_ha,
            };
            self.areas_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.parameters_writer.flush()?;
        self.counts_writer.flush()?;
        self.areas_writer.flush()?;
        self.histograms_writer.flush()?;
        self.densities_writer.flush()?;
        if let Some(wtr) = &mut self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}
