//! Functionality for running a fire regime model.
use crate::density::{density_curve, histogram, linspace};
use crate::distribution::FittedParameters;
use crate::fire::{SampleGroup, Variable};
use crate::fit::{fit_count_process, fit_size_distribution};
use crate::model::Model;
use crate::output::DataWriter;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::Rng;
use std::path::Path;
use strum::IntoEnumIterator;

pub mod compound;
pub use compound::{
    SimulatedCounts, SimulatedFireAreas, SimulatedRates, SimulationError, draw_counts,
    simulate_counts, simulate_rates, simulate_total_area,
};

/// Run the fire regime model.
///
/// For each sample group, the fire size and fire count distributions are fitted, fire counts are
/// simulated for each period and the total burned area of each simulated period is simulated.
///
/// # Arguments:
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
/// * `rng` - Source of randomness for all simulations
/// * `debug_model` - Whether to write additional information (e.g. cleaned records) to file
pub fn run<R: Rng + ?Sized>(
    model: &Model,
    output_path: &Path,
    rng: &mut R,
    debug_model: bool,
) -> Result<()> {
    let mut writer = DataWriter::create(output_path, debug_model)?;
    writer.write_fire_records(&model.records)?;

    for sample in SampleGroup::iter() {
        let sizes = sample.fire_sizes(&model.records);
        if sizes.is_empty() {
            warn!("No fire records in {sample} sample. Skipping.");
            continue;
        }
        info!("Fitting distributions for {sample} sample ({} fires)", sizes.len());

        let size_parameters = fit_size_distribution(&sizes).with_context(|| {
            format!("Failed to fit fire size distributions for {sample} sample")
        })?;
        let counts = sample.annual_fire_counts(&model.records);
        let count_parameters = fit_count_process(&counts).with_context(|| {
            format!("Failed to fit fire count distributions for {sample} sample")
        })?;

        for (variable, parameters, data) in [
            (Variable::FireSize, &size_parameters, &sizes),
            (Variable::FireCount, &count_parameters, &counts),
        ] {
            log_parameters(sample, variable, parameters);
            write_fit_summary(&mut writer, sample, variable, parameters, data)?;
        }

        let num_periods = model.parameters.num_periods;
        let rates = simulate_rates(&count_parameters, num_periods, rng)?;
        let simulated_counts = draw_counts(&rates, rng)?;
        writer.write_counts(sample, &rates, &simulated_counts)?;

        let size_models = size_parameters.select(&model.parameters.size_models);
        for (rate_model, counts) in &simulated_counts {
            for (period, &num_fires) in counts.iter().enumerate() {
                let areas = simulate_total_area(num_fires, &size_models, rng)?;
                writer.write_areas(sample, *rate_model, period, num_fires, &areas)?;
            }

            debug!(
                "{sample} sample, {rate_model} rates: mean of {:.2} fires per period",
                counts.iter().sum::<u64>() as f64 / num_periods as f64
            );
        }
    }

    writer.flush()?;
    Ok(())
}

/// Log the fitted parameters in the same form they are reported in
fn log_parameters(sample: SampleGroup, variable: Variable, parameters: &FittedParameters) {
    for (kind, distribution) in parameters {
        info!("{sample} {variable} {kind} fit: {distribution}");
    }
}

/// Write the parameters, histogram and fitted densities for one sample
fn write_fit_summary(
    writer: &mut DataWriter,
    sample: SampleGroup,
    variable: Variable,
    parameters: &FittedParameters,
    data: &[f64],
) -> Result<()> {
    writer.write_parameters(sample, variable, parameters, data)?;

    let settings = variable.plot_settings();
    let bins = histogram(data, settings.bins, settings.upper_limit);
    writer.write_histogram(sample, variable, &bins)?;

    let xs = linspace(settings.x_start, settings.x_stop, settings.num_points);
    for (kind, distribution) in parameters {
        let densities = density_curve(distribution, &xs)?;
        writer.write_density_curve(sample, variable, *kind, &xs, &densities)?;
    }

    Ok(())
}
