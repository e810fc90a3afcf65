//! Fitting fire size and fire count distributions and simulating compound Poisson fire regimes.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod density;
pub mod distribution;
pub mod fire;
pub mod fit;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod settings;
pub mod simulation;

#[cfg(test)]
mod fixture;

/// Get config dir for program.
///
/// This is a subdirectory of the user's config folder (e.g. `~/.config/fire-regime` on Linux).
pub fn get_fire_regime_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir could be determined, so use the current folder
        return PathBuf::default();
    };

    config_dir.push("fire-regime");
    config_dir
}
