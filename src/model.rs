//! The model represents the static input data provided by the user.
use crate::fire::FireRecord;
use std::path::PathBuf;

pub mod parameters;
pub use parameters::ModelParameters;

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Cleaned fire records, in the order they appear in the input file
    pub records: Vec<FireRecord>,
}
