use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid fuel temperature: {0} K (must be positive)")]
    InvalidFuelTemperature(f64),

    #[error("Invalid specific gas constant: {0} J/(kg K) (must be positive)")]
    InvalidGasConstant(f64),

    #[error("Root finder diverged after {iterations} iterations (last iterate {last_iterate})")]
    NumericDivergence { iterations: usize, last_iterate: f64 },

    #[error("Degenerate mass properties: mass {mass} kg, inertia {inertia} kg m^2")]
    DegenerateMassProperties { mass: f64, inertia: f64 },

    #[error("Invalid timestep: {0} s")]
    InvalidTimestep(f64),

    #[error("Initialization error: {0}")]
    InitializationError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
