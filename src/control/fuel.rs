use crate::constants::UNIVERSAL_GAS_CONSTANT;
use crate::errors::SimulationError;

/// Thermodynamic properties of the propellant feeding a booster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelProperties {
    /// Stagnation (chamber) temperature, K.
    pub temperature: f64,
    /// Molar mass, kg/kmol.
    pub molar_mass: f64,
}

impl FuelProperties {
    pub fn new(temperature: f64, molar_mass: f64) -> Self {
        FuelProperties {
            temperature,
            molar_mass,
        }
    }

    /// Specific gas constant `R = Ru / M`, J/(kg·K). Not validated here.
    pub fn gas_constant(&self) -> f64 {
        UNIVERSAL_GAS_CONSTANT / self.molar_mass
    }

    pub fn checked_temperature(&self) -> Result<f64, SimulationError> {
        if self.temperature > 0.0 && self.temperature.is_finite() {
            Ok(self.temperature)
        } else {
            Err(SimulationError::InvalidFuelTemperature(self.temperature))
        }
    }

    pub fn checked_gas_constant(&self) -> Result<f64, SimulationError> {
        let r = self.gas_constant();
        if r > 0.0 && r.is_finite() {
            Ok(r)
        } else {
            Err(SimulationError::InvalidGasConstant(r))
        }
    }
}

impl Default for FuelProperties {
    // Unset fuel: fails validation until `set_booster_fuel` is called.
    fn default() -> Self {
        FuelProperties::new(0.0, 0.0)
    }
}
