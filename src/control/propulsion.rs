use std::fmt;

use tracing::debug;

use crate::config::BoosterConfig;
use crate::constants::{
    BOOSTER_LAG_RATE, BOOSTER_SNAP_EPSILON, DEFAULT_GAMMA, DEFAULT_MACH_SEED, MAX_BOOSTER_OUTPUT,
    SOLVER_FALLBACK_ROOT,
};
use crate::control::fuel::FuelProperties;
use crate::errors::SimulationError;
use crate::utils::root_finder::NewtonRaphson;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoosterId {
    Left,
    Right,
    Bottom,
}

impl BoosterId {
    pub const ALL: [BoosterId; 3] = [BoosterId::Left, BoosterId::Right, BoosterId::Bottom];

    pub fn index(self) -> usize {
        match self {
            BoosterId::Left => 0,
            BoosterId::Right => 1,
            BoosterId::Bottom => 2,
        }
    }
}

impl fmt::Display for BoosterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoosterId::Left => "left",
            BoosterId::Right => "right",
            BoosterId::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// Controllable nozzle exit (`Ae`) and throat (`At`) area limits, m².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBounds {
    pub min_nozzle: f64,
    pub max_nozzle: f64,
    pub min_throat: f64,
    pub max_throat: f64,
}

impl Default for AreaBounds {
    fn default() -> Self {
        AreaBounds {
            min_nozzle: 0.00001,
            max_nozzle: 0.0005,
            min_throat: 0.0002,
            max_throat: 0.0006,
        }
    }
}

/// One thruster: converts a commanded propellant mass flow into thrust
/// through the isentropic nozzle relations.
///
/// Output and areas are commanded through their `target_*` values and the
/// `current_*` values follow with a first-order lag in [`update`](Self::update).
#[derive(Debug, Clone)]
pub struct RocketBooster {
    pub target_output: f64, // kg/s
    pub current_output: f64,
    pub max_output: f64,
    pub gamma: f64,
    pub bounds: AreaBounds,
    pub target_nozzle_area: f64,
    pub current_nozzle_area: f64,
    pub target_throat_area: f64,
    pub current_throat_area: f64,
    pub lag_rate: f64,
    /// Chamber pressure as a multiple of ambient pressure.
    pub chamber_pressure_ratio: f64,
    pub fuel: FuelProperties,

    // Outputs of the last thrust computation
    pub mach: f64,
    pub exit_pressure: f64,    // Pa
    pub exit_temperature: f64, // K
    pub exit_velocity: f64,    // m/s
    pub thrust: f64,           // N

    solver: NewtonRaphson,
    // Continuation seed: last converged exit Mach
    last_mach: Option<f64>,
    solved_area_ratio: Option<f64>,
}

impl AreaBounds {
    /// Every limit must be finite and positive, and each minimum may not
    /// exceed its maximum.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let limits = [
            self.min_nozzle,
            self.max_nozzle,
            self.min_throat,
            self.max_throat,
        ];
        if limits.iter().any(|area| !(area.is_finite() && *area > 0.0)) {
            return Err(SimulationError::InitializationError(format!(
                "booster area limits must be finite and positive: {:?}",
                self
            )));
        }
        if self.min_nozzle > self.max_nozzle || self.min_throat > self.max_throat {
            return Err(SimulationError::InitializationError(format!(
                "booster area minimum exceeds maximum: {:?}",
                self
            )));
        }
        Ok(())
    }
}

fn check_gamma(gamma: f64) -> Result<(), SimulationError> {
    if gamma.is_finite() && gamma > 1.0 {
        Ok(())
    } else {
        Err(SimulationError::InitializationError(format!(
            "heat capacity ratio must be greater than 1, got {}",
            gamma
        )))
    }
}

impl Default for RocketBooster {
    fn default() -> Self {
        RocketBooster::new(DEFAULT_GAMMA, AreaBounds::default())
    }
}

impl RocketBooster {
    pub fn new(gamma: f64, bounds: AreaBounds) -> Self {
        RocketBooster {
            target_output: 0.0,
            current_output: 0.0,
            max_output: MAX_BOOSTER_OUTPUT,
            gamma,
            bounds,
            target_nozzle_area: bounds.max_nozzle,
            current_nozzle_area: bounds.max_nozzle,
            target_throat_area: bounds.min_throat,
            current_throat_area: bounds.min_throat,
            lag_rate: BOOSTER_LAG_RATE,
            chamber_pressure_ratio: 1.0,
            fuel: FuelProperties::default(),
            mach: 0.0,
            exit_pressure: 0.0,
            exit_temperature: 0.0,
            exit_velocity: 0.0,
            thrust: 0.0,
            solver: NewtonRaphson::default(),
            last_mach: None,
            solved_area_ratio: None,
        }
    }

    /// Builds a booster from the shared `[booster]` section, rejecting limits
    /// the controls could not clamp against.
    pub fn from_config(config: &BoosterConfig) -> Result<Self, SimulationError> {
        check_gamma(config.gamma)?;
        let bounds = AreaBounds {
            min_nozzle: config.min_nozzle_area,
            max_nozzle: config.max_nozzle_area,
            min_throat: config.min_throat_area,
            max_throat: config.max_throat_area,
        };
        bounds.validate()?;
        if !(config.max_output.is_finite() && config.max_output >= 0.0) {
            return Err(SimulationError::InitializationError(format!(
                "booster max output must be finite and non-negative, got {}",
                config.max_output
            )));
        }
        if !(config.lag_rate.is_finite() && config.lag_rate >= 0.0) {
            return Err(SimulationError::InitializationError(format!(
                "booster lag rate must be finite and non-negative, got {}",
                config.lag_rate
            )));
        }

        let mut booster = RocketBooster::new(config.gamma, bounds).with_solver(NewtonRaphson::new(
            config.solver_precision,
            config.solver_max_iterations,
        ));
        booster.max_output = config.max_output;
        booster.lag_rate = config.lag_rate;
        booster.chamber_pressure_ratio = config.chamber_pressure_ratio;
        booster.set_fuel_properties(config.fuel.temperature, config.fuel.molar_mass);
        Ok(booster)
    }

    pub fn with_solver(mut self, solver: NewtonRaphson) -> Self {
        self.solver = solver;
        self
    }

    /// Replaces gamma and area limits; current and target areas are pulled
    /// into the new limits. Invalid values leave the booster unchanged.
    pub fn configure(&mut self, gamma: f64, bounds: AreaBounds) -> Result<(), SimulationError> {
        check_gamma(gamma)?;
        bounds.validate()?;
        self.gamma = gamma;
        self.bounds = bounds;
        self.target_nozzle_area = self.clamp_nozzle(self.target_nozzle_area);
        self.current_nozzle_area = self.clamp_nozzle(self.current_nozzle_area);
        self.target_throat_area = self.clamp_throat(self.target_throat_area);
        self.current_throat_area = self.clamp_throat(self.current_throat_area);
        self.last_mach = None;
        self.solved_area_ratio = None;
        Ok(())
    }

    pub fn set_fuel_properties(&mut self, temperature: f64, molar_mass: f64) {
        self.fuel = FuelProperties::new(temperature, molar_mass);
    }

    /// Sets target and current output at once. Configuration only.
    pub fn set_output(&mut self, output: f64) {
        if !output.is_finite() {
            return;
        }
        self.target_output = self.clamp_output(output);
        self.current_output = self.target_output;
    }

    // Non-finite deltas are ignored by all controls.
    pub fn control_output(&mut self, delta: f64) {
        if delta.is_finite() {
            self.target_output = self.clamp_output(self.target_output + delta);
        }
    }

    pub fn control_nozzle_area(&mut self, delta: f64) {
        if delta.is_finite() {
            self.target_nozzle_area = self.clamp_nozzle(self.target_nozzle_area + delta);
        }
    }

    pub fn control_throat_area(&mut self, delta: f64) {
        if delta.is_finite() {
            self.target_throat_area = self.clamp_throat(self.target_throat_area + delta);
        }
    }

    pub fn update(&mut self, delta_time: f64) {
        if !(delta_time > 0.0 && delta_time.is_finite()) {
            return;
        }
        let rate = self.lag_rate;
        self.current_output = relax(self.current_output, self.target_output, rate, delta_time);
        self.current_nozzle_area = relax(
            self.current_nozzle_area,
            self.target_nozzle_area,
            rate,
            delta_time,
        );
        self.current_throat_area = relax(
            self.current_throat_area,
            self.target_throat_area,
            rate,
            delta_time,
        );
    }

    pub fn area_ratio(&self) -> f64 {
        self.current_nozzle_area / self.current_throat_area
    }

    /// Thrust in newtons for the current output and geometry.
    ///
    /// `F = ṁ·Ve + (Pe − Pa)·Ae`, where the exit state comes from the exit
    /// Mach number solved on the supersonic branch of the area–Mach relation.
    pub fn compute_thrust(&mut self, ambient_pressure: f64) -> Result<f64, SimulationError> {
        self.thrust = 0.0;
        if self.current_output <= 0.0 {
            return Ok(0.0);
        }

        let stagnation_temperature = self.fuel.checked_temperature()?;
        let gas_constant = self.fuel.checked_gas_constant()?;

        let mach = self.exit_mach();
        let gamma = self.gamma;
        let t2 = (gamma - 1.0) / 2.0;
        let stagnation_ratio = 1.0 + t2 * mach * mach;

        let chamber_pressure = ambient_pressure * self.chamber_pressure_ratio;
        self.exit_pressure = chamber_pressure * stagnation_ratio.powf(-gamma / (gamma - 1.0));
        self.exit_temperature = stagnation_temperature / stagnation_ratio;
        self.exit_velocity = mach * (gamma * gas_constant * self.exit_temperature).sqrt();

        let thrust = self.current_output * self.exit_velocity
            + (self.exit_pressure - ambient_pressure) * self.current_nozzle_area;
        // A separated, over-expanded nozzle does not pull the vehicle.
        self.thrust = thrust.max(0.0);
        Ok(self.thrust)
    }

    fn exit_mach(&mut self) -> f64 {
        let ratio = self.area_ratio();
        if self.solved_area_ratio == Some(ratio) {
            return self.mach;
        }

        let gamma = self.gamma;
        let t1 = 2.0 / (gamma + 1.0);
        let t2 = (gamma - 1.0) / 2.0;
        let exponent = (gamma + 1.0) / (2.0 * (gamma - 1.0));

        // A/A* = (1/M)·[t1·(1 + t2·M²)]^exponent
        let area_mach = |m: f64| (t1 * (1.0 + t2 * m * m)).powf(exponent) / m - ratio;
        let area_mach_slope = |m: f64| {
            let base = t1 * (1.0 + t2 * m * m);
            base.powf(exponent - 1.0) * (1.0 - base / (m * m))
        };

        let seed = self.last_mach.unwrap_or(DEFAULT_MACH_SEED);
        self.mach = match self.solver.try_solve(area_mach, area_mach_slope, seed) {
            Ok(mach) if mach > 0.0 => {
                self.last_mach = Some(mach);
                mach
            }
            Ok(mach) => {
                debug!(mach, ratio, "negative exit mach, using fallback");
                SOLVER_FALLBACK_ROOT
            }
            Err(err) => {
                debug!(%err, ratio, "exit mach solve diverged, using fallback");
                SOLVER_FALLBACK_ROOT
            }
        };
        self.solved_area_ratio = Some(ratio);
        self.mach
    }

    // Must not panic on unvalidated limits written to the public fields.
    fn clamp_output(&self, output: f64) -> f64 {
        output.max(0.0).min(self.max_output)
    }

    fn clamp_nozzle(&self, area: f64) -> f64 {
        area.max(self.bounds.min_nozzle).min(self.bounds.max_nozzle)
    }

    fn clamp_throat(&self, area: f64) -> f64 {
        area.max(self.bounds.min_throat).min(self.bounds.max_throat)
    }
}

fn relax(current: f64, target: f64, rate: f64, delta_time: f64) -> f64 {
    if (target - current).abs() < BOOSTER_SNAP_EPSILON {
        return target;
    }
    current + (target - current) * (rate * delta_time).min(1.0)
}
