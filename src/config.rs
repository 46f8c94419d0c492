//! Runtime configuration, loaded from TOML. Every field has a default, so an
//! empty document describes the stock rocket.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SimulationConfig {
    pub environment: EnvironmentConfig,
    pub collision: CollisionConfig,
    pub booster: BoosterConfig,
    pub rocket: RocketConfig,
    pub render: RenderConfig,
}

impl SimulationConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub gravity: f64,
    pub air_density: f64,
    pub air_pressure: f64,
    pub drag_coefficient: f64,
    pub reference_area: f64,
    pub ground_height: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig {
            gravity: GRAVITY,
            air_density: AIR_DENSITY_SEA_LEVEL,
            air_pressure: SEA_LEVEL_PRESSURE,
            drag_coefficient: DRAG_COEFFICIENT,
            reference_area: REFERENCE_AREA,
            ground_height: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    pub restitution: f64,
    pub restitution_threshold: f64,
    pub friction: f64,
    pub angular_rest_threshold: f64,
    pub angular_damping: f64,
    pub penetration_slop: f64,
    pub correction_factor: f64,
    pub destruction_speed: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        CollisionConfig {
            restitution: RESTITUTION,
            restitution_threshold: RESTITUTION_THRESHOLD,
            friction: FRICTION_COEFFICIENT,
            angular_rest_threshold: ANGULAR_REST_THRESHOLD,
            angular_damping: ANGULAR_DAMPING,
            penetration_slop: PENETRATION_SLOP,
            correction_factor: POSITION_CORRECTION,
            destruction_speed: DESTRUCTION_SPEED,
        }
    }
}

/// Shared by all three boosters.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BoosterConfig {
    pub gamma: f64,
    pub min_nozzle_area: f64,
    pub max_nozzle_area: f64,
    pub min_throat_area: f64,
    pub max_throat_area: f64,
    pub max_output: f64,
    pub lag_rate: f64,
    pub chamber_pressure_ratio: f64,
    pub solver_precision: f64,
    pub solver_max_iterations: usize,
    pub fuel: FuelConfig,
}

impl Default for BoosterConfig {
    fn default() -> Self {
        BoosterConfig {
            gamma: DEFAULT_GAMMA,
            min_nozzle_area: 0.00001,
            max_nozzle_area: 0.0005,
            min_throat_area: 0.0002,
            max_throat_area: 0.0006,
            max_output: MAX_BOOSTER_OUTPUT,
            lag_rate: BOOSTER_LAG_RATE,
            chamber_pressure_ratio: 1.0,
            solver_precision: SOLVER_PRECISION,
            solver_max_iterations: SOLVER_MAX_ITERATIONS,
            fuel: FuelConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FuelConfig {
    pub temperature: f64, // K
    pub molar_mass: f64,  // kg/kmol
}

impl Default for FuelConfig {
    fn default() -> Self {
        FuelConfig {
            temperature: DEFAULT_FUEL_TEMPERATURE,
            molar_mass: DEFAULT_FUEL_MOLAR_MASS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ComponentConfig {
    pub mass: f64,
    pub position: [f64; 2],
    #[serde(default)]
    pub inertia: f64,
}

/// Body-frame layout. The last component is the fuel tank.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RocketConfig {
    pub components: Vec<ComponentConfig>,
    /// Hull box corners in the body frame, m.
    pub hull_min: [f64; 2],
    pub hull_max: [f64; 2],
    /// Side booster mounts sit on the hull edges at this body-frame height.
    pub side_booster_height: f64,
    pub initial_position: [f64; 2],
    /// Initial outputs, kg/s: left, right, bottom.
    pub initial_outputs: [f64; 3],
}

impl Default for RocketConfig {
    // 0.67 m × 3.33 m hull with the tank above the payload and engine bay.
    fn default() -> Self {
        RocketConfig {
            components: vec![
                ComponentConfig {
                    mass: 100.0,
                    position: [0.333, 1.167],
                    inertia: 0.0,
                },
                ComponentConfig {
                    mass: 100.0,
                    position: [0.333, -0.333],
                    inertia: 0.0,
                },
                ComponentConfig {
                    mass: 80.0,
                    position: [0.333, 1.833],
                    inertia: 0.0,
                },
            ],
            hull_min: [0.0, -0.5],
            hull_max: [0.667, 2.833],
            side_booster_height: 0.833,
            initial_position: [0.0, 1.5],
            initial_outputs: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub pixels_per_meter: f64,
    /// Screen height in pixels, used to flip the y axis.
    pub screen_height: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            pixels_per_meter: PIXELS_PER_METER,
            screen_height: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.rocket.components.len(), 3);
        assert_eq!(config.booster.gamma, 1.22);
    }

    #[test]
    fn test_partial_sections_override_fields() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [environment]
            gravity = 3.71

            [booster.fuel]
            temperature = 2800.0

            [collision]
            restitution = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(config.environment.gravity, 3.71);
        assert_eq!(config.environment.air_pressure, SEA_LEVEL_PRESSURE);
        assert_eq!(config.booster.fuel.temperature, 2800.0);
        assert_eq!(config.booster.fuel.molar_mass, DEFAULT_FUEL_MOLAR_MASS);
        assert_eq!(config.collision.restitution, 0.0);
        assert_eq!(config.collision.friction, FRICTION_COEFFICIENT);
    }

    #[test]
    fn test_component_list() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [rocket]
            components = [
                { mass = 100.0, position = [20.0, 70.0] },
                { mass = 100.0, position = [20.0, -20.0], inertia = 1.5 },
                { mass = 80.0, position = [20.0, 110.0] },
            ]
            "#,
        )
        .unwrap();

        let components = &config.rocket.components;
        assert_eq!(components.len(), 3);
        assert_eq!(components[1].inertia, 1.5);
        assert_eq!(components[2].position, [20.0, 110.0]);
        assert_eq!(config.rocket.hull_max, RocketConfig::default().hull_max);
    }

    #[test]
    fn test_malformed_document() {
        let result = SimulationConfig::from_toml_str("[environment]\ngravity = \"strong\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = SimulationConfig::load("/nonexistent/rocket.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
