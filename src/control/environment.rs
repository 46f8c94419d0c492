use crate::config::EnvironmentConfig;
use crate::constants::{AIR_DENSITY_SEA_LEVEL, GRAVITY, SEA_LEVEL_PRESSURE};
use crate::utils::vector2d::Vector2D;

/// Uniform near-ground atmosphere and gravity field.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub air_density: f64, // kg/m³
    pub pressure: f64,    // Pa
    pub gravity: f64,     // m/s², acts along −y
    pub ground_height: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            air_density: AIR_DENSITY_SEA_LEVEL,
            pressure: SEA_LEVEL_PRESSURE,
            gravity: GRAVITY,
            ground_height: 0.0,
        }
    }
}

impl Environment {
    pub fn new(air_density: f64, pressure: f64, gravity: f64, ground_height: f64) -> Self {
        Environment {
            air_density,
            pressure,
            gravity,
            ground_height,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Environment::new(
            config.air_density,
            config.air_pressure,
            config.gravity,
            config.ground_height,
        )
    }

    /// Weight of a body of the given mass.
    pub fn gravity_force(&self, mass: f64) -> Vector2D {
        Vector2D::new(0.0, -self.gravity * mass)
    }

    pub fn is_in_atmosphere(&self) -> bool {
        self.air_density > 0.0
    }

    pub fn vacuum() -> Self {
        Environment {
            air_density: 0.0,
            pressure: 0.0,
            ..Environment::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sea_level() {
        let environment = Environment::default();
        assert_eq!(environment.air_density, 1.225);
        assert_eq!(environment.pressure, 101_325.0);
        assert!(environment.is_in_atmosphere());
    }

    #[test]
    fn test_gravity_force_scales_with_mass() {
        let environment = Environment::default();
        assert_eq!(environment.gravity_force(10.0), Vector2D::new(0.0, -98.0));
        assert_eq!(environment.gravity_force(0.0).y, 0.0);
    }

    #[test]
    fn test_vacuum() {
        let environment = Environment::vacuum();
        assert!(!environment.is_in_atmosphere());
        assert_eq!(environment.pressure, 0.0);
        assert_eq!(environment.gravity, GRAVITY);
    }
}
