use crate::{
    constants::{DRAG_COEFFICIENT, MIN_DRAG_SPEED, REFERENCE_AREA},
    control::environment::Environment,
    utils::vector2d::Vector2D,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Aerodynamics {
    pub drag_coefficient: f64,
    pub reference_area: f64, // m²
}

impl Default for Aerodynamics {
    fn default() -> Self {
        Aerodynamics::new(DRAG_COEFFICIENT, REFERENCE_AREA)
    }
}

impl Aerodynamics {
    pub fn new(drag_coefficient: f64, reference_area: f64) -> Self {
        Aerodynamics {
            drag_coefficient,
            reference_area,
        }
    }

    /// Quadratic drag opposing the velocity. Zero below [`MIN_DRAG_SPEED`],
    /// where the direction is undefined.
    pub fn calculate_drag(&self, velocity: Vector2D, environment: &Environment) -> Vector2D {
        let speed = velocity.magnitude();
        if speed < MIN_DRAG_SPEED {
            return Vector2D::ZERO;
        }

        let drag_magnitude = self.calculate_dynamic_pressure(speed, environment)
            * self.reference_area
            * self.drag_coefficient;

        -(velocity / speed) * drag_magnitude
    }

    fn calculate_dynamic_pressure(&self, speed: f64, environment: &Environment) -> f64 {
        0.5 * environment.air_density * speed * speed
    }
}
