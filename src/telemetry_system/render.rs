//! Conversion from the SI simulation frame to screen pixels. This is the only
//! place the pixels-per-meter factor is applied.

use crate::config::RenderConfig;
use crate::control::rocket::Rocket;
use crate::utils::vector2d::Vector2D;

/// Placement of the rocket drawable on screen. Screen y grows downwards and
/// rotations are clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    /// Where the centre of mass lands on screen, px.
    pub position: Vector2D,
    /// Centre of mass relative to the top-left corner of the hull, px.
    pub origin: Vector2D,
    pub rotation_degrees: f64,
}

impl RenderTransform {
    pub fn from_rocket(rocket: &Rocket, config: &RenderConfig) -> Self {
        let ppm = config.pixels_per_meter;
        let world = rocket.kinematics.position;
        let center_of_mass = rocket.mass_model.center_of_mass();
        let hull = &rocket.hull;

        RenderTransform {
            position: Vector2D::new(world.x * ppm, config.screen_height - world.y * ppm),
            origin: Vector2D::new(
                (center_of_mass.x - hull.min.x) * ppm,
                (hull.max.y - center_of_mass.y) * ppm,
            ),
            rotation_degrees: -rocket.kinematics.angle.to_degrees(),
        }
    }

    /// Screen position of a world point, px.
    pub fn world_to_screen(point: Vector2D, config: &RenderConfig) -> Vector2D {
        Vector2D::new(
            point.x * config.pixels_per_meter,
            config.screen_height - point.y * config.pixels_per_meter,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_transform_scales_and_flips() {
        let mut config = SimulationConfig::default();
        config.rocket.initial_position = [2.0, 5.0];
        let mut rocket = Rocket::from_config(&config).unwrap();
        rocket.kinematics.angle = FRAC_PI_2;

        let transform = RenderTransform::from_rocket(&rocket, &config.render);

        assert_relative_eq!(transform.position.x, 120.0, epsilon = EPSILON);
        assert_relative_eq!(transform.position.y, 1000.0 - 300.0, epsilon = EPSILON);
        assert_relative_eq!(transform.rotation_degrees, -90.0, epsilon = EPSILON);

        let center_of_mass = rocket.mass_model.center_of_mass();
        assert_relative_eq!(transform.origin.x, center_of_mass.x * 60.0, epsilon = EPSILON);
        assert_relative_eq!(
            transform.origin.y,
            (2.833 - center_of_mass.y) * 60.0,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_world_to_screen_matches_position() {
        let config = SimulationConfig::default();
        let rocket = Rocket::from_config(&config).unwrap();
        let transform = RenderTransform::from_rocket(&rocket, &config.render);

        let screen = RenderTransform::world_to_screen(rocket.kinematics.position, &config.render);
        assert_eq!(screen, transform.position);
    }
}
