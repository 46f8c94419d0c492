use tracing::{debug, warn};

use crate::{
    control::{environment::Environment, mass_properties::MassProperties},
    errors::SimulationError,
    utils::vector2d::Vector2D,
};

use super::aerodynamics::Aerodynamics;

/// Rigid-body state of the rocket. `position` is the world position of the
/// centre of mass; `angle` rotates the body frame counter-clockwise.
///
/// Forces and torques are accumulated during a frame and consumed by exactly
/// one [`update`](Self::update).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kinematics {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub acceleration: Vector2D,
    pub angle: f64,
    pub angular_velocity: f64,
    pub time: f64,
    /// Net force and torque of the last integrated step, before the reset.
    pub last_net_force: Vector2D,
    pub last_net_torque: f64,
    force: Vector2D,
    torque: f64,
}

impl Kinematics {
    pub fn new(position: Vector2D, angle: f64) -> Self {
        Kinematics {
            position,
            angle,
            ..Kinematics::default()
        }
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.force += force;
    }

    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    /// Applies `force` at a point offset by `lever` from the centre of mass
    /// (both in world axes): adds the force and `lever × force`.
    pub fn apply_force_at(&mut self, force: Vector2D, lever: Vector2D) {
        self.apply_force(force);
        self.apply_torque(lever.cross(&force));
    }

    pub fn accumulated_force(&self) -> Vector2D {
        self.force
    }

    pub fn accumulated_torque(&self) -> f64 {
        self.torque
    }

    /// World-axis offset of a body-frame point from the centre of mass.
    pub fn lever_arm(&self, local_point: Vector2D, local_center_of_mass: Vector2D) -> Vector2D {
        (local_point - local_center_of_mass).rotate(self.angle)
    }

    pub fn body_to_world(&self, local_point: Vector2D, local_center_of_mass: Vector2D) -> Vector2D {
        self.position + self.lever_arm(local_point, local_center_of_mass)
    }

    pub fn direction_to_world(&self, local_direction: Vector2D) -> Vector2D {
        local_direction.rotate(self.angle)
    }

    /// Advances the body by one frame: drag and gravity are added to the
    /// accumulated forces, then the state is integrated with semi-implicit
    /// Euler. An invalid `delta_time` leaves the body untouched.
    pub fn update(
        &mut self,
        delta_time: f64,
        mass: &MassProperties,
        aerodynamics: &Aerodynamics,
        environment: &Environment,
    ) -> Result<(), SimulationError> {
        if !(delta_time > 0.0 && delta_time.is_finite()) {
            return Err(SimulationError::InvalidTimestep(delta_time));
        }

        let drag = aerodynamics.calculate_drag(self.velocity, environment);
        self.apply_force(drag);
        self.apply_force(environment.gravity_force(mass.total_mass));

        self.integrate(delta_time, mass);
        Ok(())
    }

    fn integrate(&mut self, delta_time: f64, mass: &MassProperties) {
        self.last_net_force = self.force;
        self.last_net_torque = self.torque;

        if mass.has_mass() && self.force.is_finite() {
            self.acceleration = self.force / mass.total_mass;
            self.velocity += self.acceleration * delta_time;
            self.position += self.velocity * delta_time;
        } else {
            debug!(
                mass = mass.total_mass,
                force_x = self.force.x,
                force_y = self.force.y,
                "skipping linear integration"
            );
            self.acceleration = Vector2D::ZERO;
        }

        let angular_acceleration = if mass.has_inertia() && self.torque.is_finite() {
            self.torque / mass.inertia
        } else {
            0.0
        };
        self.angular_velocity += angular_acceleration * delta_time;
        self.angle += self.angular_velocity * delta_time;

        if !self.position.is_finite() || !self.velocity.is_finite() {
            warn!("non-finite linear state, resetting position and velocity");
            self.position = Vector2D::ZERO;
            self.velocity = Vector2D::ZERO;
        }
        if !self.angle.is_finite() || !self.angular_velocity.is_finite() {
            warn!("non-finite angular state, resetting angle and angular velocity");
            self.angle = 0.0;
            self.angular_velocity = 0.0;
        }

        self.force = Vector2D::ZERO;
        self.torque = 0.0;
        self.time += delta_time;
    }

    pub fn get_velocity_magnitude(&self) -> f64 {
        self.velocity.magnitude()
    }

    pub fn get_acceleration_magnitude(&self) -> f64 {
        self.acceleration.magnitude()
    }

    pub fn get_orientation_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }
}
