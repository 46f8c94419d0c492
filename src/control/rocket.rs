use tracing::{debug, info, warn};

use crate::{
    config::SimulationConfig,
    constants::LANDED_SPEED,
    errors::SimulationError,
    telemetry_system::telemetry::TelemetrySnapshot,
    trajectory_system::{
        aerodynamics::Aerodynamics,
        collision::{BoundingBox, CollisionResolver, ContactManifold, ContactReport},
        kinematics::Kinematics,
    },
    utils::vector2d::Vector2D,
};

use super::{
    environment::Environment,
    mass_properties::{MassComponent, MassProperties, MassPropertiesModel},
    propulsion::{AreaBounds, BoosterId, RocketBooster},
};

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum RocketState {
    /// Configured but never stepped; components may still be added.
    Idle,
    Flying,
    Landed,
    Destroyed,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum RocketEvent {
    Destroyed { impact_speed: f64 },
}

/// Where a booster pushes, in the body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoosterMount {
    pub local_point: Vector2D,
    pub local_direction: Vector2D,
}

/// Body-frame hull box used for the ground overlap test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hull {
    pub min: Vector2D,
    pub max: Vector2D,
}

impl Hull {
    pub fn corners(&self) -> [Vector2D; 4] {
        [
            self.min,
            Vector2D::new(self.max.x, self.min.y),
            self.max,
            Vector2D::new(self.min.x, self.max.y),
        ]
    }

    /// Bottom booster under the hull centre pushing up; side boosters on the
    /// hull edges at `side_height` pushing inwards.
    pub fn default_mounts(&self, side_height: f64) -> [BoosterMount; 3] {
        let mid_x = (self.min.x + self.max.x) * 0.5;
        [
            BoosterMount {
                local_point: Vector2D::new(self.min.x, side_height),
                local_direction: Vector2D::new(1.0, 0.0),
            },
            BoosterMount {
                local_point: Vector2D::new(self.max.x, side_height),
                local_direction: Vector2D::new(-1.0, 0.0),
            },
            BoosterMount {
                local_point: Vector2D::new(mid_x, self.min.y),
                local_direction: Vector2D::new(0.0, 1.0),
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Firing {
    #[default]
    Off,
    Mounted,
    At(Vector2D),
}

/// The simulated vehicle: owns its mass model, three boosters and rigid-body
/// state, and advances them together once per frame.
pub struct Rocket {
    pub mass_model: MassPropertiesModel,
    pub boosters: [RocketBooster; 3],
    pub mounts: [BoosterMount; 3],
    pub kinematics: Kinematics,
    pub aerodynamics: Aerodynamics,
    pub environment: Environment,
    pub collision: CollisionResolver,
    pub hull: Hull,
    pub state: RocketState,
    pub last_contact: Option<ContactReport>,
    firing: [Firing; 3],
}

impl Rocket {
    pub fn new(
        environment: Environment,
        aerodynamics: Aerodynamics,
        collision: CollisionResolver,
        hull: Hull,
        side_booster_height: f64,
    ) -> Self {
        Rocket {
            mass_model: MassPropertiesModel::new(),
            boosters: Default::default(),
            mounts: hull.default_mounts(side_booster_height),
            kinematics: Kinematics::default(),
            aerodynamics,
            environment,
            collision,
            hull,
            state: RocketState::Idle,
            last_contact: None,
            firing: [Firing::Off; 3],
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let rocket_config = &config.rocket;
        if rocket_config.components.is_empty() {
            return Err(SimulationError::InitializationError(
                "rocket needs at least one component (the fuel tank)".to_string(),
            ));
        }

        let hull = Hull {
            min: Vector2D::new(rocket_config.hull_min[0], rocket_config.hull_min[1]),
            max: Vector2D::new(rocket_config.hull_max[0], rocket_config.hull_max[1]),
        };
        let mut rocket = Rocket::new(
            Environment::from_config(&config.environment),
            Aerodynamics::new(
                config.environment.drag_coefficient,
                config.environment.reference_area,
            ),
            CollisionResolver::from_config(&config.collision),
            hull,
            rocket_config.side_booster_height,
        );

        let booster = RocketBooster::from_config(&config.booster)?;
        rocket.boosters = std::array::from_fn(|_| booster.clone());
        let [left, right, bottom] = rocket_config.initial_outputs;
        rocket.set_booster_outputs(left, right, bottom);

        for component in &rocket_config.components {
            rocket.add_component(
                component.mass,
                Vector2D::new(component.position[0], component.position[1]),
                component.inertia,
            )?;
        }
        let [x, y] = rocket_config.initial_position;
        rocket.set_initial_position(x, y);

        Ok(rocket)
    }

    // --- configuration -------------------------------------------------

    /// Adds a mass component. The last one added is the fuel tank.
    pub fn add_component(
        &mut self,
        mass: f64,
        local_position: Vector2D,
        local_inertia: f64,
    ) -> Result<(), SimulationError> {
        if self.state != RocketState::Idle {
            return Err(SimulationError::InitializationError(
                "components can only be added before the simulation starts".to_string(),
            ));
        }
        self.mass_model
            .add_component(MassComponent::new(mass, local_position, local_inertia))
    }

    pub fn configure_booster(
        &mut self,
        id: BoosterId,
        gamma: f64,
        bounds: AreaBounds,
    ) -> Result<(), SimulationError> {
        self.boosters[id.index()].configure(gamma, bounds)
    }

    pub fn configure_boosters(
        &mut self,
        gamma: f64,
        bounds: AreaBounds,
    ) -> Result<(), SimulationError> {
        for id in BoosterId::ALL {
            self.configure_booster(id, gamma, bounds)?;
        }
        Ok(())
    }

    pub fn set_booster_fuel(&mut self, temperature: f64, molar_mass: f64) {
        for booster in &mut self.boosters {
            booster.set_fuel_properties(temperature, molar_mass);
        }
    }

    pub fn set_booster_outputs(&mut self, left: f64, right: f64, bottom: f64) {
        self.booster_mut(BoosterId::Left).set_output(left);
        self.booster_mut(BoosterId::Right).set_output(right);
        self.booster_mut(BoosterId::Bottom).set_output(bottom);
    }

    pub fn set_booster_mount(&mut self, id: BoosterId, mount: BoosterMount) {
        self.mounts[id.index()] = mount;
    }

    /// Places the centre of mass at `(x, y)`.
    pub fn set_initial_position(&mut self, x: f64, y: f64) {
        self.kinematics.position = Vector2D::new(x, y);
    }

    pub fn mass_properties(&self) -> Result<MassProperties, SimulationError> {
        self.mass_model.properties()
    }

    // --- controls ------------------------------------------------------

    pub fn booster(&self, id: BoosterId) -> &RocketBooster {
        &self.boosters[id.index()]
    }

    pub fn booster_mut(&mut self, id: BoosterId) -> &mut RocketBooster {
        &mut self.boosters[id.index()]
    }

    pub fn control_output(&mut self, id: BoosterId, delta: f64) {
        self.booster_mut(id).control_output(delta);
    }

    pub fn control_left_output(&mut self, delta: f64) {
        self.control_output(BoosterId::Left, delta);
    }

    pub fn control_right_output(&mut self, delta: f64) {
        self.control_output(BoosterId::Right, delta);
    }

    pub fn control_bottom_output(&mut self, delta: f64) {
        self.control_output(BoosterId::Bottom, delta);
    }

    pub fn control_nozzle_area(&mut self, id: BoosterId, delta: f64) {
        self.booster_mut(id).control_nozzle_area(delta);
    }

    pub fn control_throat_area(&mut self, id: BoosterId, delta: f64) {
        self.booster_mut(id).control_throat_area(delta);
    }

    /// Fires the booster during the next [`update`](Self::update).
    pub fn activate_booster(&mut self, id: BoosterId) {
        self.firing[id.index()] = Firing::Mounted;
    }

    /// Fires the booster during the next update with its force applied at a
    /// world point supplied by the geometry collaborator.
    pub fn activate_booster_at(&mut self, id: BoosterId, application_point: Vector2D) {
        self.firing[id.index()] = Firing::At(application_point);
    }

    pub fn activate_left_booster(&mut self) {
        self.activate_booster(BoosterId::Left);
    }

    pub fn activate_right_booster(&mut self) {
        self.activate_booster(BoosterId::Right);
    }

    pub fn activate_bottom_booster(&mut self) {
        self.activate_booster(BoosterId::Bottom);
    }

    // --- simulation ----------------------------------------------------

    /// Runs one frame: booster lag, thrust, fuel burn, integration and
    /// ground contact. Never fails; problems are logged and the affected part
    /// of the step is skipped.
    pub fn update(&mut self, delta_time: f64) -> Option<RocketEvent> {
        let event = self.step(delta_time);
        self.firing = [Firing::Off; 3];
        event
    }

    fn step(&mut self, delta_time: f64) -> Option<RocketEvent> {
        if self.state == RocketState::Destroyed {
            return None;
        }
        if !(delta_time > 0.0 && delta_time.is_finite()) {
            let err = SimulationError::InvalidTimestep(delta_time);
            debug!(%err, "skipping frame");
            return None;
        }
        if self.state == RocketState::Idle {
            self.state = RocketState::Flying;
            info!(
                mass = self.mass_model.total_mass(),
                fuel = self.mass_model.fuel_mass(),
                "simulation started"
            );
        }

        for booster in &mut self.boosters {
            booster.update(delta_time);
        }

        let mass = self.mass_model.current();
        for id in BoosterId::ALL {
            self.fire_booster(id, &mass);
        }

        self.consume_fuel(delta_time);

        let mass = self.mass_model.current();
        if !mass.has_mass() || !mass.has_inertia() {
            let err = SimulationError::DegenerateMassProperties {
                mass: mass.total_mass,
                inertia: mass.inertia,
            };
            debug!(%err, "integrating with degenerate mass properties");
        }
        if let Err(err) =
            self.kinematics
                .update(delta_time, &mass, &self.aerodynamics, &self.environment)
        {
            warn!(%err, "integration skipped");
            return None;
        }

        self.resolve_ground_contact(&mass)
    }

    fn fire_booster(&mut self, id: BoosterId, mass: &MassProperties) {
        let firing = self.firing[id.index()];
        if firing == Firing::Off || self.mass_model.is_fuel_exhausted() {
            self.boosters[id.index()].thrust = 0.0;
            return;
        }

        let booster = &mut self.boosters[id.index()];
        let thrust = match booster.compute_thrust(self.environment.pressure) {
            Ok(thrust) => thrust,
            Err(err) => {
                warn!(booster = %id, %err, "booster cannot fire this frame");
                return;
            }
        };
        if thrust <= 0.0 {
            return;
        }

        let mount = self.mounts[id.index()];
        let direction = self.kinematics.direction_to_world(mount.local_direction);
        let lever = match firing {
            Firing::At(point) => point - self.kinematics.position,
            _ => self
                .kinematics
                .lever_arm(mount.local_point, mass.center_of_mass),
        };
        self.kinematics.apply_force_at(direction * thrust, lever);
    }

    /// Burns the boosters' combined current output from the tank. The hull
    /// stays put while the centre of mass moves inside it.
    pub fn consume_fuel(&mut self, delta_time: f64) -> f64 {
        let flow: f64 = self.boosters.iter().map(|b| b.current_output).sum();
        if flow <= 0.0 {
            return 0.0;
        }

        let previous_center = self.mass_model.center_of_mass();
        let consumed = self.mass_model.consume_fuel(flow, delta_time);
        if consumed > 0.0 && self.mass_model.current().has_mass() {
            let shift = self.mass_model.center_of_mass() - previous_center;
            self.kinematics.position += self.kinematics.direction_to_world(shift);
        }
        if consumed > 0.0 && self.mass_model.is_fuel_exhausted() {
            info!(time = self.kinematics.time, "fuel exhausted");
        }
        consumed
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let center_of_mass = self.mass_model.center_of_mass();
        let corners = self
            .hull
            .corners()
            .map(|corner| self.kinematics.body_to_world(corner, center_of_mass));
        let [first, rest @ ..] = corners;
        rest.iter()
            .fold(BoundingBox::new(first, first), |bbox, corner| bbox.including(*corner))
    }

    fn resolve_ground_contact(&mut self, mass: &MassProperties) -> Option<RocketEvent> {
        let bbox = self.bounding_box();
        let Some(contact) = ContactManifold::against_ground(&bbox, self.environment.ground_height)
        else {
            self.last_contact = None;
            if self.state == RocketState::Landed {
                self.state = RocketState::Flying;
                info!(time = self.kinematics.time, "lift-off");
            }
            return None;
        };

        let report = self.collision.resolve(&mut self.kinematics, mass, &contact);
        self.last_contact = Some(report);

        if report.destroyed {
            self.state = RocketState::Destroyed;
            warn!(
                impact_speed = report.impact_speed,
                limit = self.collision.destruction_speed,
                "rocket destroyed on impact"
            );
            return Some(RocketEvent::Destroyed {
                impact_speed: report.impact_speed,
            });
        }

        let at_rest = self.kinematics.get_velocity_magnitude() < LANDED_SPEED
            && self.kinematics.angular_velocity.abs() < self.collision.angular_rest_threshold;
        if at_rest && self.state != RocketState::Landed {
            self.state = RocketState::Landed;
            info!(time = self.kinematics.time, "rocket landed");
        } else if !at_rest && self.state == RocketState::Landed {
            self.state = RocketState::Flying;
        }
        None
    }

    // --- outputs -------------------------------------------------------

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::capture(self)
    }

    pub fn altitude(&self) -> f64 {
        self.bounding_box().min.y - self.environment.ground_height
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == RocketState::Destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_rocket() -> Rocket {
        let mut config = SimulationConfig::default();
        config.rocket.initial_position = [0.0, 200.0];
        Rocket::from_config(&config).unwrap()
    }

    #[test]
    fn test_default_mounts() {
        let hull = Hull {
            min: Vector2D::new(0.0, -0.5),
            max: Vector2D::new(0.6, 2.5),
        };
        let [left, right, bottom] = hull.default_mounts(1.0);

        assert_eq!(left.local_point, Vector2D::new(0.0, 1.0));
        assert_eq!(left.local_direction, Vector2D::new(1.0, 0.0));
        assert_eq!(right.local_point, Vector2D::new(0.6, 1.0));
        assert_eq!(right.local_direction, Vector2D::new(-1.0, 0.0));
        assert_relative_eq!(bottom.local_point.x, 0.3);
        assert_eq!(bottom.local_direction, Vector2D::new(0.0, 1.0));
    }

    #[test]
    fn test_hull_stays_put_while_fuel_burns() {
        let mut rocket = create_test_rocket();
        rocket.kinematics.angle = 0.4;
        rocket.set_booster_outputs(0.0, 0.0, 5.0);
        let before = rocket.bounding_box();

        let consumed = rocket.consume_fuel(1.0);

        assert_relative_eq!(consumed, 5.0);
        let after = rocket.bounding_box();
        assert_relative_eq!(after.min.x, before.min.x, epsilon = 1e-12);
        assert_relative_eq!(after.min.y, before.min.y, epsilon = 1e-12);
        assert_relative_eq!(after.max.x, before.max.x, epsilon = 1e-12);
        assert_relative_eq!(after.max.y, before.max.y, epsilon = 1e-12);
    }

    #[test]
    fn test_activation_lasts_one_frame() {
        let mut rocket = create_test_rocket();
        rocket.set_booster_outputs(0.0, 0.0, 5.0);

        rocket.activate_bottom_booster();
        rocket.update(1.0 / 60.0);
        assert!(rocket.booster(BoosterId::Bottom).thrust > 0.0);
        assert!(rocket.kinematics.last_net_force.y > 0.0);

        rocket.update(1.0 / 60.0);
        assert_eq!(rocket.booster(BoosterId::Bottom).thrust, 0.0);
        assert!(rocket.kinematics.last_net_force.y < 0.0);
    }

    #[test]
    fn test_controls_route_to_boosters() {
        let mut rocket = create_test_rocket();
        rocket.control_left_output(2.0);
        rocket.control_right_output(3.0);
        rocket.control_bottom_output(4.0);

        assert_eq!(rocket.booster(BoosterId::Left).target_output, 2.0);
        assert_eq!(rocket.booster(BoosterId::Right).target_output, 3.0);
        assert_eq!(rocket.booster(BoosterId::Bottom).target_output, 4.0);
        assert_eq!(rocket.booster(BoosterId::Bottom).current_output, 0.0);
    }
}
