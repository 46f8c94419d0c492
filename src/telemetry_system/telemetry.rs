use crate::control::propulsion::{BoosterId, RocketBooster};
use crate::control::rocket::{Rocket, RocketState};
use crate::utils::vector2d::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoosterTelemetry {
    pub current_output: f64, // kg/s
    pub target_output: f64,
    pub thrust: f64, // N
    pub mach: f64,
    pub exit_velocity: f64, // m/s
}

impl BoosterTelemetry {
    fn from_booster(booster: &RocketBooster) -> Self {
        BoosterTelemetry {
            current_output: booster.current_output,
            target_output: booster.target_output,
            thrust: booster.thrust,
            mach: booster.mach,
            exit_velocity: booster.exit_velocity,
        }
    }
}

/// Read-only view of the rocket after a frame, for HUD and logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySnapshot {
    pub time: f64,
    pub state: RocketState,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub acceleration: Vector2D,
    pub angle: f64,
    pub angular_velocity: f64,
    /// Net force and torque of the last step, captured before the reset.
    pub net_force: Vector2D,
    pub net_torque: f64,
    pub total_mass: f64,
    pub fuel_mass: f64,
    pub center_of_mass: Vector2D,
    pub inertia: f64,
    pub altitude: f64,
    pub boosters: [BoosterTelemetry; 3],
}

impl TelemetrySnapshot {
    pub fn capture(rocket: &Rocket) -> Self {
        let kinematics = &rocket.kinematics;
        let mass = rocket.mass_model.current();
        TelemetrySnapshot {
            time: kinematics.time,
            state: rocket.state,
            position: kinematics.position,
            velocity: kinematics.velocity,
            acceleration: kinematics.acceleration,
            angle: kinematics.angle,
            angular_velocity: kinematics.angular_velocity,
            net_force: kinematics.last_net_force,
            net_torque: kinematics.last_net_torque,
            total_mass: mass.total_mass,
            fuel_mass: rocket.mass_model.fuel_mass(),
            center_of_mass: mass.center_of_mass,
            inertia: mass.inertia,
            altitude: rocket.altitude(),
            boosters: BoosterId::ALL
                .map(|id| BoosterTelemetry::from_booster(rocket.booster(id))),
        }
    }

    pub fn booster(&self, id: BoosterId) -> &BoosterTelemetry {
        &self.boosters[id.index()]
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }
}

pub struct Telemetry {
    pub log: Vec<String>,
    max_velocity: f64,
    max_altitude: f64,
    min_fuel: f64,
    max_acceleration: f64,
    state_times: Vec<(RocketState, f64)>,
    last_snapshot: Option<TelemetrySnapshot>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Telemetry::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Telemetry {
            log: Vec::new(),
            max_velocity: 0.0,
            max_altitude: 0.0,
            min_fuel: f64::MAX,
            max_acceleration: 0.0,
            state_times: Vec::new(),
            last_snapshot: None,
        }
    }

    fn format_vector2d(vec: &Vector2D, precision: usize) -> String {
        format!(
            "x = {:.precision$}, y = {:.precision$}",
            vec.x,
            vec.y,
            precision = precision
        )
    }

    fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    fn format_altitude(altitude: f64) -> String {
        if altitude >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    pub fn collect_data(&mut self, rocket: &Rocket) {
        self.record(rocket.snapshot());
    }

    pub fn record(&mut self, snapshot: TelemetrySnapshot) {
        let velocity_magnitude = snapshot.speed();
        let acceleration_magnitude = snapshot.acceleration.magnitude();

        self.max_velocity = self.max_velocity.max(velocity_magnitude);
        self.max_altitude = self.max_altitude.max(snapshot.altitude);
        self.min_fuel = self.min_fuel.min(snapshot.fuel_mass);
        self.max_acceleration = self.max_acceleration.max(acceleration_magnitude);

        let [left, right, bottom] = snapshot.boosters;
        let data = format!(
            "Time: {}\n\
                 Position: {} m\n\
                 Velocity: {} m/s (Magnitude: {:.2} m/s)\n\
                 Acceleration: {} m/s² (Magnitude: {:.2} m/s²)\n\
                 Net Force: {} N\n\
                 Thrust (L/R/B): {:.1} / {:.1} / {:.1} N\n\
                 Output (L/R/B): {:.2} / {:.2} / {:.2} kg/s\n\
                 Fuel: {:.2} kg\n\
                 Total Mass: {:.2} kg\n\
                 Orientation: {:.2}°\n",
            Self::format_time(snapshot.time),
            Self::format_vector2d(&snapshot.position, 2),
            Self::format_vector2d(&snapshot.velocity, 2),
            velocity_magnitude,
            Self::format_vector2d(&snapshot.acceleration, 2),
            acceleration_magnitude,
            Self::format_vector2d(&snapshot.net_force, 1),
            left.thrust,
            right.thrust,
            bottom.thrust,
            left.current_output,
            right.current_output,
            bottom.current_output,
            snapshot.fuel_mass,
            snapshot.total_mass,
            snapshot.angle.to_degrees()
        );
        self.log.push(data);

        match self.state_times.last() {
            Some((last_state, _)) if *last_state == snapshot.state => {}
            _ => self.state_times.push((snapshot.state, snapshot.time)),
        }
        self.last_snapshot = Some(snapshot);
    }

    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    pub fn max_altitude(&self) -> f64 {
        self.max_altitude
    }

    /// Lowest fuel mass seen; `None` before the first sample.
    pub fn min_fuel(&self) -> Option<f64> {
        self.last_snapshot.map(|_| self.min_fuel)
    }

    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    pub fn state_transitions(&self) -> &[(RocketState, f64)] {
        &self.state_times
    }

    pub fn last_snapshot(&self) -> Option<&TelemetrySnapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::from("--- Simulation Summary ---\n");
        summary.push_str(&format!("Max Velocity: {:.2} m/s\n", self.max_velocity));
        summary.push_str(&format!(
            "Max Altitude: {}\n",
            Self::format_altitude(self.max_altitude)
        ));
        match self.min_fuel() {
            Some(fuel) => summary.push_str(&format!("Min Fuel: {:.2} kg\n", fuel)),
            None => summary.push_str("Min Fuel: n/a\n"),
        }
        summary.push_str(&format!(
            "Max Acceleration: {:.2} m/s²\n",
            self.max_acceleration
        ));

        summary.push_str("\n--- State Transitions ---\n");
        for (state, time) in &self.state_times {
            summary.push_str(&format!(
                "State {:?} reached at: {}\n",
                state,
                Self::format_time(*time)
            ));
        }
        summary
    }

    pub fn display_data(&self) {
        println!("--- Telemetry Data ---");
        for entry in &self.log {
            println!("{}", entry);
        }
        println!("--- End of Telemetry ---\n");
        print!("{}", self.summary());
    }
}
