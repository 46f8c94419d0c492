pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use config::{ConfigError, SimulationConfig};
pub use constants::*;
pub use control::environment::Environment;
pub use control::mass_properties::{MassComponent, MassProperties, MassPropertiesModel};
pub use control::propulsion::{AreaBounds, BoosterId, RocketBooster};
pub use control::rocket::{BoosterMount, Hull, Rocket, RocketEvent, RocketState};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::aerodynamics::Aerodynamics;
pub use trajectory_system::collision::{BoundingBox, CollisionResolver, ContactManifold};
pub use trajectory_system::kinematics::Kinematics;

// Re-export commonly used items from telemetry_system
pub use telemetry_system::render::RenderTransform;
pub use telemetry_system::telemetry::{Telemetry, TelemetrySnapshot};

// Re-export commonly used utilities
pub use utils::root_finder::NewtonRaphson;
pub use utils::vector2d::Vector2D;
