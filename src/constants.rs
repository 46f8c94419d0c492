// Physical Constants
pub const GRAVITY: f64 = 9.8; // m/s²
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8314.0; // J/(kmol⋅K)

// Environmental Constants
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225; // kg/m³
pub const SEA_LEVEL_PRESSURE: f64 = 101325.0; // Pa
pub const DRAG_COEFFICIENT: f64 = 1.0;
pub const REFERENCE_AREA: f64 = 0.35; // m² (frontal area of the default hull)

// Rendering boundary
pub const PIXELS_PER_METER: f64 = 60.0;

// Simulation Parameters
pub const TIME_STEP: f64 = 1.0 / 60.0; // s
pub const MAX_SIMULATION_TIME: f64 = 120.0; // s
pub const MASS_EPSILON: f64 = 1e-9; // kg, also used for inertia (kg⋅m²)
pub const MIN_DRAG_SPEED: f64 = 1e-6; // m/s

// Root Finder
pub const SOLVER_PRECISION: f64 = 1e-3;
pub const SOLVER_MAX_ITERATIONS: usize = 100;
pub const SOLVER_FALLBACK_ROOT: f64 = 1.0;
pub const MIN_DERIVATIVE: f64 = 1e-9;
pub const DERIVATIVE_PERTURBATION: f64 = 1e-4;

// Propulsion Constants
pub const DEFAULT_GAMMA: f64 = 1.22;
pub const DEFAULT_FUEL_TEMPERATURE: f64 = 3200.0; // K
pub const DEFAULT_FUEL_MOLAR_MASS: f64 = 22.0; // kg/kmol
pub const DEFAULT_MACH_SEED: f64 = 2.0; // supersonic branch of the area–Mach relation
pub const BOOSTER_LAG_RATE: f64 = 0.2; // 1/s
pub const BOOSTER_SNAP_EPSILON: f64 = 1e-4;
pub const MAX_BOOSTER_OUTPUT: f64 = 50.0; // kg/s

// Collision Constants
pub const RESTITUTION: f64 = 0.2;
pub const RESTITUTION_THRESHOLD: f64 = 1.0; // m/s
pub const FRICTION_COEFFICIENT: f64 = 0.6;
pub const ANGULAR_REST_THRESHOLD: f64 = 0.05; // rad/s
pub const ANGULAR_DAMPING: f64 = 0.9;
pub const PENETRATION_SLOP: f64 = 0.005; // m
pub const POSITION_CORRECTION: f64 = 0.8;
pub const DESTRUCTION_SPEED: f64 = 15.0; // m/s
pub const LANDED_SPEED: f64 = 0.05; // m/s
