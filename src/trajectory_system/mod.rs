pub mod aerodynamics;
pub mod collision;
pub mod kinematics;
