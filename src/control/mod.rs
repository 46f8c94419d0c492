pub mod environment;
pub mod fuel;
pub mod mass_properties;
pub mod propulsion;
pub mod rocket;
