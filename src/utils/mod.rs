pub mod root_finder;
pub mod vector2d;
