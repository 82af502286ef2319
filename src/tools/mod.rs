pub mod generate_code;
pub mod generator;
pub mod registry;
