pub mod states;
pub mod params;
pub mod generator;
pub mod bodies_file;
