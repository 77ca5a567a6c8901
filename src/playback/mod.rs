pub mod trajectory;
pub mod state;
pub mod controller;
pub mod scheduler;
