//! Core state types for the generated cluster.
//!
//! A `Body3` is one sampled initial condition; a `Cluster` is the full set
//! handed to the external integrator. Vectors are `nalgebra` 3-vectors in SI units.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body3 {
    pub x: NVec3, // position, m
    pub v: NVec3, // velocity, m/s
    pub m: f64,   // mass, kg
}

#[derive(Debug, Clone, Default)]
pub struct Cluster {
    pub bodies: Vec<Body3>, // generation order = implicit body id
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Largest distance of any body from the origin
    pub fn extent(&self) -> f64 {
        self.bodies.iter().map(|b| b.x.norm()).fold(0.0, f64::max)
    }

    /// Sum of all body masses
    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.m).sum()
    }
}
