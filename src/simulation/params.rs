//! Runtime parameters for cluster sampling
//!
//! `ClusterParams` holds:
//! - body count and cluster radius,
//! - the per-component velocity bound,
//! - the log10 mass range and an optional deterministic seed

use crate::simulation::generator::GeneratorError;

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterParams {
    pub n_bodies: usize,            // number of bodies
    pub radius: f64,                // sphere radius, m
    pub velocity_bound: f64,        // velocity components in [-bound, bound), m/s
    pub mass_log_range: (f64, f64), // mass = 10^U(low, high), kg
    pub seed: Option<u64>,          // deterministic seed
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            n_bodies: 100,
            radius: 1.0e11,
            velocity_bound: 1.0e4,
            mass_log_range: (24.0, 26.0),
            seed: None,
        }
    }
}

impl ClusterParams {
    /// Reject parameters the samplers cannot draw from
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GeneratorError::InvalidParams(format!(
                "radius must be finite and positive, got {}",
                self.radius
            )));
        }
        if !self.velocity_bound.is_finite() || self.velocity_bound < 0.0 {
            return Err(GeneratorError::InvalidParams(format!(
                "velocity_bound must be finite and non-negative, got {}",
                self.velocity_bound
            )));
        }
        let (low, high) = self.mass_log_range;
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(GeneratorError::InvalidParams(format!(
                "mass_log_range must be a finite (low, high) with low <= high, got ({low}, {high})"
            )));
        }
        Ok(())
    }
}
