//! Sample synthetic initial conditions for a gravitational cluster
//!
//! Each body gets:
//! - a position uniform over the *volume* of a sphere (cube-root radial
//!   transform, arccos polar angle),
//! - a velocity with independent uniform components in `[-bound, bound)`,
//! - a log-uniform mass, `10^U(low, high)`.
//!
//! The velocity distribution is cosmetic, not virialised. Downstream runs
//! depend on it staying independent-uniform.

use std::f64::consts::PI;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::bodies_file::write_cluster;
use crate::simulation::params::ClusterParams;
use crate::simulation::states::{Body3, Cluster, NVec3};

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Map three unit variates `u, v, w` in `[0, 1)` to a point inside a sphere
pub fn sample_position(u: f64, v: f64, w: f64, radius: f64) -> NVec3 {
    let r = radius * u.cbrt();
    let theta = (2.0 * v - 1.0).acos();
    let phi = 2.0 * PI * w;

    NVec3::new(
        r * theta.sin() * phi.cos(),
        r * theta.sin() * phi.sin(),
        r * theta.cos(),
    )
}

// Uniform on [lo, hi); collapses to `lo` for an empty interval instead of panicking
fn uniform<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.gen::<f64>()
}

/// Draw one body from the cluster distributions
pub fn sample_body<R: Rng>(rng: &mut R, params: &ClusterParams) -> Body3 {
    let (u, w_theta, w_phi): (f64, f64, f64) = (rng.gen(), rng.gen(), rng.gen());
    let x = sample_position(u, w_theta, w_phi, params.radius);

    let bound = params.velocity_bound;
    let v = NVec3::new(
        uniform(rng, -bound, bound),
        uniform(rng, -bound, bound),
        uniform(rng, -bound, bound),
    );

    let (low, high) = params.mass_log_range;
    let m = 10f64.powf(uniform(rng, low, high));

    Body3 { x, v, m }
}

/// Sample `params.n_bodies` bodies with the supplied RNG
pub fn generate_cluster<R: Rng>(
    params: &ClusterParams,
    rng: &mut R,
) -> Result<Cluster, GeneratorError> {
    params.validate()?;

    let bodies = (0..params.n_bodies)
        .map(|_| sample_body(rng, params))
        .collect();

    Ok(Cluster { bodies })
}

/// RNG for a run: seeded when `seed` is set, entropy otherwise
pub fn cluster_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Generate a cluster and write it to `path`.
///
/// A failed write leaves whatever was already flushed on disk; the file is
/// neither cleaned up nor resumable, so rerun from scratch.
pub fn generate_to_file<P: AsRef<Path>>(
    params: &ClusterParams,
    title: &str,
    path: P,
) -> Result<Cluster, GeneratorError> {
    let path = path.as_ref();
    info!("Generating {} bodies...", params.n_bodies);

    let mut rng = cluster_rng(params.seed);
    let cluster = generate_cluster(params, &mut rng)?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_cluster(&mut writer, title, &cluster)?;

    info!("wrote {} bodies to {}", cluster.len(), path.display());
    Ok(cluster)
}
