//! Configuration types for loading a cluster scenario from YAML.
//!
//! A scenario file has three independent sections:
//!
//! - [`GeneratorConfig`] – how the initial cluster is sampled and where it is written
//! - [`PlaybackConfig`]  – which trajectory file is replayed and at what speed
//! - [`ViewConfig`]      – terminal viewer settings (scene scale, trail length)
//! - [`AppConfig`]       – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! Every field is optional, missing values fall back to the defaults shown:
//!
//! ```yaml
//! generator:
//!   n_bodies: 100
//!   radius: 1.0e11            # sphere radius in meters
//!   velocity_bound: 1.0e4     # per-component velocity bound in m/s
//!   mass_log_range: [24.0, 26.0]
//!   seed: 42                  # omit for a fresh entropy seed
//!   output: "bodies.csv"
//!   title: "Cluster Simulation"
//!
//! playback:
//!   input: "trajectories.csv"
//!   speed: 60
//!
//! view:
//!   scene_range: 5.0e11
//!   trail_len: 100
//! ```
//!
//! The generator section is mapped into [`ClusterParams`] before sampling,
//! the same way a scenario is mapped into runtime structs before a run.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

use crate::playback::state::DEFAULT_SPEED;
use crate::simulation::params::ClusterParams;

/// Scenario loaded when no file is named on the command line
pub const DEFAULT_SCENARIO: &str = "cluster.yaml";

/// Errors raised while reading a scenario file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Initial-condition sampling settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    pub n_bodies: usize,             // number of bodies to sample
    pub radius: f64,                 // cluster radius in meters
    pub velocity_bound: f64,         // |v_i| bound per component in m/s
    pub mass_log_range: (f64, f64),  // log10 mass range in kg
    pub seed: Option<u64>,           // deterministic seed, None = entropy
    pub output: PathBuf,             // bodies file written for the integrator
    pub title: String,               // dataset name put in the header line
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_bodies: 100,
            radius: 1.0e11,
            velocity_bound: 1.0e4,
            mass_log_range: (24.0, 26.0),
            seed: None,
            output: PathBuf::from("bodies.csv"),
            title: String::from("Cluster Simulation"),
        }
    }
}

impl GeneratorConfig {
    /// Runtime sampling parameters for this section
    pub fn params(&self) -> ClusterParams {
        ClusterParams {
            n_bodies: self.n_bodies,
            radius: self.radius,
            velocity_bound: self.velocity_bound,
            mass_log_range: self.mass_log_range,
            seed: self.seed,
        }
    }
}

/// Trajectory playback settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PlaybackConfig {
    pub input: PathBuf, // trajectory file produced by the integrator
    pub speed: u32,     // initial frames per second
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trajectories.csv"),
            speed: DEFAULT_SPEED,
        }
    }
}

/// Terminal viewer settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ViewConfig {
    pub scene_range: f64, // world half-extent visible at zoom 1, meters
    pub trail_len: usize, // positions kept per body trail
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scene_range: 5.0e11,
            trail_len: 100,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub playback: PlaybackConfig,
    pub view: ViewConfig,
}

impl AppConfig {
    /// Parse a scenario from YAML text. An empty document yields defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a scenario file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Resolve and load the scenario named on the command line.
    ///
    /// An explicit `file_name` is used as a path if it exists, otherwise looked
    /// up under `scenarios_dir`; if neither exists that is an error. With no
    /// name, `scenarios_dir/cluster.yaml` is loaded when present and defaults
    /// are used when it is not.
    pub fn resolve(file_name: Option<&str>, scenarios_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = match file_name {
            Some(name) => {
                let direct = PathBuf::from(name);
                if direct.exists() {
                    direct
                } else {
                    scenarios_dir.join(name)
                }
            }
            None => {
                let fallback = scenarios_dir.join(DEFAULT_SCENARIO);
                if !fallback.exists() {
                    warn!("{} not found, using default scenario", fallback.display());
                    return Ok(Self::default());
                }
                fallback
            }
        };

        Self::load(config_path)
    }
}
