pub mod simulation;
pub mod configuration;
pub mod playback;
pub mod visualization;

pub use simulation::states::{Body3, Cluster, NVec3};
pub use simulation::params::ClusterParams;
pub use simulation::generator::{generate_cluster, generate_to_file, sample_body, sample_position, cluster_rng, GeneratorError};
pub use simulation::bodies_file::{read_cluster, write_cluster, ClusterFileError};

pub use playback::trajectory::{BodyIndex, Trajectory, TrajectoryError, TrajectoryRecord};
pub use playback::state::{ControlEvent, PlaybackState, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED, SPEED_STEP};
pub use playback::controller::{BodySink, PlaybackController, PositionTable, TickOutcome};
pub use playback::scheduler::{LoopControl, ManualTicks, Scheduler, TickSource, WallClockTicks};

pub use configuration::config::{AppConfig, ConfigError, GeneratorConfig, PlaybackConfig, ViewConfig};

pub use visualization::{headless::{run_headless, LogSink}, terminal::{run_terminal, TerminalView}};
