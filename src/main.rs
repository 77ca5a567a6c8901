use clusterplay::{generate_to_file, read_cluster, run_headless, run_terminal, AppConfig};
use clusterplay::configuration::config::DEFAULT_SCENARIO;
use clusterplay::{PlaybackController, PlaybackState, Trajectory, WallClockTicks};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Generate N-body cluster initial conditions and replay trajectories")]
struct Args {
    /// Scenario YAML: a path, or a file name under the crate's `scenarios/` directory.
    /// Without it `scenarios/cluster.yaml` is used if present, else built-in defaults
    #[arg(short, long)]
    file_name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample a cluster and write the bodies file
    Generate {
        #[arg(short = 'n', long)]
        n_bodies: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Replay a trajectory file
    Play {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long)]
        speed: Option<u32>,
        /// Log positions instead of drawing
        #[arg(long)]
        headless: bool,
        /// Stop after this many ticks (headless only)
        #[arg(long, requires = "headless")]
        ticks: Option<u64>,
    },
}

// load here to keep main clean
fn load_config(file_name: Option<&str>) -> Result<AppConfig> {
    let scenarios_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    AppConfig::resolve(file_name, &scenarios_dir).with_context(|| match file_name {
        Some(name) => format!("failed to load scenario {name}"),
        None => format!("failed to load scenario {}", scenarios_dir.join(DEFAULT_SCENARIO).display()),
    })
}

fn init_logging(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let interactive = matches!(args.command, Command::Play { headless: false, .. });
    init_logging(if interactive { "warn" } else { "info" });

    let mut cfg = load_config(args.file_name.as_deref())?;

    match args.command {
        Command::Generate { n_bodies, output, seed } => {
            let gen_cfg = &mut cfg.generator;
            if let Some(n) = n_bodies {
                gen_cfg.n_bodies = n;
            }
            if let Some(o) = output {
                gen_cfg.output = o;
            }
            if seed.is_some() {
                gen_cfg.seed = seed;
            }

            generate_to_file(&gen_cfg.params(), &gen_cfg.title, &gen_cfg.output)
                .with_context(|| format!("failed to write {}", gen_cfg.output.display()))?;

            // summarise what actually landed on disk
            let file = File::open(&gen_cfg.output)
                .with_context(|| format!("failed to reopen {}", gen_cfg.output.display()))?;
            let written = read_cluster(BufReader::new(file))
                .with_context(|| format!("failed to read back {}", gen_cfg.output.display()))?;
            log::info!(
                "{} bodies, extent {:.3e} m, total mass {:.3e} kg",
                written.len(),
                written.extent(),
                written.total_mass()
            );
            println!("Success: '{}' created.", gen_cfg.output.display());
        }
        Command::Play { input, speed, headless, ticks } => {
            let input = input.unwrap_or(cfg.playback.input);
            let trajectory = Trajectory::load(&input)
                .with_context(|| format!("failed to load trajectory {}", input.display()))?;

            let state = PlaybackState::with_speed(speed.unwrap_or(cfg.playback.speed));
            let mut controller = PlaybackController::with_state(trajectory, state);

            if headless {
                run_headless(&mut controller, WallClockTicks::new(), ticks);
            } else {
                run_terminal(controller, &cfg.view).context("terminal viewer failed")?;
            }
        }
    }

    Ok(())
}
