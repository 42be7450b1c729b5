use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shared::Mode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use antrails::config::{Figure, SimulationConfig, load_config, window_conf};
use antrails::engine::Viewer;
use antrails::report::{RunReport, save_snapshot};
use antrails::simulation::Simulation;

/// Command-line arguments for antrails.
#[derive(Parser)]
#[command(name = "antrails", version, about = "Ant trail formation on a square lattice")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run headless and print the final follower/explorer counts.
    Run {
        #[command(flatten)]
        overrides: Overrides,

        /// Write the per-step report as JSON.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the final field and agents as a bincode snapshot.
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Watch the run in a window.
    View {
        #[command(flatten)]
        overrides: Overrides,

        /// Draw agents in this mode (explorer or follower) in a highlight color.
        #[arg(long)]
        highlight: Option<Mode>,
    },
}

#[derive(Args)]
struct Overrides {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    steps: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Published run preset (sets the fidelity).
    #[arg(long, value_enum)]
    figure: Option<Figure>,

    #[arg(long)]
    fidelity: Option<u32>,

    #[arg(long)]
    deposition: Option<f32>,

    #[arg(long)]
    side_length: Option<i64>,
}

impl Overrides {
    fn resolve(&self) -> Result<SimulationConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(figure) = self.figure {
            config.figure = Some(figure);
        }
        if let Some(fidelity) = self.fidelity {
            config.fidelity = Some(fidelity);
        }
        if let Some(deposition) = self.deposition {
            config.deposition = deposition;
        }
        if let Some(side_length) = self.side_length {
            config.side_length = side_length;
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_headless(
    overrides: &Overrides,
    report: Option<PathBuf>,
    snapshot: Option<PathBuf>,
) -> Result<()> {
    let config = overrides.resolve()?;
    let params = config.validate().context("invalid simulation parameters")?;
    let mut sim = Simulation::new(params)?;
    let counts = sim.run();

    println!(
        "step {}: {} followers, {} explorers",
        sim.current_step(),
        counts.following,
        counts.exploring
    );

    if let Some(path) = report {
        let report = RunReport::from_simulation(&sim);
        if let Some((step, peak)) = report.peak_followers() {
            info!(step, followers = peak, "follower peak");
        }
        report.save_json(&path)?;
    }
    if let Some(path) = snapshot {
        save_snapshot(&sim.snapshot(), &path)?;
    }
    Ok(())
}

fn run_viewer(overrides: &Overrides, highlight: Option<Mode>) -> Result<()> {
    let config = overrides.resolve()?;
    let params = config.validate().context("invalid simulation parameters")?;
    let title = match &params.label {
        Some(label) => format!("antrails - {label}"),
        None => "antrails".to_string(),
    };
    let sim = Simulation::new(params)?;
    let viewer = Viewer::new(sim, &config.viewer, highlight);

    macroquad::Window::from_config(window_conf(&config.viewer, &title), async move {
        viewer.run().await;
    });
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Run {
            overrides,
            report,
            snapshot,
        } => run_headless(&overrides, report, snapshot),
        Commands::View {
            overrides,
            highlight,
        } => run_viewer(&overrides, highlight),
    };

    if let Err(e) = outcome {
        error!("{e:#}");
        std::process::exit(1);
    }
}
