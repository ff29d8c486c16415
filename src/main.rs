use anyhow::Context;
use clap::Parser;
use proximity_embedding::adapters::outbound::{init_run_logger, open_output, OutputFormat};
use proximity_embedding::application::SimulationService;
use proximity_embedding::domains::logger::DynLogger;
use proximity_embedding::domains::scenario::ScenarioKind;
use proximity_embedding::Config;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Simulates agents following two paths of a scenario, then reconstructs their
/// positions from proximity alone (who is within detection range of whom, plus
/// fixed anchors along the paths). The resulting trajectories are written to
/// the output, one agent per line.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Scenario to simulate: lane, sinus, parallel, crossing or divergent
    scenario: ScenarioKind,

    /// TOML configuration; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Output format: text or geojson
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Write the simulated trajectories without embedding them
    #[arg(long)]
    skip_embedding: bool,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Agents assigned to each path
    #[arg(short = 'n', long)]
    num_nodes: Option<usize>,

    /// Number of simulated timesteps
    #[arg(short = 't', long)]
    timesteps: Option<u64>,

    /// Amplitude of the sinus scenario
    #[arg(long)]
    sinus_amplitude: Option<f64>,

    /// Distance between the lanes of the parallel scenario
    #[arg(long)]
    parallel_distance: Option<f64>,

    /// Angle between the lanes of the crossing scenario, in degrees
    #[arg(long)]
    crossing_angle: Option<f64>,

    /// Anchors placed along each path
    #[arg(long)]
    anchors_per_path: Option<usize>,

    /// Detection radius of the agents
    #[arg(long)]
    detection_radius: Option<f64>,

    /// Log file, in addition to stderr
    #[arg(long)]
    log_file: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        let sim = &mut config.simulation;
        sim.scenario = self.scenario;
        if let Some(v) = self.seed {
            sim.seed = v;
        }
        if let Some(v) = self.num_nodes {
            sim.num_nodes = v;
        }
        if let Some(v) = self.timesteps {
            sim.timesteps = v;
        }
        if let Some(v) = self.sinus_amplitude {
            sim.sinus_amplitude = v;
        }
        if let Some(v) = self.parallel_distance {
            sim.parallel_distance = v;
        }
        if let Some(v) = self.crossing_angle {
            sim.crossing_angle = v;
        }
        if let Some(v) = self.anchors_per_path {
            sim.anchors_per_path = v;
        }
        if let Some(v) = self.detection_radius {
            config.embedding.detection_radius = v;
        }
        if self.skip_embedding {
            config.embedding.skip = true;
        }
        if let Some(v) = &self.log_file {
            config.logging.file = Some(v.clone());
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Tracing goes to stderr and leaves the `log` facade to the file logger.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);

    let logger = init_run_logger(config.logging.file.as_deref());
    let result = run(&cli, config, logger.clone());
    if let Err(e) = &result {
        logger.error(&format!("{:#}", e));
    }
    logger.flush();
    result
}

fn run(cli: &Cli, config: Config, logger: DynLogger) -> anyhow::Result<()> {
    let service = SimulationService::new(config, logger.clone())?;
    let mut rng = ChaCha8Rng::seed_from_u64(service.config().simulation.seed);

    let report = service.run(&mut rng)?;
    info!(
        agents = report.output.len(),
        samples = report.output.sample_count(),
        "run completed"
    );

    let mut out = open_output(&cli.output)?;
    cli.format
        .writer()
        .write_trajectories(&mut out, &report.comments(service.config()), &report.output)
        .with_context(|| format!("writing trajectories to {}", cli.output))?;
    out.flush()?;
    logger.info(&format!(
        "wrote {} trajectories as {}",
        report.output.len(),
        cli.format
    ));

    Ok(())
}
