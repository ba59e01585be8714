use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use remsim::params::{
    DynamicsKind, Landscape, SimulationParameters, DEFAULT_N_TRACERS,
};
use remsim::runner::{auto_select_dynamics, execute_pool, Grids};
use remsim::utils::{mean_vector, median_vector, variance_vector};
use remsim::MAX_SPINS;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LandscapeArg {
    Erem,
    Grem,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DynamicsArg {
    Standard,
    Gillespie,
    Auto,
}

/// Simulates binary spin systems relaxing over random energy landscapes.
#[derive(Parser, Debug)]
#[command(name = "remsim", version, about)]
struct Cli {
    /// Number of binary spins; bounded by the fixed bit-vector width.
    #[arg(short = 'N', long)]
    n_spins: usize,

    /// Landscape: exponential (EREM) or Gaussian (GREM) random energy
    /// model.
    #[arg(short, long, value_enum)]
    landscape: LandscapeArg,

    /// Inverse temperature.
    #[arg(short, long)]
    beta: f64,

    /// Simulated-time budget as a log10 exponent: t=7 runs to 10^7.
    #[arg(short = 't', long)]
    log10_timesteps: usize,

    /// Energy-cache size hint; -1 uses the default of 2^25 entries.
    #[arg(short, long, default_value_t = -1)]
    memory: i64,

    /// Dynamics: standard flips one spin per unit time with Metropolis
    /// acceptance; gillespie computes all exit rates and always moves;
    /// auto probes both and keeps the faster.
    #[arg(short, long, value_enum, default_value_t = DynamicsArg::Auto)]
    dynamics: DynamicsArg,

    /// Number of independent tracer simulations.
    #[arg(short, long, default_value_t = DEFAULT_N_TRACERS)]
    n_tracers: usize,

    /// Seed for reproducible runs; leave unset for entropy seeding.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the inherent-structure (entropic basin) observables.
    #[arg(long)]
    skip_entropic: bool,

    /// Output root; data/ and grids/ are created beneath it.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    if cli.n_spins == 0 || cli.n_spins > MAX_SPINS {
        bail!("--n-spins must be between 1 and {MAX_SPINS}");
    }

    let landscape = match cli.landscape {
        LandscapeArg::Erem => Landscape::Erem,
        LandscapeArg::Grem => Landscape::Grem,
    };
    let dynamics = match cli.dynamics {
        DynamicsArg::Standard => DynamicsKind::Standard,
        DynamicsArg::Gillespie => DynamicsKind::Gillespie,
        DynamicsArg::Auto => DynamicsKind::Auto,
    };

    let mut params = SimulationParameters::build(
        cli.n_spins,
        landscape,
        cli.beta,
        cli.log10_timesteps,
        dynamics,
        cli.memory,
        cli.n_tracers,
        cli.seed,
        !cli.skip_entropic,
    )?;
    if !params.use_manual_seed {
        warn!(seed = params.seed, "no --seed given; this run is not reproducible");
    }

    let data_dir = cli.output.join("data");
    let grid_dir = cli.output.join("grids");
    fs::create_dir_all(&data_dir).context("creating data directory")?;
    fs::create_dir_all(&grid_dir).context("creating grid directory")?;

    let grids = Grids::load_or_generate(&grid_dir, &params).context("preparing sampling grids")?;

    params.dynamics = auto_select_dynamics(&params)?;
    params
        .to_json_file(&data_dir.join("params.json"))
        .context("persisting run parameters")?;
    info!(
        n_spins = params.n_spins,
        beta = params.beta,
        landscape = ?params.landscape,
        dynamics = ?params.dynamics,
        n_tracers = params.n_tracers,
        budget = params.n_timesteps,
        "starting tracer pool"
    );

    let results = execute_pool(&params, &grids, &data_dir);
    let summaries: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let failed = results.len() - summaries.len();
    if summaries.is_empty() {
        bail!("all {failed} tracers failed");
    }

    let energies: Vec<f64> = summaries.iter().map(|s| s.final_energy).collect();
    let walls: Vec<f64> = summaries.iter().map(|s| s.wall_seconds).collect();
    info!(
        finished = summaries.len(),
        failed,
        mean_final_energy = mean_vector(&energies),
        median_final_energy = median_vector(&energies),
        final_energy_variance = variance_vector(&energies),
        mean_wall_seconds = mean_vector(&walls),
        "run complete"
    );
    Ok(())
}
