//! The tracer pool.
//!
//! One tracer is one independent realization: its own disorder, its own
//! generator, its own engine and observables, its own output files.
//! Tracers never communicate; the pool is a rayon parallel iterator and a
//! failed tracer is logged without disturbing its siblings.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::dynamics::{DynamicsEngine, GillespieEngine, MetropolisEngine};
use crate::error::SimError;
use crate::grids::{energy_grid_logspace, load_grid, pi_grids, save_grid};
use crate::landscape::{splitmix64, RandomEnergyLandscape};
use crate::obs::{PsiBasin, PsiConfig};
use crate::params::{DynamicsKind, FileNames, SimulationParameters};

/// The precomputed grids every tracer bins against.
#[derive(Debug, Clone)]
pub struct Grids {
    pub energy: Vec<f64>,
    pub pi1: Vec<f64>,
    pub pi2: Vec<f64>,
}

impl Grids {
    /// Reuses the grids a previous run persisted into the same output
    /// tree when all three files load with this run's point count, so a
    /// rerun bins against identical grids; otherwise generates fresh
    /// grids and persists them.
    pub fn load_or_generate(grid_dir: &Path, p: &SimulationParameters) -> Result<Self, SimError> {
        let energy_path = grid_dir.join("energy.txt");
        let pi1_path = grid_dir.join("pi1.txt");
        let pi2_path = grid_dir.join("pi2.txt");

        if energy_path.exists() && pi1_path.exists() && pi2_path.exists() {
            let expected = p.grid_size + 1;
            let energy = load_grid(&energy_path);
            let pi1 = load_grid(&pi1_path);
            let pi2 = load_grid(&pi2_path);
            if energy.len() == expected && pi1.len() == expected && pi2.len() == expected {
                info!(dir = %grid_dir.display(), "reusing persisted sampling grids");
                return Ok(Grids { energy, pi1, pi2 });
            }
            warn!(
                dir = %grid_dir.display(),
                "persisted grids do not match this run's point count; regenerating"
            );
        }

        let energy = energy_grid_logspace(p.log10_timesteps, p.grid_size);
        let (pi1, pi2) = pi_grids(p.log10_timesteps, p.dw, p.grid_size);
        save_grid(&energy, &energy_path)?;
        save_grid(&pi1, &pi1_path)?;
        save_grid(&pi2, &pi2_path)?;
        Ok(Grids { energy, pi1, pi2 })
    }

    /// A tracer binning against an empty grid would record nothing;
    /// refuse to start instead.
    pub fn validate(&self) -> Result<(), SimError> {
        for (grid, name) in [
            (&self.energy, "energy"),
            (&self.pi1, "pi1"),
            (&self.pi2, "pi2"),
        ] {
            if grid.is_empty() {
                return Err(SimError::EmptyGrid(name));
            }
        }
        Ok(())
    }
}

/// What one finished tracer reports back.
#[derive(Debug, Clone, Serialize)]
pub struct TracerSummary {
    pub tracer: usize,
    pub steps: u64,
    pub simulated_time: f64,
    pub final_energy: f64,
    pub wall_seconds: f64,
    pub psi_config_overflow: u64,
}

/// Counter rewrite cadence, in steps. Between checkpoints the
/// accumulators live in memory; a crash loses at most one interval.
const CHECKPOINT_INTERVAL: u64 = 1_000_000;

fn build_engine(
    p: &SimulationParameters,
    kind: DynamicsKind,
    tracer_seed: u64,
) -> Box<dyn DynamicsEngine> {
    // The disorder seed is decorrelated from the trajectory seed so the
    // landscape realization and the walk over it are independent streams.
    let landscape = RandomEnergyLandscape::new(
        p.landscape.kind(),
        p.n_spins,
        p.beta_critical,
        splitmix64(tracer_seed),
        p.cache_limit(),
    );
    match kind {
        DynamicsKind::Gillespie => {
            Box::new(GillespieEngine::new(p.n_spins, p.beta, landscape, tracer_seed))
        }
        DynamicsKind::Standard => {
            Box::new(MetropolisEngine::new(p.n_spins, p.beta, landscape, tracer_seed))
        }
        DynamicsKind::Auto => unreachable!("auto dynamics must be resolved before engines are built"),
    }
}

fn write_observables(
    fnames: &FileNames,
    psi_config: &PsiConfig,
    psi_basin: &PsiBasin,
) -> Result<(), SimError> {
    // Output failures are fatal to the tracer: without these files the
    // run recorded nothing.
    psi_config.write_to(&mut BufWriter::new(File::create(&fnames.psi_config)?))?;
    psi_basin
        .energetic()
        .write_dwell_to(&mut BufWriter::new(File::create(&fnames.psi_basin_e_dwell)?))?;
    psi_basin
        .energetic()
        .write_unique_to(&mut BufWriter::new(File::create(&fnames.psi_basin_e_unique)?))?;
    if psi_basin.entropic().is_enabled() {
        psi_basin
            .entropic()
            .write_dwell_to(&mut BufWriter::new(File::create(&fnames.psi_basin_s_dwell)?))?;
        psi_basin
            .entropic()
            .write_unique_to(&mut BufWriter::new(File::create(&fnames.psi_basin_s_unique)?))?;
    }
    Ok(())
}

/// Runs a single tracer to its simulated-time budget and persists its
/// counters. The dynamics kind must already be concrete.
pub fn run_tracer(
    p: &SimulationParameters,
    grids: &Grids,
    data_dir: &Path,
    tracer: usize,
) -> Result<TracerSummary, SimError> {
    grids.validate()?;
    let started = Instant::now();
    let tracer_seed = p.seed.wrapping_add(tracer as u64);
    let mut engine = build_engine(p, p.dynamics, tracer_seed);

    let mut psi_config = PsiConfig::new(grids.energy.clone());
    let mut psi_basin = PsiBasin::new(
        grids.pi1.clone(),
        grids.pi2.clone(),
        p.energetic_threshold,
        p.entropic_threshold(),
    );
    let fnames = FileNames::new(data_dir, tracer);

    let mut simulated_time = 0.0;
    let mut steps: u64 = 0;
    while simulated_time < p.n_timesteps {
        let waiting_time = engine.step()?;
        simulated_time += waiting_time;
        psi_config.step(waiting_time);
        psi_basin.step(waiting_time, engine.state(), engine.energy());
        steps += 1;
        if steps % CHECKPOINT_INTERVAL == 0 {
            write_observables(&fnames, &psi_config, &psi_basin)?;
        }
    }
    write_observables(&fnames, &psi_config, &psi_basin)?;

    let summary = TracerSummary {
        tracer,
        steps,
        simulated_time,
        final_energy: engine.energy(),
        wall_seconds: started.elapsed().as_secs_f64(),
        psi_config_overflow: psi_config.out_of_counter(),
    };
    serde_json::to_writer_pretty(BufWriter::new(File::create(&fnames.summary_json)?), &summary)
        .map_err(SimError::from)?;
    Ok(summary)
}

/// Fans the tracers out across the rayon pool. Per-tracer failures are
/// logged and returned, never propagated to siblings.
pub fn execute_pool(
    p: &SimulationParameters,
    grids: &Grids,
    data_dir: &Path,
) -> Vec<Result<TracerSummary, SimError>> {
    (0..p.n_tracers)
        .into_par_iter()
        .map(|tracer| {
            let result = run_tracer(p, grids, data_dir, tracer);
            match &result {
                Ok(s) => info!(
                    tracer,
                    steps = s.steps,
                    wall_seconds = format!("{:.2}", s.wall_seconds),
                    "tracer finished"
                ),
                Err(e) => error!(tracer, error = %e, "tracer failed"),
            }
            result
        })
        .collect()
}

/// Simulated time each probe engine must cover when resolving `auto`.
const PROBE_SIMULATED_TIME: f64 = 1e3;
/// Step cap so a pathological probe cannot spin forever.
const PROBE_MAX_STEPS: u64 = 200_000;

/// Resolves `auto` dynamics by timing a short probe run of each engine
/// over the same simulated-time span and keeping the faster one.
pub fn auto_select_dynamics(p: &SimulationParameters) -> Result<DynamicsKind, SimError> {
    if p.dynamics != DynamicsKind::Auto {
        return Ok(p.dynamics);
    }
    let budget = PROBE_SIMULATED_TIME.min(p.n_timesteps);

    let mut probe = |kind: DynamicsKind| -> Result<f64, SimError> {
        let mut engine = build_engine(p, kind, p.seed);
        let started = Instant::now();
        let mut simulated = 0.0;
        let mut steps = 0;
        while simulated < budget && steps < PROBE_MAX_STEPS {
            simulated += engine.step()?;
            steps += 1;
        }
        Ok(started.elapsed().as_secs_f64())
    };

    let standard = probe(DynamicsKind::Standard)?;
    let gillespie = probe(DynamicsKind::Gillespie)?;
    let chosen = if gillespie <= standard {
        DynamicsKind::Gillespie
    } else {
        DynamicsKind::Standard
    };
    info!(
        standard_seconds = format!("{standard:.3}"),
        gillespie_seconds = format!("{gillespie:.3}"),
        ?chosen,
        "auto dynamics resolved"
    );
    Ok(chosen)
}
