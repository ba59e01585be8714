//! Run configuration: user-facing knobs, the physics constants derived
//! from them, JSON persistence, and per-tracer file naming.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::landscape::LandscapeKind;
use crate::state::MAX_SPINS;

pub const DEFAULT_GRID_SIZE: usize = 100;
pub const DEFAULT_DW: f64 = 0.5;
pub const DEFAULT_N_TRACERS: usize = 100;
/// `-1` memory hint resolves to this many cached energies.
pub const DEFAULT_CACHE_LIMIT: usize = 1 << 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Landscape {
    #[serde(rename = "EREM")]
    Erem,
    #[serde(rename = "GREM")]
    Grem,
}

impl Landscape {
    pub fn kind(self) -> LandscapeKind {
        match self {
            Landscape::Erem => LandscapeKind::Erem,
            Landscape::Grem => LandscapeKind::Grem,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicsKind {
    Standard,
    Gillespie,
    /// Probe both engines and keep the faster; resolved to a concrete
    /// kind before the pool starts.
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub log10_timesteps: usize,
    /// `10^log10_timesteps`, the simulated-time budget per tracer.
    pub n_timesteps: f64,
    pub n_spins: usize,
    pub beta: f64,
    pub beta_critical: f64,
    pub landscape: Landscape,
    pub dynamics: DynamicsKind,
    /// Energy-cache size hint; `-1` means [`DEFAULT_CACHE_LIMIT`].
    pub memory: i64,
    pub energetic_threshold: f64,
    pub entropic_attractor: f64,
    pub valid_entropic_attractor: bool,
    pub grid_size: usize,
    pub dw: f64,
    pub n_tracers: usize,
    pub use_manual_seed: bool,
    pub seed: u64,
    /// When false the entropic tracker is skipped regardless of validity.
    pub calculate_inherent_structure: bool,
}

impl SimulationParameters {
    /// Builds a parameter set from the user-facing knobs and derives the
    /// physics constants. `seed: None` draws a seed from OS entropy and
    /// marks the run non-reproducible.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        n_spins: usize,
        landscape: Landscape,
        beta: f64,
        log10_timesteps: usize,
        dynamics: DynamicsKind,
        memory: i64,
        n_tracers: usize,
        seed: Option<u64>,
        calculate_inherent_structure: bool,
    ) -> Result<Self, SimError> {
        if !(1..=MAX_SPINS).contains(&n_spins) {
            return Err(SimError::InvalidParameters(format!(
                "n_spins must be in 1..={MAX_SPINS}, got {n_spins}"
            )));
        }
        if beta <= 0.0 {
            return Err(SimError::InvalidParameters(format!(
                "beta must be positive, got {beta}"
            )));
        }
        if log10_timesteps == 0 {
            return Err(SimError::InvalidParameters(
                "log10_timesteps must be positive".into(),
            ));
        }
        if memory < -1 || memory == 0 {
            return Err(SimError::InvalidParameters(format!(
                "memory must be positive or -1, got {memory}"
            )));
        }

        let mut p = SimulationParameters {
            log10_timesteps,
            n_timesteps: 10f64.powi(log10_timesteps as i32),
            n_spins,
            beta,
            beta_critical: 0.0,
            landscape,
            dynamics,
            memory,
            energetic_threshold: 0.0,
            entropic_attractor: 0.0,
            valid_entropic_attractor: false,
            grid_size: DEFAULT_GRID_SIZE,
            dw: DEFAULT_DW,
            n_tracers,
            use_manual_seed: seed.is_some(),
            seed: seed.unwrap_or_else(rand::random),
            calculate_inherent_structure,
        };
        p.derive_thresholds();
        Ok(p)
    }

    /// Fills `beta_critical`, the energetic threshold, and the entropic
    /// attractor from the landscape variant.
    ///
    /// EREM: `bc = 1`, `E_th = -ln(N)/bc`, and the Cammarota-Marinari
    /// attractor `e* = ln(2 - b/bc)/(bc - b)`, defined on `bc < b < 2bc`.
    /// GREM (levels `Normal(0, sqrt(N))`): `bc = sqrt(2 ln 2)`,
    /// `E_th = -sqrt(2 N ln N)` (the typical deepest of `N` neighbors),
    /// and the equilibrium energy `e* = -b N`, defined on `b < bc`.
    fn derive_thresholds(&mut self) {
        let n = self.n_spins as f64;
        match self.landscape {
            Landscape::Erem => {
                self.beta_critical = 1.0;
                self.energetic_threshold = -n.ln() / self.beta_critical;
                let bc = self.beta_critical;
                let b = self.beta;
                if b > bc && b < 2.0 * bc {
                    self.entropic_attractor = (2.0 - b / bc).ln() / (bc - b);
                    self.valid_entropic_attractor = true;
                } else {
                    self.entropic_attractor = 0.0; // placeholder, guarded by the validity flag
                    self.valid_entropic_attractor = false;
                }
            }
            Landscape::Grem => {
                self.beta_critical = (2.0 * 2f64.ln()).sqrt();
                self.energetic_threshold = -(2.0 * n * n.ln()).sqrt();
                if self.beta < self.beta_critical {
                    self.entropic_attractor = -self.beta * n;
                    self.valid_entropic_attractor = true;
                } else {
                    self.entropic_attractor = 0.0; // placeholder, guarded by the validity flag
                    self.valid_entropic_attractor = false;
                }
            }
        }
    }

    /// The entropic threshold the basin observable should use, or `None`
    /// when invalid or explicitly skipped.
    pub fn entropic_threshold(&self) -> Option<f64> {
        (self.calculate_inherent_structure && self.valid_entropic_attractor)
            .then_some(self.entropic_attractor)
    }

    /// Resolved energy-cache capacity.
    pub fn cache_limit(&self) -> usize {
        if self.memory == -1 {
            DEFAULT_CACHE_LIMIT
        } else {
            self.memory as usize
        }
    }

    pub fn to_json_file(&self, path: &Path) -> Result<(), SimError> {
        let out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(out, self)?;
        Ok(())
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SimError> {
        let file = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(file)?)
    }
}

/// Per-tracer output paths, keyed by a zero-padded tracer index.
#[derive(Debug, Clone)]
pub struct FileNames {
    pub index: String,
    pub psi_config: PathBuf,
    pub psi_basin_e_dwell: PathBuf,
    pub psi_basin_e_unique: PathBuf,
    pub psi_basin_s_dwell: PathBuf,
    pub psi_basin_s_unique: PathBuf,
    pub summary_json: PathBuf,
}

impl FileNames {
    pub fn new(data_dir: &Path, tracer: usize) -> Self {
        let index = format!("{tracer:08}");
        FileNames {
            psi_config: data_dir.join(format!("{index}_psi_config.txt")),
            psi_basin_e_dwell: data_dir.join(format!("{index}_psi_basin_E_dwell.txt")),
            psi_basin_e_unique: data_dir.join(format!("{index}_psi_basin_E_unique.txt")),
            psi_basin_s_dwell: data_dir.join(format!("{index}_psi_basin_S_dwell.txt")),
            psi_basin_s_unique: data_dir.join(format!("{index}_psi_basin_S_unique.txt")),
            summary_json: data_dir.join(format!("{index}.json")),
            index,
        }
    }
}
