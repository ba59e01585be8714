//! Precomputed logarithmic sampling grids and their plain-text
//! persistence: one `%e`-formatted value per line, in grid order.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::warn;

/// Log-spaced energy/time grid: `n + 1` points from 1 to `10^T`.
pub fn energy_grid_logspace(log10_timesteps: usize, n_gridpoints: usize) -> Vec<f64> {
    let delta = log10_timesteps as f64 / n_gridpoints as f64;
    (0..=n_gridpoints)
        .map(|i| 10f64.powf(i as f64 * delta))
        .collect()
}

/// The two basin-dwell grids, derived from the same exponent and the
/// aging parameter `dw`: the first spans 1 to `10^T / (dw + 1)`, the
/// second is the first scaled by `dw + 1`.
pub fn pi_grids(log10_timesteps: usize, dw: f64, n_gridpoints: usize) -> (Vec<f64>, Vec<f64>) {
    let n_mc = 10f64.powi(log10_timesteps as i32);
    let tw_max = n_mc / (dw + 1.0);
    let delta = tw_max.log10() / n_gridpoints as f64;

    let v1: Vec<f64> = (0..=n_gridpoints)
        .map(|i| 10f64.powf(i as f64 * delta))
        .collect();
    let v2: Vec<f64> = v1.iter().map(|v| v * (dw + 1.0)).collect();
    (v1, v2)
}

/// Writes a grid to disk. Output failures here are fatal to the run:
/// without the grid file no observable can be post-processed.
pub fn save_grid(grid: &[f64], path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for v in grid {
        writeln!(out, "{v:e}")?;
    }
    out.flush()
}

/// Loads a grid from disk, the read half of the resume path: a rerun
/// into the same output tree bins against the persisted grids instead
/// of regenerating them. A missing or unreadable file degrades to an
/// empty grid with a warning; callers that cannot proceed without one
/// decide that themselves.
pub fn load_grid(path: &Path) -> Vec<f64> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "grid file unreadable, proceeding with an empty grid");
            return Vec::new();
        }
    };
    let mut grid = Vec::new();
    for line in BufReader::new(file).lines() {
        match line {
            Ok(l) => {
                let l = l.trim();
                if l.is_empty() {
                    continue;
                }
                match l.parse::<f64>() {
                    Ok(v) => grid.push(v),
                    Err(e) => {
                        warn!(path = %path.display(), line = l, error = %e, "skipping unparseable grid line");
                    }
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "grid read aborted");
                break;
            }
        }
    }
    grid
}
