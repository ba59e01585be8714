//! Trajectory observables.
//!
//! Observables consume the (state, waiting time, energy) stream the
//! dynamics engine produces and accumulate counters against precomputed
//! logarithmic time grids. They never see the engine itself; the tracer
//! loop feeds them after every step.

pub mod psi_basin;
pub mod psi_config;

pub use psi_basin::{BasinTracker, PsiBasin};
pub use psi_config::PsiConfig;

use std::fmt::Display;
use std::io::{self, Write};

/// Writes one value per line in grid order, the shared plain-text format
/// of every counter artifact.
pub(crate) fn write_lines<W: Write, T: Display>(out: &mut W, values: &[T]) -> io::Result<()> {
    for v in values {
        writeln!(out, "{v}")?;
    }
    Ok(())
}
