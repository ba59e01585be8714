//! remsim simulates the relaxation of a binary spin system over a quenched
//! random energy landscape (exponential or Gaussian random energy model).
//!
//! The crate is organized around two tightly coupled engines: the dynamics
//! engine ([`dynamics`]) advances an `N`-spin configuration through a
//! continuous-time jump process (or the discrete Metropolis variant), and
//! the observable engines ([`obs`]) bucket the resulting trajectory on
//! logarithmic time grids and classify it into energy/entropy basins.
//! Everything else (parameters, grids, the tracer pool) is glue around
//! those two.

pub mod dynamics;
pub mod error;
pub mod grids;
pub mod landscape;
pub mod obs;
pub mod params;
pub mod runner;
pub mod state;
pub mod utils;

pub use error::{DynamicsError, SimError};
pub use state::{SpinState, MAX_SPINS};
