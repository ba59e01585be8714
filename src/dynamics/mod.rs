//! Dynamics engines.
//!
//! An engine owns the current configuration, its energy, the landscape,
//! and an exclusive random generator, and exposes a single mutating
//! operation: advance by one event and return the elapsed waiting time.
//! Concrete engines differ only in the transition rule; the externally
//! observed waiting-time sum is always a valid physical clock.

pub mod gillespie;
pub mod metropolis;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::DynamicsError;
use crate::landscape::EnergyLandscape;
use crate::state::{SpinState, MAX_SPINS};

pub use gillespie::GillespieEngine;
pub use metropolis::MetropolisEngine;

/// The engine contract. Two logical states, idle and stepped; no terminal
/// state. A step fully completes (state and energy mutated in place)
/// before it returns.
pub trait DynamicsEngine {
    /// Advances the system by one event and returns the elapsed waiting
    /// time. Rejection, if a concrete engine has any, is internal; the
    /// returned time is always accepted by the caller.
    fn step(&mut self) -> Result<f64, DynamicsError>;

    fn state(&self) -> &SpinState;

    fn energy(&self) -> f64;
}

/// State shared by every concrete engine: configuration, energy,
/// landscape, inverse temperature, and the engine's own generator.
pub(crate) struct SpinSystem<L: EnergyLandscape> {
    pub(crate) n_spins: usize,
    pub(crate) beta: f64,
    pub(crate) state: SpinState,
    pub(crate) energy: f64,
    pub(crate) landscape: L,
    pub(crate) rng: StdRng,
}

impl<L: EnergyLandscape> SpinSystem<L> {
    /// Seeds the generator, draws a uniform random initial configuration,
    /// and evaluates its energy.
    pub(crate) fn new(n_spins: usize, beta: f64, mut landscape: L, seed: u64) -> Self {
        assert!(
            (1..=MAX_SPINS).contains(&n_spins),
            "n_spins must be in 1..={MAX_SPINS}"
        );
        assert!(beta > 0.0, "inverse temperature must be positive");
        let mut rng = StdRng::seed_from_u64(seed);
        let bits: Vec<u8> = (0..n_spins).map(|_| rng.gen_range(0..=1u8)).collect();
        let state = SpinState::from_bits(&bits);
        let energy = landscape.energy(&state);
        SpinSystem {
            n_spins,
            beta,
            state,
            energy,
            landscape,
            rng,
        }
    }

    /// The Metropolis acceptance factor for an energy change, written so
    /// a NaN delta can never be masked into an acceptance.
    pub(crate) fn rate(&self, delta_e: f64) -> f64 {
        if delta_e <= 0.0 {
            1.0
        } else {
            (-self.beta * delta_e).exp()
        }
    }
}

#[cfg(test)]
mod __test__;
