//! Quenched random energy landscapes.
//!
//! A landscape is logically an infinite map from configuration to energy.
//! The quenched disorder is realized as a pure function of the landscape
//! seed and the state's bit pattern: a per-state generator is seeded from
//! a splitmix64 hash and a single draw is taken from the model's level
//! distribution. Repeated calls are therefore bit-identical for the whole
//! run, independent of visit order or cache pressure.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal};

use crate::state::SpinState;

/// Anything that maps a configuration to a scalar energy, referentially
/// transparent within one run. `&mut self` only for internal caching.
pub trait EnergyLandscape {
    fn energy(&mut self, state: &SpinState) -> f64;
}

/// The two statistical variants of the random energy model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandscapeKind {
    /// Exponential tails: `E = -Exp(beta_c)`, support on negative energies.
    Erem,
    /// Gaussian tails: `E ~ Normal(0, sqrt(N))`.
    Grem,
}

/// A concrete quenched landscape with a bounded memo cache in front of
/// the per-state computation. Eviction cannot change values, so the cache
/// is purely a speed knob sized by the run's memory hint.
pub struct RandomEnergyLandscape {
    kind: LandscapeKind,
    n_spins: usize,
    beta_critical: f64,
    seed: u64,
    cache: HashMap<SpinState, f64>,
    cache_limit: usize,
}

impl RandomEnergyLandscape {
    pub fn new(
        kind: LandscapeKind,
        n_spins: usize,
        beta_critical: f64,
        seed: u64,
        cache_limit: usize,
    ) -> Self {
        assert!(beta_critical > 0.0, "beta_critical must be positive");
        RandomEnergyLandscape {
            kind,
            n_spins,
            beta_critical,
            seed,
            cache: HashMap::new(),
            cache_limit,
        }
    }

    fn sample(&self, state: &SpinState) -> f64 {
        let mut rng = StdRng::seed_from_u64(state_seed(self.seed, state));
        match self.kind {
            LandscapeKind::Erem => {
                // Exp::new only fails on a non-positive rate, which the
                // constructor assert rules out.
                let exp = Exp::new(self.beta_critical).unwrap();
                -exp.sample(&mut rng)
            }
            LandscapeKind::Grem => {
                let sigma = (self.n_spins as f64).sqrt();
                let normal = Normal::new(0.0, sigma).unwrap();
                normal.sample(&mut rng)
            }
        }
    }
}

impl EnergyLandscape for RandomEnergyLandscape {
    fn energy(&mut self, state: &SpinState) -> f64 {
        if let Some(&e) = self.cache.get(state) {
            return e;
        }
        let e = self.sample(state);
        if self.cache.len() < self.cache_limit {
            self.cache.insert(state.clone(), e);
        }
        e
    }
}

/// Derives the per-state generator seed by folding the state's digits
/// into the landscape seed with splitmix64.
fn state_seed(seed: u64, state: &SpinState) -> u64 {
    let mut h = splitmix64(seed);
    for digit in state.to_u64_digits() {
        h = splitmix64(h ^ digit);
    }
    h
}

pub(crate) fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod __test__;
