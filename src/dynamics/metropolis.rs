//! The "standard" discrete-time dynamics: one proposed spin flip per unit
//! of time with the Metropolis acceptance criterion. A rejected proposal
//! wastes the tick (no move), but the tick is still elapsed time, so the
//! returned waiting time is always exactly 1.

use rand::Rng;

use super::{DynamicsEngine, SpinSystem};
use crate::error::DynamicsError;
use crate::landscape::EnergyLandscape;
use crate::state::SpinState;

pub struct MetropolisEngine<L: EnergyLandscape> {
    sys: SpinSystem<L>,
}

impl<L: EnergyLandscape> MetropolisEngine<L> {
    pub fn new(n_spins: usize, beta: f64, landscape: L, seed: u64) -> Self {
        MetropolisEngine {
            sys: SpinSystem::new(n_spins, beta, landscape, seed),
        }
    }
}

impl<L: EnergyLandscape> DynamicsEngine for MetropolisEngine<L> {
    fn step(&mut self) -> Result<f64, DynamicsError> {
        let k = self.sys.rng.gen_range(0..self.sys.n_spins);
        let proposed = self.sys.state.flip_bit(k, self.sys.n_spins);
        let proposed_energy = self.sys.landscape.energy(&proposed);
        let delta_e = proposed_energy - self.sys.energy;

        let acceptance = self.sys.rate(delta_e);
        if acceptance >= 1.0 || self.sys.rng.gen::<f64>() < acceptance {
            self.sys.state = proposed;
            self.sys.energy = proposed_energy;
        }
        Ok(1.0)
    }

    fn state(&self) -> &SpinState {
        &self.sys.state
    }

    fn energy(&self) -> f64 {
        self.sys.energy
    }
}
