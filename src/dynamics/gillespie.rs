//! The continuous-time jump process (Gillespie / SSA).

use rand::Rng;
use rand_distr::{Distribution, Exp};

use super::{DynamicsEngine, SpinSystem};
use crate::error::DynamicsError;
use crate::landscape::EnergyLandscape;
use crate::state::SpinState;

/// Gillespie engine: every step evaluates the full single-flip
/// neighborhood, converts energy deltas into exit rates with the
/// Metropolis kernel `min(1, exp(-beta dE))`, samples the next state from
/// the rate-weighted categorical, and draws the waiting time from an
/// exponential with the total exit rate. Every step is accepted.
///
/// Scratch buffers are sized once at construction and reused; no per-step
/// buffer allocation.
pub struct GillespieEngine<L: EnergyLandscape> {
    sys: SpinSystem<L>,
    neighbors: Vec<SpinState>,
    neighbor_energies: Vec<f64>,
    delta_e: Vec<f64>,
    exit_rates: Vec<f64>,
    total_exit_rate: f64,
}

impl<L: EnergyLandscape> GillespieEngine<L> {
    pub fn new(n_spins: usize, beta: f64, landscape: L, seed: u64) -> Self {
        let sys = SpinSystem::new(n_spins, beta, landscape, seed);
        GillespieEngine {
            sys,
            neighbors: vec![SpinState::zero(); n_spins],
            neighbor_energies: vec![0.0; n_spins],
            delta_e: vec![0.0; n_spins],
            exit_rates: vec![0.0; n_spins],
            total_exit_rate: 0.0,
        }
    }

    /// Fills the neighbor/delta/rate scratch arrays and returns the total
    /// exit rate.
    fn calculate_exit_rates(&mut self) -> f64 {
        self.sys.state.neighbors_into(self.sys.n_spins, &mut self.neighbors);
        let mut total = 0.0;
        for i in 0..self.sys.n_spins {
            let e = self.sys.landscape.energy(&self.neighbors[i]);
            self.neighbor_energies[i] = e;
            self.delta_e[i] = e - self.sys.energy;
            self.exit_rates[i] = self.sys.rate(self.delta_e[i]);
            total += self.exit_rates[i];
        }
        total
    }

    /// Per-neighbor exit rates from the most recent step, in neighbor
    /// order.
    pub fn exit_rates(&self) -> &[f64] {
        &self.exit_rates
    }

    /// The total exit rate used for the most recent waiting-time draw.
    pub fn total_exit_rate(&self) -> f64 {
        self.total_exit_rate
    }
}

impl<L: EnergyLandscape> DynamicsEngine for GillespieEngine<L> {
    fn step(&mut self) -> Result<f64, DynamicsError> {
        let total = self.calculate_exit_rates();
        if !total.is_finite() || total <= 0.0 {
            return Err(DynamicsError::DegenerateRates { rate: total });
        }
        self.total_exit_rate = total;

        // Weighted categorical sample: first index whose cumulative rate
        // exceeds the draw. Ties resolve to the first index. The draw
        // order (selection, then waiting time) is fixed; reproducibility
        // depends on it.
        let draw: f64 = self.sys.rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        let mut selected = self.sys.n_spins - 1;
        for (i, &rate) in self.exit_rates.iter().enumerate() {
            cumulative += rate;
            if cumulative > draw {
                selected = i;
                break;
            }
        }

        let exp = Exp::new(total).map_err(|_| DynamicsError::DegenerateRates { rate: total })?;
        let waiting_time = exp.sample(&mut self.sys.rng);

        self.sys.state = self.neighbors[selected].clone();
        self.sys.energy = self.neighbor_energies[selected];
        Ok(waiting_time)
    }

    fn state(&self) -> &SpinState {
        &self.sys.state
    }

    fn energy(&self) -> f64 {
        self.sys.energy
    }
}
