//! Basin classification of a trajectory.
//!
//! A basin is a maximal stretch of the trajectory whose energy stays at
//! or below a threshold. Two independent trackers run in parallel: one
//! keyed on the energetic threshold, one on the entropic attractor. The
//! entropic tracker is constructed inert when the landscape has no valid
//! attractor.

use std::collections::HashSet;
use std::io::{self, Write};

use super::write_lines;
use crate::state::SpinState;

/// One basin state machine: outside-basin / inside-basin, with a dwell
/// accumulator and a uniqueness set of the configurations visited since
/// basin entry. On exit, the dwell sum and the distinct-configuration
/// count are flushed into the grid bucket the current elapsed time falls
/// in, located with the same monotone-cursor strategy the occupation
/// observable uses.
pub struct BasinTracker {
    threshold: f64,
    enabled: bool,
    inside: bool,
    unique_configs: HashSet<SpinState>,
    dwell: f64,
    grid: Vec<f64>,
    cursor: usize,
    elapsed: f64,
    dwell_counter: Vec<f64>,
    unique_counter: Vec<u64>,
    out_of_counter: u64,
}

impl BasinTracker {
    pub fn new(grid: Vec<f64>, threshold: f64) -> Self {
        let n = grid.len();
        BasinTracker {
            threshold,
            enabled: true,
            inside: false,
            unique_configs: HashSet::new(),
            dwell: 0.0,
            grid,
            cursor: 0,
            elapsed: 0.0,
            dwell_counter: vec![0.0; n],
            unique_counter: vec![0; n],
            out_of_counter: 0,
        }
    }

    /// A permanently inert tracker for landscapes without a valid
    /// threshold. Every update is a no-op; never an error.
    pub fn disabled() -> Self {
        let mut t = BasinTracker::new(Vec::new(), f64::NEG_INFINITY);
        t.enabled = false;
        t
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn step(&mut self, waiting_time: f64, state: &SpinState, energy: f64) {
        if !self.enabled {
            return;
        }
        self.elapsed += waiting_time;
        let in_basin = energy <= self.threshold;
        match (self.inside, in_basin) {
            (false, true) => {
                // Basin entry: fresh uniqueness set, dwell starts at this
                // step's waiting time.
                self.inside = true;
                self.unique_configs.clear();
                self.unique_configs.insert(state.clone());
                self.dwell = waiting_time;
            }
            (true, true) => {
                self.unique_configs.insert(state.clone());
                self.dwell += waiting_time;
            }
            (true, false) => {
                self.inside = false;
                self.flush_basin();
            }
            (false, false) => {}
        }
    }

    fn flush_basin(&mut self) {
        while self.cursor < self.grid.len() && self.grid[self.cursor] < self.elapsed {
            self.cursor += 1;
        }
        if self.cursor < self.grid.len() {
            self.dwell_counter[self.cursor] += self.dwell;
            self.unique_counter[self.cursor] += self.unique_configs.len() as u64;
        } else {
            self.out_of_counter += 1;
        }
        self.dwell = 0.0;
        self.unique_configs.clear();
    }

    pub fn dwell_counters(&self) -> &[f64] {
        &self.dwell_counter
    }

    pub fn unique_counters(&self) -> &[u64] {
        &self.unique_counter
    }

    pub fn out_of_counter(&self) -> u64 {
        self.out_of_counter
    }

    pub fn write_dwell_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let formatted: Vec<String> = self.dwell_counter.iter().map(|v| format!("{v:e}")).collect();
        write_lines(out, &formatted)
    }

    pub fn write_unique_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_lines(out, &self.unique_counter)
    }
}

/// The pair of basin trackers a tracer carries.
pub struct PsiBasin {
    energetic: BasinTracker,
    entropic: BasinTracker,
}

impl PsiBasin {
    /// `entropic_attractor` is `None` when the landscape defines no valid
    /// attractor; the entropic tracker is then inert for the whole run.
    pub fn new(
        energetic_grid: Vec<f64>,
        entropic_grid: Vec<f64>,
        energetic_threshold: f64,
        entropic_attractor: Option<f64>,
    ) -> Self {
        let entropic = match entropic_attractor {
            Some(threshold) => BasinTracker::new(entropic_grid, threshold),
            None => BasinTracker::disabled(),
        };
        PsiBasin {
            energetic: BasinTracker::new(energetic_grid, energetic_threshold),
            entropic,
        }
    }

    pub fn step(&mut self, waiting_time: f64, state: &SpinState, energy: f64) {
        self.energetic.step(waiting_time, state, energy);
        self.entropic.step(waiting_time, state, energy);
    }

    pub fn energetic(&self) -> &BasinTracker {
        &self.energetic
    }

    pub fn entropic(&self) -> &BasinTracker {
        &self.entropic
    }
}
