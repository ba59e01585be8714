//! Occupation counting on a logarithmic time grid.

use std::io::{self, Write};

use super::write_lines;

/// For each grid point, counts whether the trajectory was still in its
/// pre-jump configuration when the sampling instant passed: on every step
/// the cursor walks forward over all grid points the new elapsed time has
/// crossed, incrementing each crossed bucket once. Dwell occupancy
/// sampling, not integral dwell time.
pub struct PsiConfig {
    grid: Vec<f64>,
    counter: Vec<u64>,
    cursor: usize,
    elapsed: f64,
    out_of_counter: u64,
}

impl PsiConfig {
    pub fn new(grid: Vec<f64>) -> Self {
        let n = grid.len();
        PsiConfig {
            grid,
            counter: vec![0; n],
            cursor: 0,
            elapsed: 0.0,
            out_of_counter: 0,
        }
    }

    pub fn step(&mut self, waiting_time: f64) {
        self.elapsed += waiting_time;
        if self.cursor >= self.grid.len() {
            // Grid exhausted: record and stop updating. Not fatal.
            self.out_of_counter += 1;
            return;
        }
        while self.cursor < self.grid.len() && self.grid[self.cursor] < self.elapsed {
            self.counter[self.cursor] += 1;
            self.cursor += 1;
        }
        // The step that walks the cursor off the end has itself passed
        // the last grid point; tally it with the later overruns.
        if self.cursor == self.grid.len() {
            self.out_of_counter += 1;
        }
    }

    pub fn counters(&self) -> &[u64] {
        &self.counter
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Steps whose elapsed time lies past the last grid point, the
    /// overrunning step included.
    pub fn out_of_counter(&self) -> u64 {
        self.out_of_counter
    }

    /// Writes the full counter array, one integer per line in grid order.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_lines(out, &self.counter)
    }
}
