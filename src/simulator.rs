// Copyright (c) 2026 rezky_nightky

use tracing::{debug, trace};

use crate::grid::{Grid, MAX_INTENSITY};
use crate::params::{clamp_cols, clamp_rows};
use crate::random::RandomSource;

/// Chance that a column starts a new streak on a given tick.
pub const RAINFALL_PCT: f32 = 0.03;

/// Degrees added to the shared hue every tick.
pub const HUE_STEP: u16 = 5;

pub struct GridSimulator<R> {
    front: Grid,
    back: Grid,
    hue: u16,
    ticks: u64,
    rng: R,
}

impl<R: RandomSource> GridSimulator<R> {
    pub fn new(rows: u16, cols: u16, rng: R) -> Self {
        let grid = Grid::new(clamp_rows(rows), clamp_cols(cols));
        Self::from_grid(grid, rng)
    }

    fn from_grid(grid: Grid, rng: R) -> Self {
        Self {
            back: grid.clone(),
            front: grid,
            hue: 0,
            ticks: 0,
            rng,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.front
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }

    pub fn rows(&self) -> u16 {
        self.front.rows()
    }

    pub fn cols(&self) -> u16 {
        self.front.cols()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Swaps in fresh dark buffers; the hue keeps cycling where it was.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        let rows = clamp_rows(rows);
        let cols = clamp_cols(cols);
        debug!(rows, cols, hue = self.hue, "grid reset");
        self.front = Grid::new(rows, cols);
        self.back = Grid::new(rows, cols);
    }

    /// Advances the rain by one step and returns the new snapshot and hue.
    ///
    /// Every write goes to the back buffer while reads come only from the
    /// previous grid, so decay, head propagation and spawning all see the
    /// same prior state regardless of visiting order.
    pub fn tick(&mut self) -> (&Grid, u16) {
        debug_assert!(self.front.same_shape(&self.back));

        let rows = self.front.rows() as usize;
        let cols = self.front.cols() as usize;
        let prev = self.front.cells();
        let next = self.back.cells_mut();

        for (n, &p) in next.iter_mut().zip(prev) {
            *n = p.saturating_sub(1);
        }

        for r in (0..rows.saturating_sub(1)).rev() {
            let src = r * cols;
            let dst = src + cols;
            for c in 0..cols {
                if prev[src + c] == MAX_INTENSITY {
                    next[dst + c] = MAX_INTENSITY;
                }
            }
        }

        for cell in next.iter_mut().take(cols) {
            if self.rng.next_unit() < RAINFALL_PCT {
                *cell = MAX_INTENSITY;
            }
        }

        std::mem::swap(&mut self.front, &mut self.back);
        self.hue = (self.hue + HUE_STEP) % 360;
        self.ticks += 1;
        trace!(tick = self.ticks, hue = self.hue, "tick");

        (&self.front, self.hue)
    }
}
