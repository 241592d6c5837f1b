// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use tracing::debug;

pub const ROWS_MIN: u16 = 10;
pub const ROWS_MAX: u16 = 30;
pub const ROWS_DEFAULT: u16 = 20;

pub const COLS_MIN: u16 = 10;
pub const COLS_MAX: u16 = 40;
pub const COLS_DEFAULT: u16 = 30;

pub const SPEED_MIN_MS: u16 = 20;
pub const SPEED_MAX_MS: u16 = 700;
pub const SPEED_DEFAULT_MS: u16 = 100;
pub const SPEED_STEP_MS: u16 = 20;

/// User-tunable animation parameters. Out-of-range requests are clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    pub rows: u16,
    pub cols: u16,
    pub speed_ms: u16,
    pub running: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            rows: ROWS_DEFAULT,
            cols: COLS_DEFAULT,
            speed_ms: SPEED_DEFAULT_MS,
            running: true,
        }
    }
}

fn clamp_logged(name: &str, v: u16, min: u16, max: u16) -> u16 {
    let c = v.clamp(min, max);
    if c != v {
        debug!(param = name, requested = v, applied = c, "parameter clamped");
    }
    c
}

pub fn clamp_rows(v: u16) -> u16 {
    clamp_logged("rows", v, ROWS_MIN, ROWS_MAX)
}

pub fn clamp_cols(v: u16) -> u16 {
    clamp_logged("cols", v, COLS_MIN, COLS_MAX)
}

pub fn clamp_speed(v: u16) -> u16 {
    clamp_logged("speed", v, SPEED_MIN_MS, SPEED_MAX_MS)
}

/// Applies a signed step to `v` without wrapping, before range clamping.
pub fn step(v: u16, delta: i32) -> u16 {
    (v as i32 + delta).clamp(0, u16::MAX as i32) as u16
}

impl Params {
    pub fn new(rows: u16, cols: u16, speed_ms: u16, running: bool) -> Self {
        Self {
            rows: clamp_rows(rows),
            cols: clamp_cols(cols),
            speed_ms: clamp_speed(speed_ms),
            running,
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.speed_ms as u64)
    }
}
