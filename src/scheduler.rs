// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::clock::Clock;
use crate::grid::Grid;
use crate::params::{clamp_cols, clamp_rows, clamp_speed, step, Params, SPEED_STEP_MS};
use crate::random::RandomSource;
use crate::simulator::GridSimulator;

/// Receives every freshly ticked snapshot.
pub trait FrameSink {
    fn on_frame(&mut self, grid: &Grid, hue: u16);
}

impl<F: FnMut(&Grid, u16)> FrameSink for F {
    fn on_frame(&mut self, grid: &Grid, hue: u16) {
        self(grid, hue)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    id: u64,
    period: Duration,
    next_due: Instant,
}

/// Drives a [`GridSimulator`] at the configured period.
///
/// There is never more than one timer: starting replaces, stopping drops.
/// Parameter changes land between polls, so the simulator only ever sees
/// them on a tick boundary.
pub struct AnimationScheduler<R: RandomSource, C: Clock> {
    sim: GridSimulator<R>,
    params: Params,
    clock: C,
    timer: Option<Timer>,
    timers_started: u64,
}

impl<R: RandomSource, C: Clock> AnimationScheduler<R, C> {
    pub fn new(params: Params, rng: R, clock: C) -> Self {
        let params = Params::new(params.rows, params.cols, params.speed_ms, params.running);
        let sim = GridSimulator::new(params.rows, params.cols, rng);
        let mut s = Self {
            sim,
            params,
            clock,
            timer: None,
            timers_started: 0,
        };
        if params.running {
            s.start();
        }
        s
    }

    pub fn simulator(&self) -> &GridSimulator<R> {
        &self.sim
    }

    pub fn params(&self) -> Params {
        self.params
    }

    pub fn state(&self) -> SchedulerState {
        if self.timer.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    pub fn active_timers(&self) -> usize {
        usize::from(self.timer.is_some())
    }

    pub fn timers_started(&self) -> u64 {
        self.timers_started
    }

    /// Starts a fresh timer at the current speed, dropping any previous one.
    pub fn start(&mut self) {
        self.params.running = true;
        self.timers_started += 1;
        let period = self.params.period();
        let timer = Timer {
            id: self.timers_started,
            period,
            next_due: self.clock.now() + period,
        };
        if let Some(old) = self.timer.replace(timer) {
            debug!(old = old.id, new = timer.id, "timer replaced");
        }
        debug_assert_eq!(self.active_timers(), 1);
        info!(timer = timer.id, period_ms = period.as_millis() as u64, "rain started");
    }

    pub fn stop(&mut self) {
        self.params.running = false;
        if let Some(t) = self.timer.take() {
            info!(
                timer = t.id,
                ticks = self.sim.ticks(),
                lit = self.sim.grid().lit_count(),
                "rain stopped"
            );
        }
    }

    fn restart_if_running(&mut self) {
        if self.timer.is_some() {
            self.start();
        }
    }

    pub fn set_running(&mut self, on: bool) {
        match (on, self.timer.is_some()) {
            (true, false) => self.start(),
            (false, true) => self.stop(),
            _ => self.params.running = on,
        }
    }

    pub fn toggle_running(&mut self) {
        self.set_running(!self.is_running());
    }

    pub fn set_speed(&mut self, ms: u16) {
        let ms = clamp_speed(ms);
        if ms == self.params.speed_ms {
            return;
        }
        self.params.speed_ms = ms;
        self.restart_if_running();
    }

    pub fn set_rows(&mut self, rows: u16) {
        self.set_dimensions(rows, self.params.cols);
    }

    pub fn set_cols(&mut self, cols: u16) {
        self.set_dimensions(self.params.rows, cols);
    }

    pub fn set_dimensions(&mut self, rows: u16, cols: u16) {
        let rows = clamp_rows(rows);
        let cols = clamp_cols(cols);
        if rows == self.params.rows && cols == self.params.cols {
            return;
        }
        self.params.rows = rows;
        self.params.cols = cols;
        self.sim.resize(rows, cols);
        debug_assert_eq!((self.sim.rows(), self.sim.cols()), (rows, cols));
        self.restart_if_running();
    }

    pub fn adjust_speed(&mut self, steps: i32) {
        let delta = steps * SPEED_STEP_MS as i32;
        self.set_speed(step(self.params.speed_ms, delta));
    }

    pub fn adjust_rows(&mut self, delta: i32) {
        self.set_rows(step(self.params.rows, delta));
    }

    pub fn adjust_cols(&mut self, delta: i32) {
        self.set_cols(step(self.params.cols, delta));
    }

    /// How long the caller may wait before the next tick is due.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.timer
            .as_ref()
            .map(|t| t.next_due.saturating_duration_since(now))
    }

    /// Fires at most one due tick and forwards the snapshot to `sink`.
    pub fn poll<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        let now = self.clock.now();
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if now < timer.next_due {
            return false;
        }

        timer.next_due += timer.period;
        if now > timer.next_due {
            timer.next_due = now;
        }

        let (grid, hue) = self.sim.tick();
        sink.on_frame(grid, hue);
        true
    }
}

impl<R: RandomSource, C: Clock> Drop for AnimationScheduler<R, C> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::params::{COLS_MAX, ROWS_MIN, SPEED_MAX_MS, SPEED_MIN_MS};
    use crate::random::SequenceRandom;

    type TestScheduler = AnimationScheduler<SequenceRandom, Rc<ManualClock>>;

    fn make(running: bool) -> (TestScheduler, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new());
        let params = Params::new(10, 10, 100, running);
        let s = AnimationScheduler::new(params, SequenceRandom::dry(), Rc::clone(&clock));
        (s, clock)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn initial_state_follows_running_flag() {
        let (s, _) = make(true);
        assert_eq!(s.state(), SchedulerState::Running);
        assert_eq!(s.active_timers(), 1);

        let (s, _) = make(false);
        assert_eq!(s.state(), SchedulerState::Stopped);
        assert_eq!(s.active_timers(), 0);
        assert_eq!(s.time_until_next(), None);
    }

    #[test]
    fn ticks_once_per_period() {
        let (mut s, clock) = make(true);
        let mut frames = Vec::new();
        let mut sink = |_: &Grid, hue: u16| frames.push(hue);

        assert!(!s.poll(&mut sink));
        clock.advance(ms(99));
        assert!(!s.poll(&mut sink));
        clock.advance(ms(1));
        assert!(s.poll(&mut sink));
        assert!(!s.poll(&mut sink));
        clock.advance(ms(100));
        assert!(s.poll(&mut sink));

        assert_eq!(frames, vec![5, 10]);
    }

    #[test]
    fn falling_behind_fires_once_not_a_burst() {
        let (mut s, clock) = make(true);
        let mut count = 0;
        let mut sink = |_: &Grid, _: u16| count += 1;

        clock.advance(ms(1_000));
        assert!(s.poll(&mut sink));
        assert_eq!(s.time_until_next(), Some(Duration::ZERO));
        assert!(s.poll(&mut sink));
        assert!(!s.poll(&mut sink));
        assert_eq!(s.time_until_next(), Some(ms(100)));
        assert_eq!(count, 2);
    }

    #[test]
    fn no_tick_after_stop_even_if_overdue() {
        let (mut s, clock) = make(true);
        let mut count = 0;
        let mut sink = |_: &Grid, _: u16| count += 1;

        clock.advance(ms(500));
        s.set_running(false);
        assert!(!s.poll(&mut sink));
        clock.advance(ms(500));
        assert!(!s.poll(&mut sink));
        assert_eq!(count, 0);
        assert_eq!(s.simulator().ticks(), 0);
    }

    #[test]
    fn rapid_toggling_keeps_a_single_timer() {
        let (mut s, clock) = make(false);
        let mut count = 0;
        let mut sink = |_: &Grid, _: u16| count += 1;

        for i in 0..50 {
            s.set_running(i % 3 != 1);
            s.set_speed(20 + (i as u16 % 5) * 40);
            assert!(s.active_timers() <= 1);
        }
        s.set_running(true);
        s.set_running(true);
        assert_eq!(s.active_timers(), 1);

        clock.advance(ms(10_000));
        assert!(s.poll(&mut sink));
        assert_eq!(count, 1);
    }

    #[test]
    fn speed_change_restarts_with_new_period() {
        let (mut s, clock) = make(true);
        let mut count = 0;
        let mut sink = |_: &Grid, _: u16| count += 1;

        clock.advance(ms(90));
        s.set_speed(300);
        assert_eq!(s.timers_started(), 2);
        assert_eq!(s.time_until_next(), Some(ms(300)));

        clock.advance(ms(20));
        assert!(!s.poll(&mut sink));
        clock.advance(ms(280));
        assert!(s.poll(&mut sink));
        assert_eq!(count, 1);
    }

    #[test]
    fn setting_the_same_speed_is_not_a_change() {
        let (mut s, _) = make(true);
        s.set_speed(100);
        s.set_dimensions(10, 10);
        assert_eq!(s.timers_started(), 1);
    }

    #[test]
    fn speed_change_while_stopped_does_not_start() {
        let (mut s, _) = make(false);
        s.set_speed(200);
        assert!(!s.is_running());
        assert_eq!(s.params().speed_ms, 200);
        s.set_running(true);
        assert_eq!(s.time_until_next(), Some(ms(200)));
    }

    #[test]
    fn dimension_change_resets_grid_and_restarts() {
        let clock = Rc::new(ManualClock::new());
        let rng = SequenceRandom::new(&[0.0; 10], 1.0);
        let mut s = AnimationScheduler::new(Params::new(10, 10, 100, true), rng, Rc::clone(&clock));
        let mut sink = |_: &Grid, _: u16| {};

        clock.advance(ms(100));
        assert!(s.poll(&mut sink));
        assert_eq!(s.simulator().grid().lit_count(), 10);
        let hue = s.simulator().hue();

        clock.advance(ms(40));
        assert_eq!(s.time_until_next(), Some(ms(60)));
        s.set_rows(12);
        assert_eq!(s.timers_started(), 2);
        assert_eq!(s.time_until_next(), Some(ms(100)));
        assert_eq!(s.simulator().rows(), 12);
        assert_eq!(s.simulator().grid().lit_count(), 0);
        assert_eq!(s.simulator().hue(), hue);

        s.set_cols(33);
        assert_eq!(s.simulator().cols(), 33);
        assert_eq!(s.timers_started(), 3);
    }

    #[test]
    fn dimension_change_while_paused_still_resets() {
        let (mut s, _) = make(false);
        s.set_dimensions(15, 16);
        assert_eq!((s.simulator().rows(), s.simulator().cols()), (15, 16));
        assert!(!s.is_running());
        assert_eq!(s.timers_started(), 0);
    }

    #[test]
    fn setters_clamp_out_of_range_requests() {
        let (mut s, _) = make(true);
        s.set_speed(1);
        assert_eq!(s.params().speed_ms, SPEED_MIN_MS);
        s.set_speed(10_000);
        assert_eq!(s.params().speed_ms, SPEED_MAX_MS);
        s.set_rows(0);
        assert_eq!(s.params().rows, ROWS_MIN);
        s.set_cols(400);
        assert_eq!(s.params().cols, COLS_MAX);
        assert_eq!(s.simulator().cols(), COLS_MAX);
    }

    #[test]
    fn adjust_helpers_step_and_clamp() {
        let (mut s, _) = make(true);
        s.adjust_speed(-1);
        assert_eq!(s.params().speed_ms, 80);
        s.adjust_speed(-100);
        assert_eq!(s.params().speed_ms, SPEED_MIN_MS);
        s.adjust_rows(-5);
        assert_eq!(s.params().rows, ROWS_MIN);
        s.adjust_cols(3);
        assert_eq!(s.params().cols, 13);
    }

    #[test]
    fn toggle_flips_state() {
        let (mut s, _) = make(true);
        s.toggle_running();
        assert!(!s.is_running());
        assert!(!s.params().running);
        s.toggle_running();
        assert!(s.is_running());
        assert!(s.params().running);
    }
}
