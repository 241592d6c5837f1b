// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;
use tracing::debug;

use crate::cell::Cell;
use crate::frame::Frame;
use crate::grid::{Grid, MAX_INTENSITY};
use crate::palette::{cell_color, hsl_to_rgb, mono_shade, rgb_for_mode};
use crate::params::Params;
use crate::runtime::ColorMode;
use crate::scheduler::FrameSink;

pub const TITLE: &str = "Dynamic Hue Rainfall";
const KEY_HELP: &str = "space pause  +/- speed  up/down rows  left/right cols  q quit";

const ORIGIN_X: u16 = 2;
const TITLE_Y: u16 = 0;
const STATUS_Y: u16 = 1;
const HELP_Y: u16 = 2;
const NOTICE_Y: u16 = 3;
const GRID_Y: u16 = 4;

/// Terminal columns per grid cell, so cells come out roughly square.
const CELL_W: u16 = 2;

/// Narrowest cell width, used when square cells would not fit.
const CELL_W_NARROW: u16 = 1;

/// Screen size needed to show every cell of a `rows x cols` grid at `cell_w`.
fn needed_size(rows: u16, cols: u16, cell_w: u16) -> (u16, u16) {
    (
        ORIGIN_X.saturating_add(cols.saturating_mul(cell_w)),
        GRID_Y.saturating_add(rows),
    )
}

pub fn status_line(params: &Params, hue: u16) -> String {
    format!(
        "{}  speed {}ms  rows {}  cols {}  hue {:>3}",
        if params.running { "[raining]" } else { "[paused] " },
        params.speed_ms,
        params.rows,
        params.cols,
        hue
    )
}

/// Projects grid snapshots and the control status onto a [`Frame`].
pub struct Painter {
    frame: Frame,
    mode: ColorMode,
    grid_shape: Option<(u16, u16)>,
    cell_w: u16,
    /// Screen size that would fit the current grid, when this one does not.
    too_small: Option<(u16, u16)>,
}

impl Painter {
    pub fn new(width: u16, height: u16, mode: ColorMode, bg: Option<Color>) -> Self {
        Self {
            frame: Frame::new(width, height, bg),
            mode,
            grid_shape: None,
            cell_w: CELL_W,
            too_small: None,
        }
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    pub fn resize_screen(&mut self, width: u16, height: u16, bg: Option<Color>) {
        self.frame = Frame::new(width, height, bg);
        self.grid_shape = None;
    }

    fn accent(&self, hue: u16) -> Option<Color> {
        rgb_for_mode(self.mode, hsl_to_rgb(hue as f32, 100.0, 60.0))
    }

    pub fn paint_grid(&mut self, grid: &Grid, hue: u16) {
        let shape = (grid.rows(), grid.cols());
        if self.grid_shape != Some(shape) {
            self.frame.clear();
            self.grid_shape = Some(shape);
            self.fit(shape);
        }

        let cell_w = self.cell_w;
        for r in 0..grid.rows() {
            let y = GRID_Y.saturating_add(r);
            for (c, &v) in grid.row(r).iter().enumerate() {
                let x = ORIGIN_X.saturating_add(c as u16 * cell_w);
                let cell = match self.mode {
                    ColorMode::Mono => Cell {
                        ch: mono_shade(v),
                        fg: None,
                        bg: None,
                        bold: v == MAX_INTENSITY,
                    },
                    _ => Cell {
                        ch: ' ',
                        fg: None,
                        bg: cell_color(v, hue, self.mode),
                        bold: false,
                    },
                };
                for dx in 0..cell_w {
                    self.frame.set(x.saturating_add(dx), y, cell);
                }
            }
        }
    }

    fn fit(&mut self, (rows, cols): (u16, u16)) {
        let (w, h) = (self.frame.width, self.frame.height);
        self.cell_w = if needed_size(rows, cols, CELL_W).0 <= w {
            CELL_W
        } else {
            CELL_W_NARROW
        };

        let need = needed_size(rows, cols, self.cell_w);
        self.too_small = (need.0 > w || need.1 > h).then_some(need);
        if let Some((nw, nh)) = self.too_small {
            debug!(rows, cols, width = w, height = h, need_w = nw, need_h = nh, "grid clipped");
        }
    }

    pub fn paint_status(&mut self, params: &Params, hue: u16) {
        let accent = self.accent(hue);
        let width = self.frame.width;

        self.frame.put_str(ORIGIN_X, TITLE_Y, TITLE, accent, true);

        self.frame.clear_span(0, STATUS_Y, width);
        self.frame
            .put_str(ORIGIN_X, STATUS_Y, &status_line(params, hue), None, false);

        self.frame.put_str(ORIGIN_X, HELP_Y, KEY_HELP, None, false);

        self.frame.clear_span(0, NOTICE_Y, width);
        if let Some((nw, nh)) = self.too_small {
            let notice = format!("terminal too small (need {}x{})", nw, nh);
            self.frame.put_str(ORIGIN_X, NOTICE_Y, &notice, accent, true);
        }
    }
}

impl FrameSink for Painter {
    fn on_frame(&mut self, grid: &Grid, hue: u16) {
        self.paint_grid(grid, hue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;
    use crate::simulator::GridSimulator;

    #[test]
    fn status_line_reports_parameters() {
        let p = Params::new(12, 34, 140, false);
        assert_eq!(
            status_line(&p, 5),
            "[paused]   speed 140ms  rows 12  cols 34  hue   5"
        );
    }

    #[test]
    fn lit_cells_are_painted_two_columns_wide() {
        let mut sim = GridSimulator::new(10, 10, SequenceRandom::new(&[0.0], 1.0));
        let (grid, hue) = sim.tick();

        let mut painter = Painter::new(80, 24, ColorMode::TrueColor, None);
        painter.on_frame(grid, hue);

        let frame = painter.frame_mut();
        let head = cell_color(5, hue, ColorMode::TrueColor);
        let dark = cell_color(0, hue, ColorMode::TrueColor);
        assert_eq!(frame.get(ORIGIN_X, GRID_Y).and_then(|c| c.bg), head);
        assert_eq!(frame.get(ORIGIN_X + 1, GRID_Y).and_then(|c| c.bg), head);
        assert_eq!(frame.get(ORIGIN_X + 2, GRID_Y).and_then(|c| c.bg), dark);
    }

    #[test]
    fn mono_mode_uses_shade_glyphs() {
        let mut sim = GridSimulator::new(10, 10, SequenceRandom::new(&[0.0], 1.0));
        let (grid, hue) = sim.tick();

        let mut painter = Painter::new(80, 24, ColorMode::Mono, None);
        painter.on_frame(grid, hue);
        let frame = painter.frame_mut();
        assert_eq!(frame.get(ORIGIN_X, GRID_Y).map(|c| c.ch), Some('#'));
        assert_eq!(frame.get(ORIGIN_X + 2, GRID_Y).map(|c| c.ch), Some(' '));
    }

    fn row_text(frame: &Frame, y: u16) -> String {
        (0..frame.width)
            .filter_map(|x| frame.get(x, y).map(|c| c.ch))
            .collect()
    }

    #[test]
    fn wide_grid_narrows_cells_to_fit_the_width() {
        let mut sim = GridSimulator::new(10, 40, SequenceRandom::new(&[0.0; 40], 1.0));
        let (grid, hue) = sim.tick();

        let mut painter = Painter::new(80, 24, ColorMode::TrueColor, None);
        painter.on_frame(grid, hue);
        assert_eq!(painter.too_small, None);

        let head = cell_color(5, hue, ColorMode::TrueColor);
        let frame = painter.frame_mut();
        assert_eq!(frame.get(ORIGIN_X + 39, GRID_Y).and_then(|c| c.bg), head);
        assert_eq!(frame.get(ORIGIN_X + 40, GRID_Y).and_then(|c| c.bg), None);
    }

    #[test]
    fn oversized_grid_on_80x24_reports_the_size_it_needs() {
        let mut sim = GridSimulator::new(30, 40, SequenceRandom::new(&[0.0; 40], 1.0));
        let (grid, hue) = sim.tick();

        let mut painter = Painter::new(80, 24, ColorMode::TrueColor, None);
        painter.on_frame(grid, hue);
        assert_eq!(painter.too_small, Some((42, 34)));

        let head = cell_color(5, hue, ColorMode::TrueColor);
        assert_eq!(
            painter.frame_mut().get(ORIGIN_X + 39, GRID_Y).and_then(|c| c.bg),
            head
        );

        painter.paint_status(&Params::new(30, 40, 100, true), hue);
        let notice = row_text(painter.frame_mut(), NOTICE_Y);
        assert!(notice.contains("terminal too small (need 42x34)"), "{}", notice);
    }

    #[test]
    fn notice_clears_once_the_grid_fits() {
        let mut painter = Painter::new(80, 24, ColorMode::Color256, None);
        let mut sim = GridSimulator::new(30, 40, SequenceRandom::dry());
        painter.paint_grid(sim.grid(), 0);
        painter.paint_status(&Params::new(30, 40, 100, true), 0);

        sim.resize(15, 30);
        painter.paint_grid(sim.grid(), 0);
        painter.paint_status(&Params::new(15, 30, 100, true), 0);
        assert_eq!(painter.too_small, None);
        assert!(row_text(painter.frame_mut(), NOTICE_Y).trim().is_empty());
    }

    #[test]
    fn shrinking_the_grid_wipes_the_old_area() {
        let mut painter = Painter::new(120, 40, ColorMode::Color256, None);
        let mut sim = GridSimulator::new(30, 40, SequenceRandom::dry());
        painter.paint_grid(sim.grid(), 0);
        painter.frame_mut().clear_dirty();

        sim.resize(10, 10);
        painter.paint_grid(sim.grid(), 0);
        let frame = painter.frame_mut();
        assert!(frame.is_dirty_all());
        let far = ORIGIN_X + 39 * CELL_W;
        assert_eq!(frame.get(far, GRID_Y + 29).and_then(|c| c.bg), None);
    }
}
