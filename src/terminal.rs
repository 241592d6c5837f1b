// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};
use tracing::debug;

use crate::cell::Cell;
use crate::frame::Frame;

#[derive(Default)]
struct Pen {
    fg: Option<Option<Color>>,
    bg: Option<Option<Color>>,
    bold: Option<bool>,
    pos: Option<(u16, u16)>,
}

impl Pen {
    fn style(&mut self, out: &mut Stdout, cell: &Cell) -> Result<()> {
        if self.fg != Some(cell.fg) {
            out.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            out.queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            self.bg = Some(cell.bg);
        }
        if self.bold != Some(cell.bold) {
            out.queue(SetAttribute(if cell.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            self.bold = Some(cell.bold);
        }
        Ok(())
    }

    fn move_to(&mut self, out: &mut Stdout, x: u16, y: u16) -> Result<()> {
        if self.pos != Some((x, y)) {
            out.queue(cursor::MoveTo(x, y))?;
        }
        Ok(())
    }
}

pub struct Terminal {
    stdout: Stdout,
    last: Vec<Cell>,
    last_size: Option<(u16, u16)>,
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: Vec::new(),
            last_size: None,
            run_buf: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    /// Flushes the cells of `frame` that differ from what is on screen.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size = (frame.width, frame.height);
        let full = self.last_size != Some(size) || frame.is_dirty_all();
        let mut pen = Pen::default();

        if self.last_size != Some(size) {
            debug!(width = size.0, height = size.1, "terminal frame reset");
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = vec![Cell::blank_with_bg(None); size.0 as usize * size.1 as usize];
            self.last_size = Some(size);
        }

        let mut todo: Vec<usize> = if full {
            (0..self.last.len()).collect()
        } else {
            frame.dirty_indices().to_vec()
        };
        todo.sort_unstable();

        let width = frame.width as usize;
        let mut i = 0usize;
        while i < todo.len() {
            let idx0 = todo[i];
            let cell0 = frame.cell_at_index(idx0);
            i += 1;
            if !full && self.last[idx0] == cell0 {
                continue;
            }
            self.last[idx0] = cell0;

            self.run_buf.clear();
            self.run_buf.push(cell0.ch);
            let mut run_len: u16 = 1;
            let mut prev = idx0;
            while i < todo.len() {
                let idx1 = todo[i];
                if idx1 != prev + 1 || idx1 / width != idx0 / width {
                    break;
                }
                let cell1 = frame.cell_at_index(idx1);
                if !cell1.same_style(&cell0) || (!full && self.last[idx1] == cell1) {
                    break;
                }
                self.last[idx1] = cell1;
                self.run_buf.push(cell1.ch);
                run_len = run_len.saturating_add(1);
                prev = idx1;
                i += 1;
            }

            let x0 = (idx0 % width) as u16;
            let y0 = (idx0 / width) as u16;
            pen.move_to(&mut self.stdout, x0, y0)?;
            pen.style(&mut self.stdout, &cell0)?;
            self.stdout.queue(Print(self.run_buf.as_str()))?;
            let next_x = x0.saturating_add(run_len);
            pen.pos = (next_x < frame.width).then_some((next_x, y0));
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

fn restore(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    restore(&mut stdout());
}
