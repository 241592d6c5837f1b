// Copyright (c) 2026 rezky_nightky

mod cell;
mod clock;
mod config;
mod frame;
mod grid;
mod logging;
mod palette;
mod params;
mod random;
mod render;
mod runtime;
mod scheduler;
mod simulator;
mod terminal;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use tracing::info;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::clock::SystemClock;
use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_help_detail, Args, ColorBg,
};
use crate::logging::init_file_logging;
use crate::palette::black;
use crate::params::{
    Params, COLS_MAX, COLS_MIN, ROWS_MAX, ROWS_MIN, SPEED_MAX_MS, SPEED_MIN_MS,
};
use crate::random::StdRandom;
use crate::render::Painter;
use crate::runtime::ColorMode;
use crate::scheduler::AnimationScheduler;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

/// Upper bound on one input wait, so a paused screen still notices `--duration`.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_u16_range(name: &str, v: u16, min: u16, max: u16) -> u16 {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_duration(v: f64) -> Option<Duration> {
    if !v.is_finite() {
        eprintln!("failed to apply --duration {} (must be a finite number)", v);
        std::process::exit(1);
    }
    if v <= 0.0 {
        return None;
    }
    if !(0.1..=86400.0).contains(&v) {
        eprintln!("failed to apply --duration {} (min 0.1 max 86400)", v);
        std::process::exit(1);
    }
    Some(Duration::from_secs_f64(v))
}

fn detect_color_mode_auto() -> ColorMode {
    ColorMode::from_env_values(
        &env::var("COLORTERM").unwrap_or_default(),
        &env::var("TERM").unwrap_or_default(),
    )
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        None => detect_color_mode_auto(),
        Some(0) => ColorMode::Mono,
        Some(16) => ColorMode::Color16,
        Some(8 | 256) => ColorMode::Color256,
        Some(24 | 32) => ColorMode::TrueColor,
        Some(m) => {
            eprintln!("invalid --colormode: {} (allowed: 0,16,8/256,24/32)", m);
            std::process::exit(1);
        }
    }
}

fn print_bitcolor_check(args: &Args) {
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    let or_unset = |s: &str| {
        if s.is_empty() {
            "(unset)".to_string()
        } else {
            s.to_string()
        }
    };
    let effective = detect_color_mode(args);

    println!("BITCOLOR CHECK:");
    println!("  COLORTERM: {}", or_unset(&colorterm));
    println!("  TERM: {}", or_unset(&term));
    println!("  auto_detected: {}", detect_color_mode_auto().label());
    if args.colormode.is_some() {
        println!("  forced: {}", effective.label());
    }
    println!("  effective: {}", effective.label());
}

fn print_info() {
    println!("Version: v{}", env!("CARGO_PKG_VERSION"));
    let sha = env!("HUERAIN_GIT_SHA");
    if sha.is_empty() {
        println!("Build: {}", env!("HUERAIN_BUILD"));
    } else {
        println!("Build: {} ({})", env!("HUERAIN_BUILD"), sha);
    }
    println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
}

fn install_exit_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn parse_args() -> Args {
    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn main() -> std::io::Result<()> {
    install_exit_handlers();
    let args = parse_args();

    if args.help_detail {
        print_help_detail();
        return Ok(());
    }

    if args.check_bitcolor {
        print_bitcolor_check(&args);
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        print_info();
        return Ok(());
    }

    let rows = require_u16_range("--rows", args.rows, ROWS_MIN, ROWS_MAX);
    let cols = require_u16_range("--cols", args.cols, COLS_MIN, COLS_MAX);
    let speed = require_u16_range("--speed", args.speed, SPEED_MIN_MS, SPEED_MAX_MS);
    let run_for = args.duration.and_then(require_duration);
    let color_mode = detect_color_mode(&args);

    if let Some(path) = &args.log_file {
        init_file_logging(path)?;
    }

    let bg = match args.color_bg {
        ColorBg::Black => black(color_mode),
        ColorBg::DefaultBackground => None,
    };

    info!(
        rows,
        cols,
        speed_ms = speed,
        color_mode = color_mode.label(),
        seed = args.seed,
        "starting"
    );

    let params = Params::new(rows, cols, speed, !args.paused);
    let mut scheduler = AnimationScheduler::new(params, StdRandom::new(args.seed), SystemClock);

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let mut painter = Painter::new(w, h, color_mode, bg);

    let start_time = Instant::now();
    let end_time = run_for.map(|d| start_time + d);
    let mut needs_repaint = true;

    'rain: loop {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }

        let mut timeout = scheduler.time_until_next().unwrap_or(IDLE_POLL).min(IDLE_POLL);
        if let Some(end) = end_time {
            timeout = timeout.min(end.saturating_duration_since(Instant::now()));
        }

        if needs_repaint {
            timeout = Duration::ZERO;
        }

        if Terminal::poll_event(timeout)? {
            loop {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        painter.resize_screen(nw, nh, bg);
                        needs_repaint = true;
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver {
                            break 'rain;
                        }
                        match k.code {
                            KeyCode::Esc | KeyCode::Char('q') => break 'rain,
                            KeyCode::Char(' ') | KeyCode::Char('p') => {
                                scheduler.toggle_running()
                            }
                            KeyCode::Char('+') | KeyCode::Char('=') => scheduler.adjust_speed(-1),
                            KeyCode::Char('-') | KeyCode::Char('_') => scheduler.adjust_speed(1),
                            KeyCode::Up => scheduler.adjust_rows(1),
                            KeyCode::Down => scheduler.adjust_rows(-1),
                            KeyCode::Right => scheduler.adjust_cols(1),
                            KeyCode::Left => scheduler.adjust_cols(-1),
                            _ => {}
                        }
                        needs_repaint = true;
                    }
                    _ => {}
                }
                if !Terminal::poll_event(Duration::ZERO)? {
                    break;
                }
            }
        }

        if needs_repaint {
            let sim = scheduler.simulator();
            painter.paint_grid(sim.grid(), sim.hue());
        }

        let ticked = scheduler.poll(&mut painter);

        if ticked || needs_repaint {
            painter.paint_status(&scheduler.params(), scheduler.simulator().hue());
            let frame = painter.frame_mut();
            if frame.is_dirty() {
                term.draw(frame)?;
            }
        }
        needs_repaint = false;
    }

    drop(term);
    info!(
        ticks = scheduler.simulator().ticks(),
        timers = scheduler.timers_started(),
        elapsed_s = start_time.elapsed().as_secs_f64(),
        "exiting"
    );
    Ok(())
}
