// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::params::{
    COLS_DEFAULT, COLS_MAX, COLS_MIN, ROWS_DEFAULT, ROWS_MAX, ROWS_MIN, SPEED_DEFAULT_MS,
    SPEED_MAX_MS, SPEED_MIN_MS,
};

pub const DEFAULT_PARAMS_USAGE: &str =
    "DEFAULT PARAMS USAGE:\n  huerain --rows 20 --cols 30 --speed 100 --color-bg black";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("      Example:") {
            out.push_str("      \x1b[32mExample:\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  huerain") {
            out.push_str("  \x1b[1;34mhuerain\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "huerain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'r',
        long = "rows",
        default_value_t = ROWS_DEFAULT,
        help_heading = "GRID",
        help = "Grid rows (min 10 max 30)"
    )]
    pub rows: u16,

    #[arg(
        short = 'c',
        long = "cols",
        default_value_t = COLS_DEFAULT,
        help_heading = "GRID",
        help = "Grid columns (min 10 max 40)"
    )]
    pub cols: u16,

    #[arg(
        short = 'S',
        long = "speed",
        default_value_t = SPEED_DEFAULT_MS,
        help_heading = "GRID",
        help = "Tick period in milliseconds (min 20 max 700)"
    )]
    pub speed: u16,

    #[arg(
        short = 'p',
        long = "paused",
        help_heading = "GENERAL",
        help = "Start with the rain paused"
    )]
    pub paused: bool,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the spawn generator for a repeatable run"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        help_heading = "GENERAL",
        help = "Write diagnostics to PATH (filter with RUST_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if COLORTERM says so, 8-bit if TERM is *256color, else 16-color"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

fn help_detail_text() -> String {
    format!(
        "{usage}\n\nUSAGE:\n  huerain [OPTIONS]\n\nGRID:\n  -r, --rows <n>\n      Grid rows (min {rmin} max {rmax}).\n      Example: huerain --rows 25\n\n  -c, --cols <n>\n      Grid columns (min {cmin} max {cmax}).\n      Example: huerain --cols 40\n\n  -S, --speed <ms>\n      Tick period in milliseconds; lower is faster (min {smin} max {smax}).\n      Example: huerain --speed 60\n\nGENERAL:\n  -p, --paused\n      Start paused; press space to begin.\n      Example: huerain -p\n\n  --seed <n>\n      Repeatable spawn pattern.\n      Example: huerain --seed 7\n\n  --duration <seconds>\n      Stop after N seconds (min 0.1 max 86400).\n      Example: huerain --duration 10\n\n  -s, --screensaver\n      Exit on any keypress.\n      Example: huerain -s\n\n  --log-file <path>\n      Write diagnostics to a file; RUST_LOG selects the level (default info).\n      Example: RUST_LOG=debug huerain --log-file rain.log\n\nAPPEARANCE:\n  --color-bg <black|default-background>\n      Background mode.\n      Example: huerain --color-bg default-background\n\n  --colormode <0|16|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: huerain --colormode 8\n\nKEYS:\n  space, p     run / pause\n  + / -        faster / slower (20 ms per step)\n  up / down    more / fewer rows\n  right / left more / fewer columns\n  q, esc       quit\n\nHELP:\n  --check-bitcolor\n      Print detected terminal color capability and exit.\n\n  --help-detail\n      Show this detailed help.\n\n  -v, --version\n      Print version and exit.\n\n  -i, --info\n      Print version info and exit.\n",
        usage = DEFAULT_PARAMS_USAGE,
        rmin = ROWS_MIN,
        rmax = ROWS_MAX,
        cmin = COLS_MIN,
        cmax = COLS_MAX,
        smin = SPEED_MIN_MS,
        smax = SPEED_MAX_MS,
    )
}

pub fn print_help_detail() {
    let block = help_detail_text();
    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_params() {
        let args = Args::try_parse_from(["huerain"]).unwrap();
        assert_eq!((args.rows, args.cols, args.speed), (20, 30, 100));
        assert!(!args.paused);
        assert_eq!(args.color_bg, ColorBg::Black);
    }

    #[test]
    fn short_flags_parse() {
        let args =
            Args::try_parse_from(["huerain", "-r", "12", "-c", "33", "-S", "40", "-p"]).unwrap();
        assert_eq!((args.rows, args.cols, args.speed), (12, 33, 40));
        assert!(args.paused);
    }

    #[test]
    fn headings_are_colorized() {
        let out = colorize_help_detail("GRID:\n  -r, --rows\n");
        assert!(out.starts_with("\x1b[1;36mGRID:\x1b[0m\n"));
        assert!(out.contains("\x1b[33m-r, --rows\x1b[0m"));
    }

    #[test]
    fn help_detail_lists_ranges() {
        let text = help_detail_text();
        assert!(text.contains("min 10 max 30"));
        assert!(text.contains("min 20 max 700"));
    }

    #[test]
    fn colormode_help_names_the_16_color_fallback() {
        use clap::CommandFactory;

        let cmd = Args::command();
        let help = cmd
            .get_arguments()
            .find(|a| a.get_id().as_str() == "colormode")
            .and_then(|a| a.get_help())
            .map(|h| h.to_string())
            .unwrap_or_default();
        assert!(help.ends_with("else 16-color"), "{}", help);
    }
}
