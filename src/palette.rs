// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::grid::MAX_INTENSITY;
use crate::runtime::ColorMode;

/// Lit cells sit at `BASE + level * STEP` percent lightness.
const BASE_LIGHTNESS_PCT: f32 = 15.0;
const LIGHTNESS_STEP_PCT: f32 = 15.0;

/// Glyphs for mono terminals, indexed by intensity.
const MONO_SHADES: [char; (MAX_INTENSITY + 1) as usize] = [' ', '.', ':', '+', '*', '#'];

fn dist2(a: (u8, u8, u8), b: (u8, u8, u8)) -> i32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    dr * dr + dg * dg + db * db
}

/// CSS-style `hsl(h, s%, l%)` to 8-bit RGB.
pub fn hsl_to_rgb(hue: f32, sat_pct: f32, light_pct: f32) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = (sat_pct / 100.0).clamp(0.0, 1.0);
    let l = (light_pct / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let to6 = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (to6(r), to6(g), to6(b));
    let cube = (
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, (0, 0, 0)),
        239..=255 => (231, (255, 255, 255)),
        _ => {
            let step = (avg - 8) / 10;
            let v = 8 + 10 * step;
            (232 + step, (v, v, v))
        }
    };

    if dist2((r, g, b), gray) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2((r, g, b), *rgb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

pub fn rgb_for_mode(mode: ColorMode, (r, g, b): (u8, u8, u8)) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb { r, g, b }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
        ColorMode::Color16 => Some(rgb_to_color16(r, g, b)),
    }
}

pub fn black(mode: ColorMode) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::Color16 => Some(Color::Black),
        ColorMode::Color256 => Some(Color::AnsiValue(16)),
        ColorMode::TrueColor => Some(Color::Rgb { r: 0, g: 0, b: 0 }),
    }
}

/// RGB of a lit cell: full saturation, lightness `15 + 15 * intensity` percent.
/// Unlit cells are black.
pub fn cell_rgb(intensity: u8, hue: u16) -> (u8, u8, u8) {
    if intensity == 0 {
        return (0, 0, 0);
    }
    let level = intensity.min(MAX_INTENSITY) as f32;
    hsl_to_rgb(
        hue as f32,
        100.0,
        BASE_LIGHTNESS_PCT + level * LIGHTNESS_STEP_PCT,
    )
}

pub fn cell_color(intensity: u8, hue: u16, mode: ColorMode) -> Option<Color> {
    if intensity == 0 {
        return black(mode);
    }
    rgb_for_mode(mode, cell_rgb(intensity, hue))
}

pub fn mono_shade(intensity: u8) -> char {
    MONO_SHADES[intensity.min(MAX_INTENSITY) as usize]
}
