//! ANSI adapter: styled runs to a terminal string.
//!
//! This is the only rendering surface the core owns — a serializer from
//! runs to `console`-styled text, for hosts that want a plain string rather
//! than laying runs onto a grid themselves.

use console::{Color, Style};

use cardtext_markup::StyledRun;
use cardtext_theme::Rgb;

/// Maps an RGB color onto the 256-color palette.
///
/// Grayscale values take the dedicated ramp (232–255); everything else is
/// quantized into the 6×6×6 cube.
pub fn rgb_to_ansi256(rgb: Rgb) -> u8 {
    let Rgb { r, g, b } = rgb;
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((u16::from(r) - 8) * 24 / 247) as u8
        }
    } else {
        let red = (u16::from(r) * 5 / 255) as u8;
        let green = (u16::from(g) * 5 / 255) as u8;
        let blue = (u16::from(b) * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

/// Builds the `console` style for a single run.
pub fn run_style(run: &StyledRun) -> Style {
    let mut style = Style::new().fg(Color::Color256(rgb_to_ansi256(run.foreground)));
    if run.attributes.bold {
        style = style.bold();
    }
    if run.attributes.italic {
        style = style.italic();
    }
    if run.attributes.strikethrough {
        style = style.strikethrough();
    }
    style
}

/// Renders runs into one ANSI-escaped string, in document order.
pub fn to_ansi(runs: &[StyledRun]) -> String {
    let mut out = String::new();
    for run in runs {
        out.push_str(&run_style(run).apply_to(&run.text).to_string());
    }
    out
}

/// Renders runs with styling stripped — the plain text the runs carry.
pub fn to_plain(runs: &[StyledRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}
