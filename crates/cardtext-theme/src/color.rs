//! Pure color arithmetic for theme derivation.
//!
//! Everything in this module is a side-effect-free function of its inputs:
//! hex parsing and formatting, blending toward white/black, per-channel
//! mixing, and perceived luminance. The theme catalog composes these to
//! derive semantic colors from the live terminal palette.
//!
//! # Example
//!
//! ```rust
//! use cardtext_theme::color::{self, Rgb};
//!
//! let bg = Rgb::from_hex("#1e1e2e");
//! let fg = Rgb::from_hex("#cdd6f4");
//!
//! // 40% of the way from fg toward bg
//! let muted = color::mix(fg, bg, 40.0);
//! assert!(!color::is_light(bg));
//! assert_eq!(bg.to_hex(), "#1e1e2e");
//! ```

use serde::{Deserialize, Serialize};

/// A simple RGB color triplet.
///
/// This is the crate's own RGB type, decoupled from any terminal or styling
/// crate; the ANSI adapter converts at the outer edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Creates a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a 6-digit hex color, with or without a leading `#`.
    ///
    /// Case-insensitive. Malformed input yields black rather than an error:
    /// a wrong color is preferable to an aborted render in a presentation
    /// layer.
    pub fn from_hex(s: &str) -> Self {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::BLACK;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).unwrap_or(0)
        };
        Self::new(channel(0..2), channel(2..4), channel(4..6))
    }

    /// Formats as lower-case `#rrggbb`.
    ///
    /// Round-trips exactly with [`Rgb::from_hex`] for well-formed input.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A theme color: either a concrete RGB value or the transparency sentinel.
///
/// `Transparent` exists for the catalog's background slots; the rendering
/// adapter maps it to "leave the cell's background alone". Styled runs only
/// ever carry concrete [`Rgb`] foregrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Rgb(Rgb),
    Transparent,
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb)
    }
}

/// Linearly interpolates between two colors, per channel.
///
/// `percent` is clamped to 0–100: `0` returns `a`, `100` returns `b`.
pub fn mix(a: Rgb, b: Rgb, percent: f64) -> Rgb {
    let t = (percent.clamp(0.0, 100.0)) / 100.0;
    let lerp = |x: u8, y: u8| -> u8 {
        (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8
    };
    Rgb::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
}

/// Blends a color toward white by `percent` (0–100).
pub fn lighten(c: Rgb, percent: f64) -> Rgb {
    mix(c, Rgb::WHITE, percent)
}

/// Blends a color toward black by `percent` (0–100).
pub fn darken(c: Rgb, percent: f64) -> Rgb {
    mix(c, Rgb::BLACK, percent)
}

/// Perceived luminance (ITU-R BT.601), normalized to `[0, 1]`.
pub fn luminance(c: Rgb) -> f64 {
    (0.299 * f64::from(c.r) + 0.587 * f64::from(c.g) + 0.114 * f64::from(c.b)) / 255.0
}

/// Whether a color reads as light (luminance above 0.5).
pub fn is_light(c: Rgb) -> bool {
    luminance(c) > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Hex parsing
    // =====================================================================

    #[test]
    fn hex_roundtrip() {
        for hex in ["#000000", "#ffffff", "#ff6b35", "#1e1e2e", "#cdd6f4"] {
            assert_eq!(Rgb::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn hex_case_insensitive() {
        assert_eq!(Rgb::from_hex("#FF6B35"), Rgb::new(255, 107, 53));
        assert_eq!(Rgb::from_hex("#Ff6b35"), Rgb::new(255, 107, 53));
    }

    #[test]
    fn hex_without_hash() {
        assert_eq!(Rgb::from_hex("ff6b35"), Rgb::new(255, 107, 53));
    }

    #[test]
    fn malformed_hex_is_black() {
        assert_eq!(Rgb::from_hex(""), Rgb::BLACK);
        assert_eq!(Rgb::from_hex("#fff"), Rgb::BLACK);
        assert_eq!(Rgb::from_hex("#gggggg"), Rgb::BLACK);
        assert_eq!(Rgb::from_hex("#1234567"), Rgb::BLACK);
        assert_eq!(Rgb::from_hex("not a color"), Rgb::BLACK);
    }

    // =====================================================================
    // Blending
    // =====================================================================

    #[test]
    fn mix_endpoints() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 100.0), b);
    }

    #[test]
    fn mix_midpoint() {
        let mid = mix(Rgb::BLACK, Rgb::WHITE, 50.0);
        assert_eq!(mid, Rgb::new(128, 128, 128));
    }

    #[test]
    fn mix_clamps_out_of_range() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(mix(a, b, -5.0), a);
        assert_eq!(mix(a, b, 250.0), b);
    }

    #[test]
    fn lighten_moves_toward_white() {
        let c = Rgb::new(100, 100, 100);
        let lighter = lighten(c, 50.0);
        assert!(lighter.r > c.r && lighter.g > c.g && lighter.b > c.b);
        assert_eq!(lighten(c, 100.0), Rgb::WHITE);
    }

    #[test]
    fn darken_moves_toward_black() {
        let c = Rgb::new(100, 100, 100);
        let darker = darken(c, 50.0);
        assert!(darker.r < c.r && darker.g < c.g && darker.b < c.b);
        assert_eq!(darken(c, 100.0), Rgb::BLACK);
    }

    // =====================================================================
    // Luminance
    // =====================================================================

    #[test]
    fn luminance_bounds() {
        assert!(luminance(Rgb::BLACK).abs() < 1e-9);
        assert!((luminance(Rgb::WHITE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn green_outweighs_blue() {
        assert!(luminance(Rgb::new(0, 255, 0)) > luminance(Rgb::new(0, 0, 255)));
    }

    #[test]
    fn is_light_threshold() {
        assert!(!is_light(Rgb::BLACK));
        assert!(is_light(Rgb::WHITE));
        assert!(!is_light(Rgb::new(30, 30, 46)));
        assert!(is_light(Rgb::new(239, 241, 245)));
    }

    #[test]
    fn transparent_sentinel_is_not_rgb() {
        assert_ne!(Color::Transparent, Color::from(Rgb::BLACK));
    }
}
