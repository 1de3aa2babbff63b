//! The semantic color catalog.
//!
//! Every accessor recomputes its color from the *current* process-wide
//! palette on every call — nothing is cached, so a palette settled by a late
//! detection result is reflected immediately by whoever asks next.
//!
//! Semantic roles map onto ANSI slots and blends of the default foreground
//! and background; the exact derivations live in one place here so the
//! rendering side never does color math of its own.

use serde::{Deserialize, Serialize};

use crate::color::{self, Color, Rgb};
use crate::palette;

/// The transparency sentinel: "leave the underlying background alone".
pub const TRANSPARENT: Color = Color::Transparent;

/// Whether the current default background reads as light.
///
/// Recomputed per access, like every other catalog entry.
pub fn is_light() -> bool {
    color::is_light(palette::current().background)
}

pub fn background() -> Rgb {
    palette::current().background
}

/// Background one step away from the default, for panels.
pub fn background_subtle() -> Rgb {
    let p = palette::current();
    if color::is_light(p.background) {
        color::darken(p.background, 4.0)
    } else {
        color::lighten(p.background, 6.0)
    }
}

/// Background two steps away from the default, for wells and code blocks.
pub fn background_muted() -> Rgb {
    let p = palette::current();
    if color::is_light(p.background) {
        color::darken(p.background, 9.0)
    } else {
        color::lighten(p.background, 12.0)
    }
}

pub fn text() -> Rgb {
    palette::current().foreground
}

/// Foreground pushed further from the background, for emphasis.
pub fn text_bright() -> Rgb {
    let p = palette::current();
    if color::is_light(p.background) {
        color::darken(p.foreground, 40.0)
    } else {
        color::lighten(p.foreground, 40.0)
    }
}

/// De-emphasized foreground: 40% of the way from text toward background.
pub fn muted() -> Rgb {
    let p = palette::current();
    color::mix(p.foreground, p.background, 40.0)
}

pub fn primary() -> Rgb {
    palette::current().slot(4)
}

pub fn secondary() -> Rgb {
    palette::current().slot(5)
}

pub fn accent() -> Rgb {
    palette::current().slot(6)
}

pub fn success() -> Rgb {
    palette::current().slot(2)
}

pub fn warning() -> Rgb {
    palette::current().slot(3)
}

pub fn error() -> Rgb {
    palette::current().slot(1)
}

pub fn selected() -> Rgb {
    primary()
}

pub fn selected_text() -> Rgb {
    background()
}

pub fn border() -> Rgb {
    let p = palette::current();
    color::mix(p.foreground, p.background, 70.0)
}

pub fn border_focused() -> Rgb {
    primary()
}

/// Blends a resolved color 50% toward the current background.
pub fn dimmed(c: Rgb) -> Rgb {
    color::mix(c, background(), 50.0)
}

// ─── Category colors ────────────────────────────────────────────────────────

/// Card category, a closed set.
///
/// The content service sends categories as strings; [`Category::from_name`]
/// maps anything it does not recognize to [`Category::Default`], so the
/// mapping below stays total and exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Default,
    Bug,
    Feature,
    Improvement,
    Docs,
    Question,
    Chore,
    Urgent,
    Design,
}

impl Category {
    /// Maps a category name from the content service; unknown names resolve
    /// to [`Category::Default`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bug" => Self::Bug,
            "feature" => Self::Feature,
            "improvement" => Self::Improvement,
            "docs" => Self::Docs,
            "question" => Self::Question,
            "chore" => Self::Chore,
            "urgent" => Self::Urgent,
            "design" => Self::Design,
            _ => Self::Default,
        }
    }

    /// The dark-mode color table.
    const fn dark_hex(self) -> &'static str {
        match self {
            Self::Default => "#9399b2",
            Self::Bug => "#f38ba8",
            Self::Feature => "#a6e3a1",
            Self::Improvement => "#89b4fa",
            Self::Docs => "#94e2d5",
            Self::Question => "#cba6f7",
            Self::Chore => "#f9e2af",
            Self::Urgent => "#fab387",
            Self::Design => "#f5c2e7",
        }
    }

    /// The light-mode color table.
    const fn light_hex(self) -> &'static str {
        match self {
            Self::Default => "#6c6f85",
            Self::Bug => "#d20f39",
            Self::Feature => "#40a02b",
            Self::Improvement => "#1e66f5",
            Self::Docs => "#179299",
            Self::Question => "#8839ef",
            Self::Chore => "#df8e1d",
            Self::Urgent => "#fe640b",
            Self::Design => "#ea76cb",
        }
    }
}

/// Resolves a category to its color, selecting the light or dark sub-table
/// by the current background's luminance.
pub fn category_color(category: Category) -> Rgb {
    let hex = if is_light() {
        category.light_hex()
    } else {
        category.dark_hex()
    };
    Rgb::from_hex(hex)
}

/// A category color blended halfway toward the current background.
pub fn category_color_dimmed(category: Category) -> Rgb {
    dimmed(category_color(category))
}
