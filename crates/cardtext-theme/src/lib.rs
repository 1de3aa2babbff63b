//! # cardtext-theme — live-palette adaptive theming
//!
//! Colors for the cardtext rendering pipeline come from the *host terminal*,
//! not from fixed values: a one-shot, timeout-bounded probe asks the
//! terminal for its 16 ANSI colors and default foreground/background, and
//! the semantic catalog derives every color from whatever that returned (or
//! from built-in fallbacks when the terminal stayed silent).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use cardtext_theme::{detect, theme};
//!
//! // Once, at startup. Never blocks readers, never fails outward.
//! detect::detect_palette(Duration::from_millis(300));
//!
//! // Anywhere, any time: recomputed from the live palette per access.
//! let heading = theme::primary();
//! let de_emphasized = theme::muted();
//! let label = theme::category_color(cardtext_theme::Category::from_name("bug"));
//! ```
//!
//! ## Pieces
//!
//! - [`color`]: pure color arithmetic (hex, mix, lighten/darken, luminance).
//! - [`palette`]: the process-wide 16-slot + fg/bg palette cell, written at
//!   most once after load.
//! - [`detect`]: the OSC 4/10/11 round-trip that fills it.
//! - [`theme`]: the semantic catalog and category color tables.

pub mod color;
pub mod detect;
pub mod palette;
pub mod theme;

pub use color::{Color, Rgb};
pub use detect::detect_palette;
pub use palette::{set_mode_detector, ColorMode, Palette};
pub use theme::Category;
