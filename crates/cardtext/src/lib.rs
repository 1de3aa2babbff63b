//! # cardtext — card rich text for the terminal
//!
//! The umbrella crate for the cardtext pipeline: it parses the content
//! service's rich-text markup into styled runs and media descriptors, with
//! colors derived from the host terminal's live-detected palette.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use cardtext::{ansi, detect_palette, Document};
//!
//! // Once at startup: ask the terminal for its palette. Falls back to
//! // built-in defaults silently when the terminal stays quiet.
//! detect_palette(Duration::from_millis(300));
//!
//! let doc = Document::parse(
//!     r#"<h2>Review</h2><p>Looks <b>good</b>, see
//!        <a href="/cards/7">the card</a>.</p>"#,
//! );
//!
//! println!("{}", ansi::to_ansi(&doc.runs));
//! for image in &doc.media {
//!     eprintln!("media: {}", image.url);
//! }
//! ```
//!
//! ## Crates
//!
//! - [`cardtext_markup`]: the parser and attachment extractor.
//! - [`cardtext_theme`]: palette detection and the semantic color catalog.
//! - [`ansi`]: runs to an ANSI string, for hosts without their own grid.

pub mod ansi;

pub use cardtext_markup::{
    absolutize, decode_entities, extract_media, parse_markup, Attributes, MediaDescriptor,
    MediaKind, StyledRun, SERVICE_ORIGIN,
};
pub use cardtext_theme::{detect_palette, theme, Category, Color, ColorMode, Palette, Rgb};

use serde::{Deserialize, Serialize};

/// A parsed card body: styled runs and extracted media, both in document
/// order.
///
/// The two sequences come from independent passes over the same markup, so
/// a renderer can lay out text and media separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub runs: Vec<StyledRun>,
    pub media: Vec<MediaDescriptor>,
}

impl Document {
    /// Parses markup into runs and media descriptors.
    pub fn parse(markup: &str) -> Self {
        Self {
            runs: parse_markup(markup),
            media: extract_media(markup),
        }
    }
}
