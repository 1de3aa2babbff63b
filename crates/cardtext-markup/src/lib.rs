//! # cardtext-markup — rich text to styled terminal runs
//!
//! This crate converts the restricted rich-text dialect produced by the
//! content service into two ordered sequences:
//!
//! - styled text runs (`text`, foreground color, inline attributes) for a
//!   terminal grid renderer, via [`parse_markup`];
//! - normalized media descriptors (absolute URL, alt text, dimensions),
//!   via [`extract_media`], an independent pass over the same markup.
//!
//! Colors come from [`cardtext_theme`]'s live catalog, so runs parsed after
//! palette detection settles automatically pick up the terminal's real
//! colors.
//!
//! # Example
//!
//! ```rust
//! use cardtext_markup::{extract_media, parse_markup};
//!
//! let markup = r#"<h1>Release notes</h1><p>Now with <b>bold</b> moves.</p>
//! <img src="/blobs/shot.png" alt="screenshot">"#;
//!
//! let runs = parse_markup(markup);
//! assert!(runs.iter().any(|r| r.text == "bold" && r.attributes.bold));
//!
//! let media = extract_media(markup);
//! assert_eq!(media[0].alt, "screenshot");
//! assert!(media[0].url.starts_with("https://"));
//! ```
//!
//! Malformed markup never errors and never loops: unmatched tags degrade to
//! text, unknown tags are transparent, and a depth guard bounds recursion.

mod attachments;
mod entity;
mod parser;
mod tag;

pub use attachments::{extract_media, MediaDescriptor, MediaKind};
pub use entity::decode_entities;
pub use parser::{parse_markup, Attributes, StyledRun};
pub use tag::{absolutize, SERVICE_ORIGIN};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    // Text with no tag or entity machinery.
    fn plain_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,!?:;'\"-]{1,60}".prop_filter("no markup chars", |s| {
            !s.contains('<') && !s.contains('>') && !s.contains('&')
        })
    }

    // Arbitrary soup of tag fragments, text, and entities. Parsing must
    // terminate and never panic on any of it.
    fn markup_soup() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                plain_text(),
                Just("<b>".to_string()),
                Just("</b>".to_string()),
                Just("<i>".to_string()),
                Just("</i>".to_string()),
                Just("<ol>".to_string()),
                Just("<li>".to_string()),
                Just("</li>".to_string()),
                Just("</ol>".to_string()),
                Just("<br>".to_string()),
                Just("<".to_string()),
                Just(">".to_string()),
                Just("&lt;".to_string()),
                Just("&amp;".to_string()),
                Just("<a href=\"/x\">".to_string()),
                Just("</a>".to_string()),
                Just("<bc-attachment url=\"/b\">".to_string()),
            ],
            0..40,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn plain_text_is_single_ambient_run(text in plain_text()) {
            let runs = parse_markup(&text);
            // Whitespace-only inputs produce nothing; anything else is one run.
            if text.trim().is_empty() {
                prop_assert!(runs.is_empty());
            } else {
                prop_assert_eq!(runs.len(), 1);
                prop_assert_eq!(runs[0].attributes, Attributes::default());
            }
        }

        #[test]
        fn parser_terminates_on_soup(input in markup_soup()) {
            // Totality: no panic, no hang, no empty runs.
            let runs = parse_markup(&input);
            for run in &runs {
                prop_assert!(!run.text.is_empty());
            }
        }

        #[test]
        fn extractor_terminates_on_soup(input in markup_soup()) {
            let media = extract_media(&input);
            for m in &media {
                prop_assert!(!m.url.starts_with('/'));
            }
        }

        #[test]
        fn decode_is_idempotent_on_entity_free(text in plain_text()) {
            let once = decode_entities(&text);
            prop_assert_eq!(decode_entities(&once), once.clone());
        }
    }
}
