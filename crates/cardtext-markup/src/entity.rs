//! Entity escape decoding.
//!
//! The content service escapes a small, fixed set of characters; anything
//! else arrives literal. Decoding happens exactly once, at run-emission
//! time, so no styled run ever carries a raw escape.

/// Decodes the standard entity escapes to their literal characters.
///
/// `&amp;` is decoded last so that double-escaped sequences like
/// `&amp;lt;` come out as the single-decoded `&lt;`, which makes the
/// function idempotent on entity-free text.
pub fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_escapes() {
        assert_eq!(
            decode_entities("&lt;a href=&quot;x&quot;&gt; &amp; it&#39;s&nbsp;here"),
            "<a href=\"x\"> & it's\u{a0}here"
        );
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(decode_entities("hello world"), "hello world");
    }

    #[test]
    fn idempotent_on_entity_free_text() {
        let x = "no escapes < here, just & text";
        assert_eq!(decode_entities(&decode_entities(x)), decode_entities(x));
    }

    #[test]
    fn double_escaped_decodes_once() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }
}
