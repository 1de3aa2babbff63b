//! Low-level tag scanning shared by the parser and the attachment extractor.
//!
//! This is deliberately not an HTML parser: the dialect is restricted and
//! tolerant, so tags are recognized by shape (`<name attrs>` / `</name>`),
//! attributes are pulled out by a quoted-value scan, and anything that does
//! not look like a tag falls back to literal text upstream.

use crate::entity::decode_entities;

/// The content service's own host. Any URL beginning with `/` is prefixed
/// with this to become absolute; it must match the service host exactly.
pub const SERVICE_ORIGIN: &str = "https://3.basecamp.com";

/// Rewrites a service-relative URL (leading `/`) to an absolute one.
pub fn absolutize(url: &str) -> String {
    if url.starts_with('/') {
        format!("{SERVICE_ORIGIN}{url}")
    } else {
        url.to_string()
    }
}

/// The head of a tag, split out of the text between `<` and `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TagHead<'a> {
    /// Lowercase-insensitive comparisons are the caller's job; this is the
    /// raw name slice.
    pub name: &'a str,
    pub closing: bool,
    pub self_closing: bool,
}

/// Parses the inside of a `<...>` pair. Returns `None` when the content does
/// not start like a tag name (so the caller can treat the `<` as text).
pub(crate) fn parse_tag_head(inner: &str) -> Option<TagHead<'_>> {
    let trimmed = inner.trim_start();
    let (closing, rest) = match trimmed.strip_prefix('/') {
        Some(r) => (true, r.trim_start()),
        None => (false, trimmed),
    };

    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(rest.len());
    if name_len == 0 || !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(TagHead {
        name: &rest[..name_len],
        closing,
        self_closing: inner.trim_end().ends_with('/'),
    })
}

/// Extracts an attribute value (`name="value"` or `name='value'`) from a
/// tag's raw interior. Attribute names match case-insensitively; the value
/// is entity-decoded.
pub(crate) fn attr(tag_inner: &str, name: &str) -> Option<String> {
    let lower = tag_inner.to_ascii_lowercase();
    let needle = format!("{name}=");
    let mut search = 0;
    while let Some(found) = lower[search..].find(&needle) {
        let at = search + found;
        let boundary = at == 0 || lower.as_bytes()[at - 1].is_ascii_whitespace();
        let val_start = at + needle.len();
        if boundary && val_start < tag_inner.len() {
            let quote = tag_inner.as_bytes()[val_start];
            if quote == b'"' || quote == b'\'' {
                let body = &tag_inner[val_start + 1..];
                if let Some(end) = body.find(quote as char) {
                    return Some(decode_entities(&body[..end]));
                }
            }
        }
        search = val_start;
    }
    None
}

/// Collects the raw interiors of every `<name ...>` open tag in document
/// order. Used by the attachment extractor's independent passes.
pub(crate) fn scan_open_tags<'a>(input: &'a str, name: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = input;
    while let Some(lt) = rest.find('<') {
        let after_lt = &rest[lt..];
        let Some(gt) = after_lt.find('>') else {
            break;
        };
        let inner = &after_lt[1..gt];
        if let Some(head) = parse_tag_head(inner) {
            if !head.closing && head.name.eq_ignore_ascii_case(name) {
                found.push(inner);
            }
        }
        rest = &after_lt[gt + 1..];
    }
    found
}

/// Finds the close tag matching an already-consumed open tag.
///
/// Scans the remaining input, incrementing a nesting depth on each nested
/// same-name open and decrementing on each close; the match is the close
/// encountered at depth zero. Self-closing same-name tags do not nest.
///
/// Returns `(body_end, resume)` — both byte offsets into `input`: the body
/// runs to `body_end`, parsing resumes at `resume` (past the close tag).
/// `None` means the open tag has no match in the remaining text.
pub(crate) fn find_matching_close(input: &str, name: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut i = 0;
    while let Some(off) = input[i..].find('<') {
        let start = i + off;
        let after_lt = &input[start..];
        let Some(gt) = after_lt.find('>') else {
            return None;
        };
        if let Some(head) = parse_tag_head(&after_lt[1..gt]) {
            if head.name.eq_ignore_ascii_case(name) {
                if head.closing {
                    if depth == 0 {
                        return Some((start, start + gt + 1));
                    }
                    depth -= 1;
                } else if !head.self_closing {
                    depth += 1;
                }
            }
        }
        i = start + gt + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolutize_relative() {
        assert_eq!(
            absolutize("/blobs/42"),
            format!("{SERVICE_ORIGIN}/blobs/42")
        );
    }

    #[test]
    fn absolutize_leaves_absolute_alone() {
        assert_eq!(absolutize("https://example.com/x"), "https://example.com/x");
    }

    #[test]
    fn tag_head_shapes() {
        assert_eq!(
            parse_tag_head("strong"),
            Some(TagHead { name: "strong", closing: false, self_closing: false })
        );
        assert_eq!(
            parse_tag_head("/strong"),
            Some(TagHead { name: "strong", closing: true, self_closing: false })
        );
        assert_eq!(
            parse_tag_head("br/"),
            Some(TagHead { name: "br", closing: false, self_closing: true })
        );
        assert_eq!(
            parse_tag_head("bc-attachment url=\"/x\""),
            Some(TagHead { name: "bc-attachment", closing: false, self_closing: false })
        );
    }

    #[test]
    fn tag_head_rejects_non_tags() {
        assert_eq!(parse_tag_head(""), None);
        assert_eq!(parse_tag_head(" 1 "), None);
        assert_eq!(parse_tag_head("= oops"), None);
    }

    #[test]
    fn attr_double_and_single_quotes() {
        let inner = r#"a href="/cards/7" title='A &amp; B'"#;
        assert_eq!(attr(inner, "href").as_deref(), Some("/cards/7"));
        assert_eq!(attr(inner, "title").as_deref(), Some("A & B"));
        assert_eq!(attr(inner, "missing"), None);
    }

    #[test]
    fn attr_name_needs_boundary() {
        // `data-href` must not satisfy a lookup for `href`.
        let inner = r#"a data-href="/nope" href="/yes""#;
        assert_eq!(attr(inner, "href").as_deref(), Some("/yes"));
    }

    #[test]
    fn attr_is_case_insensitive() {
        let inner = r#"img SRC="/blobs/1.png""#;
        assert_eq!(attr(inner, "src").as_deref(), Some("/blobs/1.png"));
    }

    #[test]
    fn matching_close_skips_nested() {
        let input = "a<b>nested</b>c</b>rest";
        let (body_end, resume) = find_matching_close(input, "b").unwrap();
        assert_eq!(&input[..body_end], "a<b>nested</b>c");
        assert_eq!(&input[resume..], "rest");
    }

    #[test]
    fn matching_close_ignores_self_closing() {
        let input = "x<hr/>y</div>z";
        let (body_end, _) = find_matching_close(input, "div").unwrap();
        assert_eq!(&input[..body_end], "x<hr/>y");
    }

    #[test]
    fn matching_close_absent() {
        assert_eq!(find_matching_close("no close here", "b"), None);
        assert_eq!(find_matching_close("<b>still open", "b"), None);
    }

    #[test]
    fn scan_open_tags_in_order() {
        let input = r#"<img src="/1"><p>x</p><IMG src="/2">"#;
        let tags = scan_open_tags(input, "img");
        assert_eq!(tags.len(), 2);
        assert_eq!(attr(tags[0], "src").as_deref(), Some("/1"));
        assert_eq!(attr(tags[1], "src").as_deref(), Some("/2"));
    }
}
