//! Recursive-descent markup parser.
//!
//! Converts a markup string into an ordered sequence of [`StyledRun`]s.
//! Style state travels *down* the recursion by value — sibling branches can
//! never observe each other's styles — and list-numbering context is scoped
//! to the nearest enclosing list tag.
//!
//! The outer loop maintains one invariant over the unconsumed input: either
//! no further tag start exists, in which case the rest is emitted as a
//! single run and the loop ends, or a tag start exists, in which case any
//! preceding non-whitespace text is emitted first and the tag is dispatched.
//! Every branch consumes a strictly positive prefix of the remaining input
//! or ends the loop, so parsing terminates on arbitrary input — unmatched
//! tags, unbounded nesting claims, or plain garbage included.
//!
//! Malformed input never errors: unmatched closers are dropped, unmatched
//! openers degrade to scanning the remaining raw text, unknown tags are
//! transparent containers. A rendering glitch beats an aborted display.

use serde::{Deserialize, Serialize};

use cardtext_theme::{theme, Rgb};

use crate::attachments::MediaKind;
use crate::entity::decode_entities;
use crate::tag::{absolutize, attr, find_matching_close, parse_tag_head};

/// Inline attributes carried by a styled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
}

/// A contiguous text span sharing one foreground color and attribute set.
///
/// Produced in document order; the order is significant and preserved
/// end-to-end. Run text is always entity-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub foreground: Rgb,
    pub attributes: Attributes,
}

/// Ambient style at a point in the recursion. Copied, never shared.
#[derive(Debug, Clone, Copy)]
struct StyleState {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    code: bool,
    foreground: Rgb,
}

impl StyleState {
    fn root() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            code: false,
            foreground: theme::text(),
        }
    }

    fn attributes(&self) -> Attributes {
        Attributes {
            bold: self.bold,
            italic: self.italic,
            strikethrough: self.strikethrough,
        }
    }
}

/// The kind and running counter of the nearest enclosing list scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    None,
    Unordered,
    Ordered,
}

#[derive(Debug, Clone, Copy)]
struct ListContext {
    kind: ListKind,
    counter: u32,
}

impl ListContext {
    const NONE: ListContext = ListContext { kind: ListKind::None, counter: 0 };

    fn fresh(kind: ListKind) -> Self {
        Self { kind, counter: 0 }
    }
}

/// Nesting ceiling for recursion; past it, container bodies are emitted as
/// plain text so adversarial nesting cannot exhaust the stack.
const MAX_DEPTH: usize = 64;

const BULLET: &str = "\u{2022} ";
const RULE: &str = "\n\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\n";
const VIDEO_ICON: char = '\u{1f3ac}';
const CLIP_ICON: char = '\u{1f4ce}';

/// Parses a markup string into styled runs, colored from the current theme.
pub fn parse_markup(input: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    parse_into(input, StyleState::root(), ListContext::NONE, 0, &mut runs);
    runs
}

fn parse_into(
    input: &str,
    state: StyleState,
    list: ListContext,
    depth: usize,
    out: &mut Vec<StyledRun>,
) {
    // Counter increments must be visible to sibling items in this body,
    // while child bodies only ever see a copy.
    let mut list = list;
    let mut rest = input;

    loop {
        let Some(lt) = rest.find('<') else {
            emit_text(rest, state, out);
            return;
        };

        emit_text(&rest[..lt], state, out);
        let after_lt = &rest[lt..];

        let Some(gt) = after_lt.find('>') else {
            // No tag end anywhere ahead: the rest is literal text.
            emit_text(after_lt, state, out);
            return;
        };
        let inner = &after_lt[1..gt];
        let after_tag = &after_lt[gt + 1..];

        let Some(head) = parse_tag_head(inner) else {
            // Not tag-shaped. Keep the `<` as text and rescan behind it.
            push_run("<", state, out);
            rest = &after_lt[1..];
            continue;
        };

        if head.closing {
            // A close with no matching open is a no-op.
            rest = after_tag;
            continue;
        }

        let name = head.name.to_ascii_lowercase();
        match name.as_str() {
            "br" => {
                push_run("\n", state, out);
                rest = after_tag;
            }
            "hr" => {
                let mut rule_state = state;
                rule_state.foreground = theme::muted();
                push_run(RULE, rule_state, out);
                rest = after_tag;
            }
            "img" => {
                // Suppressed from the run stream; the attachment extractor
                // owns plain images.
                rest = after_tag;
            }
            "bc-attachment" => {
                emit_attachment(inner, state, out);
                // Attributes carry everything; the body (usually a wrapped
                // <img>) is skipped outright.
                rest = match find_matching_close(after_tag, &name) {
                    Some((_, resume)) => &after_tag[resume..],
                    None => after_tag,
                };
            }
            _ => {
                if head.self_closing {
                    rest = after_tag;
                    continue;
                }
                match find_matching_close(after_tag, &name) {
                    Some((body_end, resume)) => {
                        enter_container(
                            &name,
                            inner,
                            &after_tag[..body_end],
                            state,
                            &mut list,
                            depth,
                            out,
                        );
                        rest = &after_tag[resume..];
                    }
                    None => {
                        // Unmatched open: drop the tag, keep scanning the
                        // remaining raw text.
                        rest = after_tag;
                    }
                }
            }
        }
    }
}

/// Dispatches a container tag: adjusts style/context state and recurses
/// into the body exactly once.
fn enter_container(
    name: &str,
    tag_inner: &str,
    body: &str,
    state: StyleState,
    list: &mut ListContext,
    depth: usize,
    out: &mut Vec<StyledRun>,
) {
    if depth >= MAX_DEPTH {
        // Depth guard: degrade to plain text instead of recursing.
        emit_text(body, state, out);
        return;
    }

    let recurse = |child: StyleState, child_list: ListContext, out: &mut Vec<StyledRun>| {
        parse_into(body, child, child_list, depth + 1, out);
    };

    match name {
        "b" | "strong" => {
            let mut child = state;
            child.bold = true;
            recurse(child, *list, out);
        }
        "i" | "em" => {
            let mut child = state;
            child.italic = true;
            recurse(child, *list, out);
        }
        "del" | "strike" | "s" => {
            let mut child = state;
            child.strikethrough = true;
            recurse(child, *list, out);
        }
        "code" | "pre" => {
            let mut child = state;
            child.code = true;
            child.foreground = theme::warning();
            recurse(child, *list, out);
        }
        "h1" | "h2" | "h3" => {
            let mut child = state;
            child.bold = true;
            child.foreground = match name {
                "h1" => theme::primary(),
                "h2" => theme::secondary(),
                _ => theme::accent(),
            };
            push_run("\n", state, out);
            recurse(child, *list, out);
            push_run("\n", state, out);
        }
        "p" => {
            recurse(state, *list, out);
            push_run("\n", state, out);
        }
        "ul" => {
            recurse(state, ListContext::fresh(ListKind::Unordered), out);
        }
        "ol" => {
            recurse(state, ListContext::fresh(ListKind::Ordered), out);
        }
        "li" => {
            match list.kind {
                ListKind::Unordered => push_run(BULLET, state, out),
                ListKind::Ordered => {
                    list.counter += 1;
                    push_run(&format!("{}. ", list.counter), state, out);
                }
                ListKind::None => {}
            }
            // Bullets belong to the item: any list inside the body opens
            // its own scope.
            recurse(state, ListContext::NONE, out);
            push_run("\n", state, out);
        }
        "blockquote" => {
            let mut child = state;
            child.italic = true;
            child.foreground = theme::muted();
            recurse(child, *list, out);
            push_run("\n", state, out);
        }
        "q" => {
            push_run("\"", state, out);
            recurse(state, *list, out);
            push_run("\"", state, out);
        }
        "a" => {
            let mut child = state;
            child.foreground = theme::accent();
            push_run("[", state, out);
            recurse(child, *list, out);
            push_run("]", state, out);
            if let Some(href) = attr(tag_inner, "href") {
                let mut target_state = state;
                target_state.foreground = theme::muted();
                push_run(&format!("({})", absolutize(&href)), target_state, out);
            }
        }
        // Unknown tags are transparent containers.
        _ => recurse(state, *list, out),
    }
}

/// Emits runs for a rich attachment pseudo-tag based on its attributes.
///
/// Image-typed attachments are suppressed here (the extractor reports
/// them); video-typed and everything else — including absent or
/// unrecognized content types — render as an icon plus a bracketed label.
fn emit_attachment(tag_inner: &str, state: StyleState, out: &mut Vec<StyledRun>) {
    let content_type = attr(tag_inner, "content-type");
    let kind = MediaKind::from_content_type(content_type.as_deref());
    if kind == MediaKind::Image {
        return;
    }

    let url = attr(tag_inner, "url").map(|u| absolutize(&u));
    let label = attr(tag_inner, "caption")
        .or_else(|| attr(tag_inner, "filename"))
        .or_else(|| url.clone())
        .unwrap_or_default();

    let icon = match kind {
        MediaKind::Video => VIDEO_ICON,
        _ => CLIP_ICON,
    };
    let mut label_state = state;
    label_state.foreground = theme::accent();
    push_run(&format!("{icon} [{label}]"), label_state, out);

    if let Some(url) = url {
        let mut url_state = state;
        url_state.foreground = theme::muted();
        push_run(&format!(" ({url})"), url_state, out);
    }
}

/// Emits a text fragment under the ambient style.
///
/// Outside code context, entity-decoded text has its whitespace runs
/// collapsed to single spaces and purely-whitespace fragments are skipped;
/// inside code context raw whitespace is preserved.
fn emit_text(text: &str, state: StyleState, out: &mut Vec<StyledRun>) {
    if text.is_empty() {
        return;
    }
    let decoded = decode_entities(text);
    if state.code {
        push_run(&decoded, state, out);
        return;
    }
    if decoded.trim().is_empty() {
        return;
    }
    push_run(&collapse_whitespace(&decoded), state, out);
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_whitespace = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

fn push_run(text: &str, state: StyleState, out: &mut Vec<StyledRun>) {
    if text.is_empty() {
        return;
    }
    out.push(StyledRun {
        text: text.to_string(),
        foreground: state.foreground,
        attributes: state.attributes(),
    });
}
