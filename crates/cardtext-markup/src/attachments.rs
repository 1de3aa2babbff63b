//! Attachment and image extraction.
//!
//! An independent pass over the same raw markup the parser sees: it never
//! interleaves with run production, so the rendering adapter can lay out
//! text and media separately. Rich attachments with an `image/*`
//! content-type come first, then plain `img` tags, each in document order.

use serde::{Deserialize, Serialize};

use crate::tag::{absolutize, attr, scan_open_tags};

/// Classification of an embedded media reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    /// Classifies by MIME content-type prefix. Absent and unrecognized
    /// types are [`MediaKind::Other`].
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.starts_with("image/") => Self::Image,
            Some(ct) if ct.starts_with("video/") => Self::Video,
            _ => Self::Other,
        }
    }
}

/// A normalized media reference extracted from markup.
///
/// The URL is always absolute (service-relative sources are rewritten
/// against the fixed origin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub url: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub kind: MediaKind,
}

/// Extracts image references from raw markup, in document order.
///
/// Rich `bc-attachment` tags whose content-type begins with `image/` are
/// collected first, then plain `img` tags. An `img` whose normalized source
/// is already represented by an earlier descriptor is skipped — rich
/// attachments usually wrap a plain `img` for the same blob, and one
/// reference per blob is enough.
pub fn extract_media(input: &str) -> Vec<MediaDescriptor> {
    let mut media: Vec<MediaDescriptor> = Vec::new();

    for tag in scan_open_tags(input, "bc-attachment") {
        let content_type = attr(tag, "content-type");
        if MediaKind::from_content_type(content_type.as_deref()) != MediaKind::Image {
            continue;
        }
        let Some(url) = attr(tag, "url") else {
            continue;
        };
        media.push(MediaDescriptor {
            url: absolutize(&url),
            alt: attr(tag, "caption")
                .or_else(|| attr(tag, "filename"))
                .unwrap_or_default(),
            width: dimension(tag, "width"),
            height: dimension(tag, "height"),
            kind: MediaKind::Image,
        });
    }

    for tag in scan_open_tags(input, "img") {
        let Some(src) = attr(tag, "src") else {
            continue;
        };
        let url = absolutize(&src);
        if media.iter().any(|m| m.url == url) {
            continue;
        }
        media.push(MediaDescriptor {
            url,
            alt: attr(tag, "alt").unwrap_or_default(),
            width: dimension(tag, "width"),
            height: dimension(tag, "height"),
            kind: MediaKind::Image,
        });
    }

    media
}

fn dimension(tag: &str, name: &str) -> Option<u32> {
    attr(tag, name)?.trim().parse().ok()
}
