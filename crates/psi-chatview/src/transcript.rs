//! The rendered transcript.
//!
//! The transcript is an ordered list of [`Segment`]s rather than a DOM. Besides
//! plain HTML it keeps the structural pieces the renderer mutates later:
//! replace markers around editable message bodies, the grouping slot of the
//! last message group, links awaiting a preview, the trackbar and error
//! banners.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ChatViewError, Result};
use crate::html::{attribute, escape_attr, escape_html, replace_icons};
use crate::preview::PreviewKind;

static ANCHOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b((?:[^>"']|"[^"]*"|'[^']*')*)>.*?</a\s*>"#)
        .expect("Invalid anchor regex")
});

/// Identifier of a link within a transcript.
pub type LinkId = u64;

/// Inline style of error banners.
pub const BANNER_STYLE: &str = "background-color:red;color:white;border:1px solid black;\
                                padding:1em;margin:1em;font-weight:bold";

/// A hyperlink that may get an inline preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub url: String,
    /// The complete `<a>` element.
    pub html: String,
    pub preview: Option<PreviewKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Html(String),
    /// Opening marker of a replaceable message body.
    ReplaceStart(String),
    /// Closing marker of a replaceable message body.
    ReplaceEnd(String),
    /// Where the next message of the current group is inserted.
    Slot,
    Link(Link),
    Trackbar(String),
    /// Visible error report.
    Banner(String),
}

/// Flatten segments to HTML.
#[must_use]
pub fn segments_to_html(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        segment.write_html(&mut out);
    }
    out
}

impl Segment {
    fn write_html(&self, out: &mut String) {
        match self {
            Self::Html(html) | Self::Trackbar(html) => out.push_str(html),
            Self::ReplaceStart(key) => {
                out.push_str(&format!(r#"<psims mid="{}"></psims>"#, escape_attr(key)));
            }
            Self::ReplaceEnd(key) => {
                out.push_str(&format!(r#"<psime mid="{}"></psime>"#, escape_attr(key)));
            }
            Self::Slot => {}
            Self::Link(link) => {
                out.push_str(&link.html);
                if let Some(preview) = &link.preview {
                    out.push_str(&preview.to_html(&link.url));
                }
            }
            Self::Banner(text) => {
                out.push_str(&format!(
                    r#"<div style="{BANNER_STYLE}">{}</div>"#,
                    escape_html(text).replace('\n', "<br/>")
                ));
            }
        }
    }
}

/// Marker key of a replaceable message.
///
/// Group chats key by sender nick, one-to-one chats by direction.
#[must_use]
pub fn replace_key(is_muc: bool, local: bool, sender: &str, id: &str) -> String {
    if is_muc {
        format!("{sender}:{id}")
    } else if local {
        format!("l:{id}")
    } else {
        format!("r:{id}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    segments: Vec<Segment>,
    next_link: LinkId,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Turn rendered HTML into segments: icons become images and anchors
    /// become [`Link`]s with fresh ids.
    pub fn linkify(&mut self, segments: Vec<Segment>) -> Vec<Segment> {
        let mut out = Vec::with_capacity(segments.len());
        for segment in segments {
            let Segment::Html(html) = segment else {
                out.push(segment);
                continue;
            };
            let html = replace_icons(&html);
            let mut last = 0;
            for caps in ANCHOR_REGEX.captures_iter(&html) {
                let (Some(whole), Some(attrs)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let Some(href) = attribute(attrs.as_str(), "href") else {
                    continue;
                };
                if whole.start() > last {
                    out.push(Segment::Html(html[last..whole.start()].to_string()));
                }
                self.next_link += 1;
                out.push(Segment::Link(Link {
                    id: self.next_link,
                    url: href.replace("&amp;", "&"),
                    html: whole.as_str().to_string(),
                    preview: None,
                }));
                last = whole.end();
            }
            if last < html.len() {
                out.push(Segment::Html(html[last..].to_string()));
            }
        }
        out
    }

    /// Append segments at the end.
    pub fn append(&mut self, segments: Vec<Segment>) {
        self.segments.extend(segments);
    }

    /// Append an error banner.
    pub fn push_banner(&mut self, text: impl Into<String>) {
        self.segments.push(Segment::Banner(text.into()));
    }

    #[must_use]
    pub fn has_slot(&self) -> bool {
        self.slot_index().is_some()
    }

    fn slot_index(&self) -> Option<usize> {
        self.segments
            .iter()
            .position(|segment| matches!(segment, Segment::Slot))
    }

    /// Insert a continuation before the current grouping slot, which is then
    /// removed. A slot contained in `segments` becomes the new one.
    pub fn insert_before_slot(&mut self, segments: Vec<Segment>) -> Result<()> {
        let index = self.slot_index().ok_or(ChatViewError::MissingSlot)?;
        let count = segments.len();
        self.segments.splice(index..index, segments);
        self.segments.remove(index + count);
        Ok(())
    }

    /// Drop the grouping slot, if any.
    pub fn remove_slot(&mut self) {
        if let Some(index) = self.slot_index() {
            self.segments.remove(index);
        }
    }

    /// Replace the message body marked with `key`, re-marking it with `new_key`.
    ///
    /// Returns `false` when no message carries `key`.
    pub fn replace_message(&mut self, key: &str, new_key: &str, body: Vec<Segment>) -> bool {
        let Some(start) = self
            .segments
            .iter()
            .position(|segment| matches!(segment, Segment::ReplaceStart(k) if k == key))
        else {
            return false;
        };
        let Some(len) = self.segments[start..]
            .iter()
            .position(|segment| matches!(segment, Segment::ReplaceEnd(k) if k == key))
        else {
            return false;
        };
        let mut replacement = Vec::with_capacity(body.len() + 2);
        replacement.push(Segment::ReplaceStart(new_key.to_string()));
        replacement.extend(body);
        replacement.push(Segment::ReplaceEnd(new_key.to_string()));
        self.segments.splice(start..=start + len, replacement);
        true
    }

    /// Place the trackbar at the end, removing any earlier one.
    pub fn move_trackbar_to_end(&mut self, html: String) {
        self.segments
            .retain(|segment| !matches!(segment, Segment::Trackbar(_)));
        self.segments.push(Segment::Trackbar(html));
    }

    /// Attach a preview to a link. Returns `false` if the link is gone.
    pub fn attach_preview(&mut self, id: LinkId, kind: PreviewKind) -> bool {
        for segment in &mut self.segments {
            if let Segment::Link(link) = segment
                && link.id == id
            {
                link.preview = Some(kind);
                return true;
            }
        }
        false
    }

    #[must_use]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Link(link) if link.id == id => Some(link),
            _ => None,
        })
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        segments_to_html(&self.segments)
    }
}
