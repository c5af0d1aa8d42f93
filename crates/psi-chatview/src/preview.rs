//! Inline media previews for links.
//!
//! Links are classified by the `content-type` of a header request when the
//! host can answer one, falling back to the file extension of the url path.
//! YouTube links are recognised from the url alone.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::escape_attr;

static YOUTUBE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/)|youtu\.be/)([\w-]{6,})",
    )
    .expect("Invalid YouTube regex")
});

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "oga", "wav", "flac", "m4a", "opus"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogv", "mov", "mkv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Audio,
    Video,
    Youtube { video_id: String },
}

impl PreviewKind {
    /// Classify by a `content-type` header value.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let (top, _) = mime.split_once('/')?;
        match top {
            "image" => Some(Self::Image),
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    /// Classify by the extension of the url path.
    #[must_use]
    pub fn from_extension(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let file = path.rsplit('/').next().unwrap_or_default();
        let (_, ext) = file.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Audio)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Recognise a YouTube video link.
    #[must_use]
    pub fn youtube(url: &str) -> Option<Self> {
        YOUTUBE_REGEX.captures(url).map(|caps| Self::Youtube {
            video_id: caps[1].to_string(),
        })
    }

    /// Preview element inserted after the link.
    #[must_use]
    pub fn to_html(&self, url: &str) -> String {
        let src = escape_attr(url);
        match self {
            Self::Image => format!(
                r#"<div class="psi-preview"><img src="{src}" style="max-width:100%"/></div>"#
            ),
            Self::Audio => {
                format!(r#"<div class="psi-preview"><audio controls src="{src}"></audio></div>"#)
            }
            Self::Video => format!(
                r#"<div class="psi-preview"><video controls src="{src}" style="max-width:100%"></video></div>"#
            ),
            Self::Youtube { video_id } => format!(
                r#"<div class="psi-preview"><iframe width="560" height="315" src="https://www.youtube.com/embed/{}" frameborder="0" allowfullscreen></iframe></div>"#,
                escape_attr(video_id)
            ),
        }
    }
}

/// Whether a url is worth probing at all.
#[must_use]
pub fn is_previewable_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
