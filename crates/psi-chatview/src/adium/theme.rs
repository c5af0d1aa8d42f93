//! Adium message style loader.
//!
//! A style is a bundle directory:
//!
//! ```text
//! Foo.AdiumMessageStyle/
//!   Contents/
//!     Info.plist
//!     Resources/
//!       main.css
//!       Template.html          (optional)
//!       Header.html Footer.html Topic.html Status.html Content.html
//!       Incoming/Content.html Incoming/NextContent.html ...
//!       Outgoing/Content.html Outgoing/NextContent.html ...
//!       Variants/*.css
//! ```
//!
//! File names are matched case-insensitively.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::{NoExpand, Regex};
use tracing::{debug, info};

use psi_chatview_model::{ChatEvent, MessageType};

use super::plist::{InfoPlist, PlistValue};
use crate::config::{DefaultAvatars, Dialect, ThemeConfig};
use crate::datetime::{DateTimeFormatter, FALLBACK_PATTERN};
use crate::error::{ChatViewError, Result};
use crate::host::ChatHost;
use crate::resolve::{AdiumResolver, Resolved, VarContext, VarResolver};
use crate::template::Template;
use crate::transcript::segments_to_html;
use crate::users::UserMap;

/// Page template used when a style ships none.
pub const BUILTIN_TEMPLATE: &str = include_str!("Template.html");

/// Template files read from `Contents/Resources`.
pub const RESOURCE_FILES: &[&str] = &[
    "FileTransferRequest.html",
    "Footer.html",
    "Header.html",
    "Status.html",
    "Topic.html",
    "Content.html",
    "Incoming/Content.html",
    "Incoming/NextContent.html",
    "Incoming/Context.html",
    "Incoming/NextContext.html",
    "Outgoing/Content.html",
    "Outgoing/NextContent.html",
    "Outgoing/Context.html",
    "Outgoing/NextContext.html",
];

/// Resources that make up message templates.
const MESSAGE_TEMPLATES: &[&str] = &[
    "Status.html",
    "Content.html",
    "Incoming/Content.html",
    "Incoming/NextContent.html",
    "Outgoing/Content.html",
    "Outgoing/NextContent.html",
];

const INCOMING_BUDDY_ICON: &str = "Incoming/buddy_icon.png";
const OUTGOING_BUDDY_ICON: &str = "Outgoing/buddy_icon.png";
const INCOMING_ICON: &str = "incoming_icon.png";
const OUTGOING_ICON: &str = "outgoing_icon.png";


static HEAD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head>").expect("Invalid head regex"));

#[derive(Debug, Clone)]
pub struct AdiumTheme {
    resources_dir: PathBuf,
    plist: InfoPlist,
    version: i64,
    template_html: String,
    resources: BTreeMap<String, String>,
    avatars: DefaultAvatars,
}

impl AdiumTheme {
    /// Load a style bundle from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ChatViewError::ThemeNotFound(dir.to_path_buf()));
        }
        let plist_path = find_case_insensitive(dir, "Contents/Info.plist")
            .ok_or_else(|| ChatViewError::MissingResource("Contents/Info.plist".to_string()))?;
        let resources_dir = find_case_insensitive(dir, "Contents/Resources")
            .ok_or_else(|| ChatViewError::MissingResource("Contents/Resources".to_string()))?;
        let mut plist = InfoPlist::load(&plist_path)?;

        let mut resources = BTreeMap::new();
        for name in RESOURCE_FILES {
            if let Some(path) = find_case_insensitive(&resources_dir, name) {
                resources.insert((*name).to_string(), std::fs::read_to_string(path)?);
            }
        }

        let present = |name: &str| {
            find_case_insensitive(&resources_dir, name).map(|_| name.to_string())
        };
        let avatars = DefaultAvatars {
            incoming_buddy: present(INCOMING_BUDDY_ICON),
            outgoing_buddy: present(OUTGOING_BUDDY_ICON),
            incoming_image: present(INCOMING_ICON),
            outgoing_image: present(OUTGOING_ICON),
        };

        let template_html = find_case_insensitive(&resources_dir, "Template.html")
            .map(std::fs::read_to_string)
            .transpose()?
            .filter(|html| !html.is_empty());
        let declared = plist.get("MessageViewVersion").and_then(PlistValue::as_i64);
        let (version, template_html) = match template_html {
            Some(html) => (declared.unwrap_or_else(|| guess_version(&html)), html),
            None => (4, BUILTIN_TEMPLATE.to_string()),
        };
        plist.set("MessageViewVersion", PlistValue::Integer(version));

        info!(
            theme = plist.name().unwrap_or_default(),
            version,
            resources = resources.len(),
            "loaded Adium message style"
        );
        Ok(Self {
            resources_dir,
            plist: plist.effective(),
            version,
            template_html,
            resources,
            avatars,
        })
    }

    /// `CFBundleName`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.plist.name()
    }

    /// Message view version, declared or guessed.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Info.plist with the default variant applied.
    #[must_use]
    pub fn plist(&self) -> &InfoPlist {
        &self.plist
    }

    #[must_use]
    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&str> {
        self.resources.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn avatars(&self) -> &DefaultAvatars {
        &self.avatars
    }

    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.plist.is_truthy("DefaultBackgroundIsTransparent")
    }

    /// Renderer configuration for this style.
    #[must_use]
    pub fn theme_config(&self) -> ThemeConfig {
        let templates = MESSAGE_TEMPLATES
            .iter()
            .filter_map(|name| {
                self.resource(name)
                    .map(|text| ((*name).to_string(), text.to_string()))
            })
            .collect();
        ThemeConfig {
            dialect: Dialect::Adium,
            templates,
            grouping: !self.plist.is_truthy("DisableCombineConsecutive"),
            avatars: self.avatars.clone(),
            ..ThemeConfig::default()
        }
    }

    /// Build the page the transcript is rendered into.
    ///
    /// Header, topic and footer variables resolve like message variables,
    /// with the time variables taken from `opened`. `scripts` is inserted
    /// before the footer.
    #[must_use]
    pub fn session_html(
        &self,
        chat_name: &str,
        base_url: &str,
        host: &dyn ChatHost,
        opened: DateTime<FixedOffset>,
        scripts: &str,
    ) -> String {
        let event = ChatEvent {
            time: Some(opened),
            ..ChatEvent::new(MessageType::System)
        };
        let users = UserMap::default();
        let date_format = DateTimeFormatter::new(FALLBACK_PATTERN);
        let ctx = VarContext {
            event: &event,
            host,
            users: &users,
            date_format: &date_format,
            avatars: &self.avatars,
            chat_name,
            opened,
            now: opened,
        };
        let render = |html: &str| {
            Template::parse(html).render_text(|name, param| {
                match AdiumResolver.resolve(name, param, &ctx) {
                    Resolved::Text(text) => text,
                    Resolved::Segments(segments) => segments_to_html(&segments),
                    Resolved::Slot => String::new(),
                }
            })
        };

        let top = host
            .is_muc()
            .then(|| self.resource("Topic.html"))
            .flatten()
            .filter(|html| !html.is_empty())
            .or_else(|| self.resource("Header.html"))
            .map(render)
            .unwrap_or_default();
        let footer = self.resource("Footer.html").map(render).unwrap_or_default();
        let footer = format!("{scripts}{footer}");

        let replacements: Vec<String> = if self.version < 3 {
            vec![base_url.to_string(), "main.css".to_string(), top, footer]
        } else {
            let variant_css = self
                .plist
                .default_variant()
                .map_or_else(|| "main.css".to_string(), |name| format!("Variants/{name}.css"));
            vec![
                base_url.to_string(),
                r#"@import url( "main.css" );"#.to_string(),
                variant_css,
                top,
                footer,
            ]
        };
        let mut html = substitute_placeholders(&self.template_html, &replacements);

        if !self.is_transparent()
            && let Some(color) = self
                .plist
                .get("DefaultBackgroundColor")
                .filter(|value| value.is_truthy())
        {
            let style = format!(
                r#"<head><style type="text/css" media="screen,print">body {{ background-color:#{color} }}</style>"#
            );
            html = HEAD_REGEX.replacen(&html, 1, NoExpand(&style)).into_owned();
        }

        let mut styles = Vec::new();
        if let Some(family) = self.plist.get("DefaultFontFamily").filter(|v| v.is_truthy()) {
            styles.push(format!("font-family:{family}"));
        }
        if let Some(size) = self.plist.get("DefaultFontSize").filter(|v| v.is_truthy()) {
            styles.push(format!("font-size:{size}pt"));
        }
        debug!(version = self.version, "built session page");
        html.replacen("==bodyBackground==", &styles.join(";"), 1)
    }
}

/// Guess the message view version from the page template.
#[must_use]
pub fn guess_version(template_html: &str) -> i64 {
    if template_html.contains("replaceLastMessage") {
        4
    } else if template_html.contains("appendMessageNoScroll") {
        3
    } else {
        2
    }
}

/// Replace each `%@` with the next replacement; extra placeholders become empty.
fn substitute_placeholders(html: &str, replacements: &[String]) -> String {
    let mut values = replacements.iter();
    let mut out = String::with_capacity(html.len());
    let mut pieces = html.split("%@");
    if let Some(first) = pieces.next() {
        out.push_str(first);
    }
    for piece in pieces {
        if let Some(value) = values.next() {
            out.push_str(value);
        }
        out.push_str(piece);
    }
    out
}

/// Resolve `relative` under `base`, ignoring ASCII case of each component.
fn find_case_insensitive(base: &Path, relative: &str) -> Option<PathBuf> {
    let mut path = base.to_path_buf();
    for component in relative.split('/').filter(|part| !part.is_empty()) {
        let exact = path.join(component);
        if exact.exists() {
            path = exact;
            continue;
        }
        let found = std::fs::read_dir(&path).ok()?.flatten().find(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(component))
        })?;
        path = found.path();
    }
    Some(path)
}
