//! Small HTML helpers.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ICON_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<icon\b((?:[^>"']|"[^"]*"|'[^']*')*?)/?>|</icon\s*>"#)
        .expect("Invalid icon regex")
});

static ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid attribute regex")
});

/// Escape text for use in HTML content.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for use inside a double-quoted attribute.
#[must_use]
pub fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

/// Value of attribute `name` in a tag's attribute list.
pub(crate) fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTR_REGEX.captures_iter(attrs).find_map(|caps| {
        if caps[1].eq_ignore_ascii_case(name) {
            caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
        } else {
            None
        }
    })
}

/// Replace `<icon name="..." text="..."/>` tags with `<img src="icon:..." title="..."/>`.
///
/// Children of a non-empty `<icon>` element are kept after the image.
#[must_use]
pub fn replace_icons(html: &str) -> String {
    if !html.contains("<icon") && !html.contains("<ICON") {
        return html.to_string();
    }
    ICON_REGEX
        .replace_all(html, |caps: &Captures<'_>| match caps.get(1) {
            Some(attrs) => {
                let attrs = attrs.as_str();
                let name = attribute(attrs, "name").unwrap_or_default();
                let text = attribute(attrs, "text").unwrap_or_default();
                format!(
                    r#"<img src="icon:{}" title="{}"/>"#,
                    escape_attr(name),
                    escape_attr(text)
                )
            }
            None => String::new(),
        })
        .into_owned()
}
