//! `%name%` / `%name{param}%` templates.
//!
//! A template is a sequence of literal text and variable references.
//! Rendering asks a [`VarResolver`] (after any registered variable hook)
//! for each variable and produces transcript [`Segment`]s, so that computed
//! values like the grouping slot or replaceable message markers survive as
//! structure rather than being flattened into a string.

use std::sync::LazyLock;

use regex::Regex;

use crate::hooks::HookRegistry;
use crate::resolve::{Resolved, VarContext, VarResolver};
use crate::transcript::Segment;

static VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(\w+)(?:\{([^{}]+)\})?%").expect("Invalid template variable regex")
});

/// Grouping insertion point of Adium message styles.
pub const ADIUM_INSERT_POINT: &str = r#"<div id="insert"></div>"#;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Var { name: String, param: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    parts: Vec<Part>,
}

impl Template {
    /// Parse a template.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        let mut last = 0;
        for caps in VAR_REGEX.captures_iter(raw) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                parts.push(Part::Text(raw[last..whole.start()].to_string()));
            }
            parts.push(Part::Var {
                name: caps[1].to_string(),
                param: caps.get(2).map(|m| m.as_str().to_string()),
            });
            last = whole.end();
        }
        if last < raw.len() {
            parts.push(Part::Text(raw[last..].to_string()));
        }
        Self { parts }
    }

    /// Parse an Adium message style template, where the literal
    /// [`ADIUM_INSERT_POINT`] marks where consecutive messages go.
    #[must_use]
    pub fn parse_adium(raw: &str) -> Self {
        Self::parse(&raw.replace(ADIUM_INSERT_POINT, "%insert%"))
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Names of referenced variables, in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            Part::Var { name, .. } => Some(name.as_str()),
            Part::Text(_) => None,
        })
    }

    #[must_use]
    pub fn has_var(&self, name: &str) -> bool {
        self.variables().any(|var| var == name)
    }

    /// Render into transcript segments.
    ///
    /// Variable hooks registered under a variable's name take precedence
    /// over the resolver.
    #[must_use]
    pub fn render(
        &self,
        resolver: &dyn VarResolver,
        hooks: &HookRegistry,
        ctx: &VarContext<'_>,
    ) -> Vec<Segment> {
        let mut out = Vec::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => push_html(&mut out, text),
                Part::Var { name, param } => {
                    if let Some(handler) = hooks.var(name) {
                        push_html(&mut out, &handler.value(ctx.event));
                        continue;
                    }
                    match resolver.resolve(name, param.as_deref(), ctx) {
                        Resolved::Text(text) => push_html(&mut out, &text),
                        Resolved::Segments(segments) => {
                            for segment in segments {
                                match segment {
                                    Segment::Html(html) => push_html(&mut out, &html),
                                    other => out.push(other),
                                }
                            }
                        }
                        Resolved::Slot => out.push(Segment::Slot),
                    }
                }
            }
        }
        out
    }

    /// Render to a plain string with a simple lookup, for page chrome such
    /// as headers and footers.
    pub fn render_text<F>(&self, mut lookup: F) -> String
    where
        F: FnMut(&str, Option<&str>) -> String,
    {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Var { name, param } => out.push_str(&lookup(name, param.as_deref())),
            }
        }
        out
    }
}

/// Append HTML, merging with a preceding HTML segment.
fn push_html(out: &mut Vec<Segment>, html: &str) {
    if html.is_empty() {
        return;
    }
    if let Some(Segment::Html(prev)) = out.last_mut() {
        prev.push_str(html);
    } else {
        out.push(Segment::Html(html.to_string()));
    }
}
