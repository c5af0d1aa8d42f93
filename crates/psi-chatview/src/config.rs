//! Theme configuration supplied at session initialisation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default time format of Psi themes.
pub const DEFAULT_DATE_FORMAT: &str = "HH:mm:ss";

/// Template dialect a theme is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Native themes: `%next%` grouping slot, `%avatarurl%`, named templates.
    #[default]
    Psi,
    /// Adium message styles: per-file templates, `<div id="insert">`.
    Adium,
}

/// Fallback avatar pictures bundled with a theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAvatars {
    #[serde(default)]
    pub incoming_buddy: Option<String>,
    #[serde(default)]
    pub outgoing_buddy: Option<String>,
    #[serde(default)]
    pub incoming_image: Option<String>,
    #[serde(default)]
    pub outgoing_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub dialect: Dialect,
    /// Raw templates by name (Psi) or resource path (Adium).
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Combine consecutive messages of one sender.
    #[serde(default = "enabled")]
    pub grouping: bool,
    #[serde(default)]
    pub animate_scroll: bool,
    #[serde(default = "enabled")]
    pub link_previews: bool,
    #[serde(default)]
    pub chat_name: String,
    #[serde(default)]
    pub avatars: DefaultAvatars,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn enabled() -> bool {
    true
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            templates: BTreeMap::new(),
            date_format: default_date_format(),
            grouping: true,
            animate_scroll: false,
            link_previews: true,
            chat_name: String::new(),
            avatars: DefaultAvatars::default(),
        }
    }
}

impl ThemeConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Add or replace a template.
    #[must_use]
    pub fn with_template(mut self, name: &str, raw: &str) -> Self {
        self.templates.insert(name.to_string(), raw.to_string());
        self
    }

    #[must_use]
    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }
}
