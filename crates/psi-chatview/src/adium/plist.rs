//! `Contents/Info.plist` of an Adium message style.
//!
//! Only the flat top-level dictionary is read. A key of the form
//! `Name:Variant` stores a per-variant override instead of a plain value.
//! Values other than strings, integers and booleans are kept as unset.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlistValue {
    String(String),
    Integer(i64),
    Bool(bool),
}

impl PlistValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::String(text) => text.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Non-empty strings, non-zero integers and `true`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::String(text) => !text.is_empty(),
            Self::Integer(value) => *value != 0,
            Self::Bool(value) => *value,
        }
    }
}

impl fmt::Display for PlistValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoPlist {
    values: BTreeMap<String, PlistValue>,
    variants: BTreeMap<String, BTreeMap<String, Option<PlistValue>>>,
}

impl InfoPlist {
    pub fn load(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    pub fn parse(xml: &str) -> Result<Self> {
        let mut plist = Self::default();
        let mut reader = Reader::from_str(xml);
        let mut depth = 0usize;
        let mut key: Option<String> = None;
        let mut leaf: Option<(String, String)> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    depth += 1;
                    if depth == 3 {
                        leaf = Some((tag_name(&start), String::new()));
                    }
                }
                Event::End(_) => {
                    if depth == 3
                        && let Some((tag, raw)) = leaf.take()
                    {
                        plist.accept(&mut key, &tag, &raw);
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Empty(start) if depth == 2 => {
                    plist.accept(&mut key, &tag_name(&start), "");
                }
                Event::Text(text) if depth == 3 => {
                    if let Some((_, raw)) = leaf.as_mut() {
                        raw.push_str(&String::from_utf8_lossy(&text));
                    }
                }
                Event::GeneralRef(reference) if depth == 3 => {
                    if let Some((_, raw)) = leaf.as_mut() {
                        raw.push('&');
                        raw.push_str(&String::from_utf8_lossy(&reference));
                        raw.push(';');
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        debug!(
            keys = plist.values.len(),
            variants = plist.variants.len(),
            "parsed Info.plist"
        );
        Ok(plist)
    }

    /// Handle one child of the top-level dictionary.
    fn accept(&mut self, key: &mut Option<String>, tag: &str, raw: &str) {
        if tag == "key" {
            *key = Some(unescape(raw).into_owned());
            return;
        }
        let Some(full_key) = key.as_deref() else {
            return;
        };
        let value = match tag {
            "string" => Some(PlistValue::String(unescape(raw).into_owned())),
            "integer" => raw.trim().parse().ok().map(PlistValue::Integer),
            "true" => Some(PlistValue::Bool(true)),
            "false" => Some(PlistValue::Bool(false)),
            _ => None,
        };
        let parts: Vec<&str> = full_key.split(':').collect();
        match parts.as_slice() {
            [name, variant] => {
                self.variants
                    .entry((*variant).to_string())
                    .or_default()
                    .insert((*name).to_string(), value);
            }
            _ => {
                let name = parts.first().copied().unwrap_or_default().to_string();
                match value {
                    Some(value) => {
                        self.values.insert(name, value);
                    }
                    None => {
                        self.values.remove(&name);
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: PlistValue) {
        self.values.insert(key.into(), value);
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PlistValue::as_str)
    }

    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(PlistValue::is_truthy)
    }

    /// `CFBundleName`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get_str("CFBundleName")
    }

    #[must_use]
    pub fn default_variant(&self) -> Option<&str> {
        self.get_str("DefaultVariant").filter(|name| !name.is_empty())
    }

    /// Names of variants with overrides.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&BTreeMap<String, Option<PlistValue>>> {
        self.variants.get(name)
    }

    /// Copy with the default variant's overrides applied.
    #[must_use]
    pub fn effective(&self) -> Self {
        let mut plist = self.clone();
        let overrides = self
            .default_variant()
            .and_then(|name| self.variants.get(name));
        if let Some(overrides) = overrides {
            for (key, value) in overrides {
                match value {
                    Some(value) => {
                        plist.values.insert(key.clone(), value.clone());
                    }
                    None => {
                        plist.values.remove(key);
                    }
                }
            }
        }
        plist
    }
}

fn tag_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn unescape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw))
}
