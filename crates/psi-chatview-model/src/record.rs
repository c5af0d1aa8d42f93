use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, Result};
use crate::event::{
    AvatarEvent, ChatEvent, HookCall, Receipt, ReplaceEvent, SettingsUpdate, TransactionEnd,
};

/// One record pushed by the host into the renderer, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostRecord {
    Message(ChatEvent),
    Replace(ReplaceEvent),
    Clear,
    Trackbar,
    Avatar(AvatarEvent),
    Js(HookCall),
    Tranend(TransactionEnd),
    Receipt(Receipt),
    Settings(SettingsUpdate),
    /// Any record type this renderer does not know; ignored.
    #[serde(other)]
    Unknown,
}

impl HostRecord {
    /// Decode a record from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Decode a record from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ModelError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Wire name of the record type.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Replace(_) => "replace",
            Self::Clear => "clear",
            Self::Trackbar => "trackbar",
            Self::Avatar(_) => "avatar",
            Self::Js(_) => "js",
            Self::Tranend(_) => "tranend",
            Self::Receipt(_) => "receipt",
            Self::Settings(_) => "settings",
            Self::Unknown => "unknown",
        }
    }
}
