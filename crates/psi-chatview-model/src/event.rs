//! Chat event payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kind::MessageType;
use crate::timestamp;

/// A renderable event: a chat line or a system/status notice.
///
/// Fields the renderer does not model are kept in [`ChatEvent::extra`] so
/// that themes can still reference them as template variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEvent {
    #[serde(default)]
    pub mtype: MessageType,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<DateTime<FixedOffset>>,
    /// Date of a `lastDate` separator.
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<FixedOffset>>,
    /// HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Free text attached to a status change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usertext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<String>,
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub emote: bool,
    /// Replayed from history.
    #[serde(default)]
    pub spooled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Mentions the local user.
    #[serde(default)]
    pub alert: bool,
    #[serde(default)]
    pub awaiting_receipt: bool,
    /// Link url to title.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub urls: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Suppress the usertext of a status change.
    #[serde(default)]
    pub nostatus: bool,
    #[serde(default)]
    pub nopartjoin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newnick: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickcolor: Option<String>,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ChatEvent {
    /// An event of the given kind with every other field defaulted.
    #[must_use]
    pub fn new(mtype: MessageType) -> Self {
        Self {
            mtype,
            ..Self::default()
        }
    }

    /// A chat line from `sender`.
    #[must_use]
    pub fn chat(sender: &str, message: &str, local: bool) -> Self {
        Self {
            sender: Some(sender.to_string()),
            userid: Some(sender.to_string()),
            message: Some(message.to_string()),
            local,
            ..Self::default()
        }
    }

    /// Textual value of a field by its wire name.
    ///
    /// Booleans render as `true`/`false`; unset optional fields and unknown
    /// names yield `None`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        let flag = |value: bool| Some(value.to_string());
        match name {
            "mtype" => Some(self.mtype.to_string()),
            "time" => self.time.map(|time| time.to_rfc3339()),
            "date" => self.date.map(|date| date.to_rfc3339()),
            "message" => self.message.clone(),
            "usertext" => self.usertext.clone(),
            "sender" => self.sender.clone(),
            "userid" => self.userid.clone(),
            "local" => flag(self.local),
            "emote" => flag(self.emote),
            "spooled" => flag(self.spooled),
            "id" => self.id.clone(),
            "alert" => flag(self.alert),
            "awaitingReceipt" => flag(self.awaiting_receipt),
            "status" => self.status.map(|status| status.to_string()),
            "priority" => self.priority.map(|priority| priority.to_string()),
            "nostatus" => flag(self.nostatus),
            "nopartjoin" => flag(self.nopartjoin),
            "newnick" => self.newnick.clone(),
            "avatar" => self.avatar.clone(),
            "nickcolor" => self.nickcolor.clone(),
            "encrypted" => flag(self.encrypted),
            other => self.extra.get(other).map(value_text),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Replacement of an earlier message (message correction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceEvent {
    /// Id of the message being replaced.
    #[serde(rename = "replaceId")]
    pub replace_id: String,
    #[serde(flatten)]
    pub event: ChatEvent,
}

/// Avatar change for a participant (or for the local/remote side of a 1:1 chat).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarEvent {
    #[serde(default)]
    pub sender: Option<String>,
    pub avatar: String,
    #[serde(default)]
    pub local: bool,
}

/// Invocation of a named renderer hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookCall {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Completion of a network transaction started by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnd {
    pub id: String,
    /// Response headers.
    #[serde(default)]
    pub value: BTreeMap<String, String>,
}

impl TransactionEnd {
    /// Header lookup, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.value
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Delivery receipt for a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    #[serde(default)]
    pub encrypted: bool,
}

/// Host settings push; the renderer keeps the values verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}
