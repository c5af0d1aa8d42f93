//! Consecutive message grouping.

use psi_chatview_model::{ChatEvent, MessageType};

/// The fields two chat events must share to be shown as one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingKey {
    pub mtype: MessageType,
    pub userid: Option<String>,
    pub emote: bool,
    pub local: bool,
}

impl GroupingKey {
    #[must_use]
    pub fn of(event: &ChatEvent) -> Self {
        Self {
            mtype: event.mtype.clone(),
            userid: event.userid.clone(),
            emote: event.emote,
            local: event.local,
        }
    }

    /// Whether `next` continues the group started by `self`.
    #[must_use]
    pub fn continues(&self, next: &Self) -> bool {
        self == next && self.mtype.is_chat()
    }
}
