//! Per-session participant data.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub avatar: Option<String>,
    pub nick_color: Option<String>,
}

/// Avatars and colours learned from the record stream.
#[derive(Debug, Clone, Default)]
pub struct UserMap {
    users: HashMap<String, UserInfo>,
    local_avatar: Option<String>,
    remote_avatar: Option<String>,
}

impl UserMap {
    pub fn set_avatar(&mut self, nick: &str, avatar: &str) {
        self.users.entry(nick.to_string()).or_default().avatar = Some(avatar.to_string());
    }

    pub fn set_nick_color(&mut self, nick: &str, color: &str) {
        self.users.entry(nick.to_string()).or_default().nick_color = Some(color.to_string());
    }

    #[must_use]
    pub fn avatar_for_nick(&self, nick: &str) -> Option<&str> {
        self.users.get(nick)?.avatar.as_deref()
    }

    #[must_use]
    pub fn nick_color(&self, nick: &str) -> Option<&str> {
        self.users.get(nick)?.nick_color.as_deref()
    }

    /// Carry a participant's data over to a new nick.
    pub fn rename(&mut self, old: &str, new: &str) {
        if let Some(info) = self.users.remove(old) {
            self.users.insert(new.to_string(), info);
        }
    }

    pub fn set_local_avatar(&mut self, avatar: &str) {
        self.local_avatar = Some(avatar.to_string());
    }

    pub fn set_remote_avatar(&mut self, avatar: &str) {
        self.remote_avatar = Some(avatar.to_string());
    }

    #[must_use]
    pub fn local_avatar(&self) -> Option<&str> {
        self.local_avatar.as_deref()
    }

    #[must_use]
    pub fn remote_avatar(&self) -> Option<&str> {
        self.remote_avatar.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
