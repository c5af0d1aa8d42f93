use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a chat event (`mtype` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    /// A chat line.
    #[default]
    Message,
    System,
    Status,
    Subject,
    Urls,
    Join,
    Part,
    NewNick,
    /// Date separator.
    LastDate,
    /// File transfer request.
    FtReq,
    /// File transfer finished.
    FtFin,
    Other(String),
}

impl MessageType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Message => "message",
            Self::System => "system",
            Self::Status => "status",
            Self::Subject => "subject",
            Self::Urls => "urls",
            Self::Join => "join",
            Self::Part => "part",
            Self::NewNick => "newnick",
            Self::LastDate => "lastDate",
            Self::FtReq => "ftreq",
            Self::FtFin => "ftfin",
            Self::Other(name) => name,
        }
    }

    /// Whether this is a chat line (the only kind that can be grouped or replaced).
    #[must_use]
    pub fn is_chat(&self) -> bool {
        matches!(self, Self::Message)
    }

    /// Presence change kinds (join, part, status, nick change).
    #[must_use]
    pub fn is_presence(&self) -> bool {
        matches!(self, Self::Join | Self::Part | Self::Status | Self::NewNick)
    }
}

impl From<String> for MessageType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "message" => Self::Message,
            "system" => Self::System,
            "status" => Self::Status,
            "subject" => Self::Subject,
            "urls" => Self::Urls,
            "join" => Self::Join,
            "part" => Self::Part,
            "newnick" => Self::NewNick,
            "lastDate" => Self::LastDate,
            "ftreq" => Self::FtReq,
            "ftfin" => Self::FtFin,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for MessageType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<MessageType> for String {
    fn from(value: MessageType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip() {
        for name in [
            "message", "system", "status", "subject", "urls", "join", "part", "newnick",
            "lastDate", "ftreq", "ftfin",
        ] {
            assert_eq!(MessageType::from(name).as_str(), name);
        }
    }

    #[test]
    fn unknown_name_is_kept() {
        let kind = MessageType::from("receipt");
        assert_eq!(kind, MessageType::Other("receipt".to_string()));
        assert!(!kind.is_chat());
    }
}
