//! The templates of an initialised theme, by role.
//!
//! Themes rarely define every template. Each dialect fills the gaps with
//! its own fallback chain so that every role except the grouping
//! continuations always has a template.

use std::collections::{BTreeMap, HashMap};

use psi_chatview_model::{ChatEvent, MessageType};

use crate::config::{Dialect, ThemeConfig};
use crate::template::Template;

/// Default trackbar markup.
pub const DEFAULT_TRACKBAR: &str = "<hr/>";

/// What a template is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Received,
    Sent,
    /// Continuation of a received group.
    ReceivedNext,
    /// Continuation of a sent group.
    SentNext,
    Status,
    /// Status change carrying free text.
    StatusUt,
    System,
    SystemUt,
    LastDate,
    Subject,
    Urls,
    Trackbar,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Sent => "sent",
            Self::ReceivedNext => "received_next",
            Self::SentNext => "sent_next",
            Self::Status => "status",
            Self::StatusUt => "status_ut",
            Self::System => "system",
            Self::SystemUt => "system_ut",
            Self::LastDate => "last_date",
            Self::Subject => "subject",
            Self::Urls => "urls",
            Self::Trackbar => "trackbar",
        }
    }

    /// Role for an event. Returns `None` for kinds no template renders.
    #[must_use]
    pub fn for_event(event: &ChatEvent, continuation: bool) -> Option<Self> {
        let has_usertext = event.usertext.as_deref().is_some_and(|text| !text.is_empty());
        let role = match event.mtype {
            MessageType::Message => match (continuation, event.local) {
                (true, true) => Self::SentNext,
                (true, false) => Self::ReceivedNext,
                (false, true) => Self::Sent,
                (false, false) => Self::Received,
            },
            MessageType::Join | MessageType::Part | MessageType::NewNick | MessageType::Status => {
                if has_usertext {
                    Self::StatusUt
                } else {
                    Self::Status
                }
            }
            MessageType::System => {
                if has_usertext {
                    Self::SystemUt
                } else {
                    Self::System
                }
            }
            MessageType::LastDate => Self::LastDate,
            MessageType::Subject => Self::Subject,
            MessageType::Urls => Self::Urls,
            MessageType::FtReq | MessageType::FtFin | MessageType::Other(_) => return None,
        };
        Some(role)
    }

    /// Continuation role of a chat role.
    #[must_use]
    pub fn next(local: bool) -> Self {
        if local { Self::SentNext } else { Self::ReceivedNext }
    }
}

#[derive(Debug, Clone)]
pub struct TemplateSet {
    dialect: Dialect,
    templates: HashMap<Role, Template>,
}

impl TemplateSet {
    /// Build the set for a configuration's dialect.
    #[must_use]
    pub fn from_config(config: &ThemeConfig) -> Self {
        match config.dialect {
            Dialect::Psi => Self::psi(&config.templates),
            Dialect::Adium => Self::adium(&config.templates),
        }
    }

    /// Native themes name their templates (`receivedMessage`, `sys`, ...).
    #[must_use]
    pub fn psi(raw: &BTreeMap<String, String>) -> Self {
        let get = |name: &str| {
            raw.get(name)
                .filter(|text| !text.is_empty())
                .map(|text| Template::parse(text))
        };
        let message = get("message").unwrap_or_else(|| Template::parse("%message%"));
        let sys = get("sys").unwrap_or_else(|| Template::parse("%message%"));
        let sys_message = get("sysMessage").unwrap_or_else(|| sys.clone());
        let sys_message_ut = get("sysMessageUT").unwrap_or_else(|| sys_message.clone());
        let status_message_ut = get("statusMessageUT")
            .or_else(|| get("statusMessage"))
            .unwrap_or_else(|| sys_message_ut.clone());
        let status_message = get("statusMessage").unwrap_or_else(|| sys_message.clone());
        let grouping = get("messageGroupping");

        let mut templates = HashMap::new();
        templates.insert(
            Role::Sent,
            get("sentMessage").unwrap_or_else(|| message.clone()),
        );
        templates.insert(Role::Received, get("receivedMessage").unwrap_or(message));
        if let Some(next) = get("sentMessageGroupping").or_else(|| grouping.clone()) {
            templates.insert(Role::SentNext, next);
        }
        if let Some(next) = get("receivedMessageGroupping").or(grouping) {
            templates.insert(Role::ReceivedNext, next);
        }
        templates.insert(Role::Status, status_message);
        templates.insert(Role::StatusUt, status_message_ut);
        templates.insert(Role::System, sys_message);
        templates.insert(Role::SystemUt, sys_message_ut);
        templates.insert(
            Role::LastDate,
            get("lastMsgDate").unwrap_or_else(|| sys.clone()),
        );
        templates.insert(
            Role::Subject,
            get("subject").unwrap_or_else(|| sys.clone()),
        );
        templates.insert(Role::Urls, get("urls").unwrap_or(sys));
        templates.insert(
            Role::Trackbar,
            get("trackbar").unwrap_or_else(|| Template::parse(DEFAULT_TRACKBAR)),
        );
        Self {
            dialect: Dialect::Psi,
            templates,
        }
    }

    /// Adium styles keep templates in resource files (`Incoming/Content.html`, ...).
    ///
    /// Every non-chat kind uses `Status.html`.
    #[must_use]
    pub fn adium(raw: &BTreeMap<String, String>) -> Self {
        let get = |name: &str| {
            raw.get(name)
                .filter(|text| !text.is_empty())
                .map(|text| Template::parse_adium(text))
        };
        let content = get("Content.html").unwrap_or_else(|| Template::parse("%message%"));
        let status = get("Status.html").unwrap_or_else(|| Template::parse("%message%"));
        let incoming = get("Incoming/Content.html").unwrap_or(content);
        let outgoing = get("Outgoing/Content.html").unwrap_or_else(|| incoming.clone());
        let incoming_next =
            get("Incoming/NextContent.html").unwrap_or_else(|| incoming.clone());
        let outgoing_next =
            get("Outgoing/NextContent.html").unwrap_or_else(|| outgoing.clone());

        let mut templates = HashMap::new();
        templates.insert(Role::Received, incoming);
        templates.insert(Role::Sent, outgoing);
        templates.insert(Role::ReceivedNext, incoming_next);
        templates.insert(Role::SentNext, outgoing_next);
        for role in [
            Role::Status,
            Role::StatusUt,
            Role::System,
            Role::SystemUt,
            Role::LastDate,
            Role::Subject,
            Role::Urls,
        ] {
            templates.insert(role, status.clone());
        }
        templates.insert(Role::Trackbar, Template::parse(DEFAULT_TRACKBAR));
        Self {
            dialect: Dialect::Adium,
            templates,
        }
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn get(&self, role: Role) -> Option<&Template> {
        self.templates.get(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Part;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(name, text)| ((*name).to_string(), (*text).to_string()))
            .collect()
    }

    fn text_of(set: &TemplateSet, role: Role) -> String {
        set.get(role)
            .unwrap()
            .render_text(|name, _| format!("<{name}>"))
    }

    #[test]
    fn test_psi_fallbacks() {
        let set = TemplateSet::psi(&raw(&[
            ("message", "M %message%"),
            ("sys", "S %message%"),
            ("statusMessage", "ST %message%"),
        ]));
        assert_eq!(text_of(&set, Role::Sent), "M <message>");
        assert_eq!(text_of(&set, Role::Received), "M <message>");
        assert_eq!(text_of(&set, Role::System), "S <message>");
        assert_eq!(text_of(&set, Role::SystemUt), "S <message>");
        assert_eq!(text_of(&set, Role::Status), "ST <message>");
        assert_eq!(text_of(&set, Role::StatusUt), "ST <message>");
        assert_eq!(text_of(&set, Role::Subject), "S <message>");
        assert_eq!(text_of(&set, Role::Trackbar), "<hr/>");
        assert!(set.get(Role::ReceivedNext).is_none());
        assert!(set.get(Role::SentNext).is_none());
    }

    #[test]
    fn test_psi_shared_grouping_template() {
        let set = TemplateSet::psi(&raw(&[
            ("messageGroupping", "%message%%next%"),
            ("sentMessageGroupping", "> %message%%next%"),
        ]));
        assert_eq!(text_of(&set, Role::SentNext), "> <message><next>");
        assert_eq!(text_of(&set, Role::ReceivedNext), "<message><next>");
    }

    #[test]
    fn test_adium_fallbacks() {
        let set = TemplateSet::adium(&raw(&[
            ("Content.html", r#"<p>%message%</p><div id="insert"></div>"#),
            ("Outgoing/NextContent.html", "<q>%message%</q>"),
            ("Status.html", "<i>%message%</i>"),
        ]));
        assert_eq!(set.dialect(), Dialect::Adium);
        assert!(set.get(Role::Received).unwrap().has_var("insert"));
        assert!(set.get(Role::Sent).unwrap().has_var("insert"));
        assert!(set.get(Role::ReceivedNext).unwrap().has_var("insert"));
        assert_eq!(text_of(&set, Role::SentNext), "<q><message></q>");
        assert_eq!(text_of(&set, Role::LastDate), "<i><message></i>");
        assert_eq!(
            set.get(Role::Urls).unwrap().parts()[0],
            Part::Text("<i>".to_string())
        );
    }

    #[test]
    fn test_role_selection() {
        let mut event = ChatEvent::chat("me", "x", true);
        assert_eq!(Role::for_event(&event, false), Some(Role::Sent));
        assert_eq!(Role::for_event(&event, true), Some(Role::SentNext));
        event.mtype = MessageType::Part;
        assert_eq!(Role::for_event(&event, false), Some(Role::Status));
        event.usertext = Some("bye".to_string());
        assert_eq!(Role::for_event(&event, false), Some(Role::StatusUt));
        event.mtype = MessageType::FtReq;
        assert_eq!(Role::for_event(&event, false), None);
    }
}
