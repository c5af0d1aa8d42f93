use chrono::Local;
use serde_json::Value;

use psi_chatview_model::{ChatEvent, MessageType};

use super::{
    Resolved, VarContext, VarResolver, event_time, message, sender, sender_color, user_avatar,
};
use crate::config::Dialect;
use crate::datetime::DateTimeFormatter;
use crate::html::escape_html;

/// Time variables and their default TR35 patterns.
const TIME_VARS: &[(&str, &str)] = &[
    ("time", "h:mm"),
    ("shortTime", "h:mm"),
    ("dateOpened", "EEEE LL"),
    ("timeOpened", "h:mm"),
];

/// Shown in place of the time column of date separators.
const DATE_SEPARATOR_TIME: &str = "&nbsp; &nbsp; &nbsp; &nbsp; &nbsp;";

const SENDER_STATUS_ICON: &str = "/psiicon/status/online";

/// Adium message style variables.
///
/// Message classes, the status name and decorated bodies are derived in
/// [`VarResolver::prepare`] and stored on the event, so templates can use
/// `%messageClasses%` and `%status%` like in Adium itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdiumResolver;

impl AdiumResolver {
    /// Adium status name for presence kinds.
    #[must_use]
    pub fn status_name(mtype: &MessageType) -> Option<&'static str> {
        match mtype {
            MessageType::Join => Some("contact_joined"),
            MessageType::Part => Some("contact_left"),
            _ => None,
        }
    }
}

impl VarResolver for AdiumResolver {
    fn dialect(&self) -> Dialect {
        Dialect::Adium
    }

    fn prepare(&self, event: &mut ChatEvent, continuation: bool) {
        let mut classes = vec![if event.local { "outgoing" } else { "incoming" }];
        if event.alert {
            classes.push("mention");
        }
        if event.spooled {
            classes.push("history");
        }
        if event.mtype == MessageType::System {
            classes.push("event");
        }
        if let Some(status) = Self::status_name(&event.mtype) {
            event.extra.insert("status".to_string(), Value::from(status));
            classes.push(status);
        }

        match event.mtype {
            MessageType::Message => {
                classes.push("message");
                if continuation {
                    classes.push("consecutive");
                }
                event
                    .extra
                    .insert("senderStatusIcon".to_string(), Value::from(SENDER_STATUS_ICON));
            }
            MessageType::Join | MessageType::Part | MessageType::NewNick | MessageType::Status => {
                classes.push("status");
                append_usertext(event);
            }
            MessageType::System => append_usertext(event),
            MessageType::LastDate => {
                let when = event
                    .date
                    .or(event.time)
                    .unwrap_or_else(|| Local::now().fixed_offset());
                event.message = Some(DateTimeFormatter::new("EEEE, LL").format(&when));
                event
                    .extra
                    .insert("time".to_string(), Value::from(DATE_SEPARATOR_TIME));
                classes.extend(["event", "date_separator"]);
            }
            MessageType::Subject => {
                if let Some(topic) = &event.usertext {
                    let body = event.message.get_or_insert_with(String::new);
                    body.push_str("<br/>");
                    body.push_str(topic);
                }
                classes.push("event");
            }
            MessageType::Urls => classes.push("event"),
            _ => {}
        }

        event
            .extra
            .insert("messageClasses".to_string(), Value::from(classes.join(" ")));
    }

    fn resolve(&self, name: &str, param: Option<&str>, ctx: &VarContext<'_>) -> Resolved {
        let event = ctx.event;
        if let Some((_, default)) = TIME_VARS.iter().find(|(var, _)| *var == name) {
            if let Some(text) = extra_text(event, name) {
                return Resolved::Text(text);
            }
            let formatter = DateTimeFormatter::new(param.unwrap_or(default));
            let when = if name.ends_with("Opened") {
                ctx.opened
            } else {
                event_time(ctx)
            };
            return Resolved::Text(formatter.format(&when));
        }

        let fallback = || ctx.host.default_avatar_url();
        match name {
            "sender" => sender(ctx),
            "date" => Resolved::Text(
                event
                    .date
                    .map(|date| DateTimeFormatter::new("yyyy-MM-dd").format(&date))
                    .unwrap_or_default(),
            ),
            "userIconPath" => {
                let outgoing = ctx.avatars.outgoing_buddy.clone().unwrap_or_else(fallback);
                let incoming = ctx.avatars.incoming_buddy.clone().unwrap_or_else(fallback);
                Resolved::Text(user_avatar(ctx, outgoing, incoming))
            }
            "incomingIconPath" => Resolved::Text(
                ctx.host
                    .remote_user_image()
                    .or_else(|| ctx.avatars.incoming_image.clone())
                    .unwrap_or_else(fallback),
            ),
            "outgoingIconPath" => Resolved::Text(
                ctx.host
                    .local_user_image()
                    .or_else(|| ctx.avatars.outgoing_image.clone())
                    .unwrap_or_else(fallback),
            ),
            "senderColor" => Resolved::Text(sender_color(ctx)),
            "message" => message(ctx),
            "insert" => Resolved::Slot,
            "chatName" => Resolved::Text(escape_html(ctx.chat_name)),
            other => Resolved::Text(
                extra_text(event, other)
                    .or_else(|| event.field(other))
                    .unwrap_or_default(),
            ),
        }
    }
}

/// String-valued derived field.
fn extra_text(event: &ChatEvent, name: &str) -> Option<String> {
    match event.extra.get(name) {
        Some(Value::String(text)) => Some(text.clone()),
        _ => None,
    }
}

/// Status changes show their free text in parentheses.
fn append_usertext(event: &mut ChatEvent) {
    if event.nostatus {
        return;
    }
    if let Some(usertext) = event.usertext.as_deref().filter(|text| !text.is_empty()) {
        let body = event.message.get_or_insert_with(String::new);
        body.push_str(" (");
        body.push_str(usertext);
        body.push(')');
    }
}
