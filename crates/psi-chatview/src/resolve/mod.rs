//! Template variable resolution.
//!
//! Each theme dialect gets a [`VarResolver`] strategy. Resolvers read the
//! event being rendered plus session data through a [`VarContext`]; they
//! never mutate the session. Dialects that need derived fields (message
//! classes, decorated bodies) compute them up front in
//! [`VarResolver::prepare`].

mod adium;
mod psi;

use chrono::{DateTime, FixedOffset};

use psi_chatview_model::ChatEvent;

use crate::config::{DefaultAvatars, Dialect};
use crate::datetime::DateTimeFormatter;
use crate::host::ChatHost;
use crate::html::escape_html;
use crate::transcript::{Segment, replace_key};
use crate::users::UserMap;

pub use adium::AdiumResolver;
pub use psi::PsiResolver;

/// Value of a template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// HTML text.
    Text(String),
    /// Structured content such as a replaceable message body.
    Segments(Vec<Segment>),
    /// The grouping slot.
    Slot,
}

/// Everything a resolver may look at while rendering one event.
pub struct VarContext<'a> {
    pub event: &'a ChatEvent,
    pub host: &'a dyn ChatHost,
    pub users: &'a UserMap,
    pub date_format: &'a DateTimeFormatter,
    pub avatars: &'a DefaultAvatars,
    pub chat_name: &'a str,
    /// When the session was opened.
    pub opened: DateTime<FixedOffset>,
    /// Used for events without a timestamp.
    pub now: DateTime<FixedOffset>,
}

/// Dialect-specific variable resolution.
pub trait VarResolver {
    fn dialect(&self) -> Dialect;

    /// Derive dialect fields on `event` before rendering.
    ///
    /// `continuation` tells whether the event continues the previous group.
    fn prepare(&self, _event: &mut ChatEvent, _continuation: bool) {}

    fn resolve(&self, name: &str, param: Option<&str>, ctx: &VarContext<'_>) -> Resolved;
}

/// Resolver for a dialect.
#[must_use]
pub fn resolver_for(dialect: Dialect) -> Box<dyn VarResolver> {
    match dialect {
        Dialect::Psi => Box::new(PsiResolver),
        Dialect::Adium => Box::new(AdiumResolver),
    }
}

/// Escaped sender nick.
fn sender(ctx: &VarContext<'_>) -> Resolved {
    Resolved::Text(escape_html(ctx.event.sender.as_deref().unwrap_or_default()))
}

/// Message body, wrapped in replace markers when the event has a non-empty id.
fn message(ctx: &VarContext<'_>) -> Resolved {
    let event = ctx.event;
    let body = event.message.clone().unwrap_or_default();
    match event.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => {
            let key = replace_key(
                ctx.host.is_muc(),
                event.local,
                event.sender.as_deref().unwrap_or_default(),
                id,
            );
            Resolved::Segments(vec![
                Segment::ReplaceStart(key.clone()),
                Segment::Html(body),
                Segment::ReplaceEnd(key),
            ])
        }
        None => Resolved::Text(body),
    }
}

/// Avatar of the event's author.
///
/// In group chats remote authors are looked up by nick; one-to-one chats
/// use the remote side's avatar.
fn user_avatar(ctx: &VarContext<'_>, local_default: String, remote_default: String) -> String {
    let event = ctx.event;
    if event.local {
        return ctx
            .users
            .local_avatar()
            .map(str::to_string)
            .or_else(|| ctx.host.local_user_avatar())
            .unwrap_or(local_default);
    }
    if ctx.host.is_muc()
        && let Some(nick) = event.sender.as_deref()
    {
        return ctx
            .users
            .avatar_for_nick(nick)
            .map_or(remote_default, str::to_string);
    }
    ctx.users
        .remote_avatar()
        .map(str::to_string)
        .or_else(|| ctx.host.remote_user_avatar())
        .unwrap_or(remote_default)
}

fn sender_color(ctx: &VarContext<'_>) -> String {
    let event = ctx.event;
    let nick = event.sender.as_deref().unwrap_or_default();
    event
        .nickcolor
        .clone()
        .or_else(|| ctx.users.nick_color(nick).map(str::to_string))
        .unwrap_or_else(|| ctx.host.nick_color(nick, event.local))
}

/// Timestamp of the event, or now.
fn event_time(ctx: &VarContext<'_>) -> DateTime<FixedOffset> {
    ctx.event.time.unwrap_or(ctx.now)
}
