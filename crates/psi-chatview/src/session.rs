//! A chat view session.
//!
//! The session owns all per-chat state: the transcript, the scroller, the
//! user map, grouping state and pending link header requests. It starts idle and
//! becomes active after a single successful [`Session::init`]. Records are
//! then fed one at a time through [`Session::receive`], in arrival order.
//!
//! Every record is processed in isolation: a failure is reported as an
//! error banner in the transcript and the session keeps going.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, FixedOffset, Local};
use serde_json::Value;
use tracing::{debug, debug_span, error, info, warn};

use psi_chatview_model::{AvatarEvent, ChatEvent, HostRecord, MessageType, ReplaceEvent};

use crate::config::ThemeConfig;
use crate::datetime::DateTimeFormatter;
use crate::error::{ChatViewError, Result};
use crate::grouping::GroupingKey;
use crate::hooks::{HookRegistry, ProxyDecision};
use crate::host::{ChatHost, HeaderReply};
use crate::html::{escape_attr, escape_html};
use crate::preview::{PreviewKind, is_previewable_url};
use crate::resolve::{VarContext, VarResolver, resolver_for};
use crate::scroll::{Scroller, Viewport};
use crate::template::Template;
use crate::templates::{Role, TemplateSet};
use crate::transcript::{LinkId, Segment, Transcript, replace_key, segments_to_html};
use crate::users::UserMap;

/// Banner shown when a record arrives before initialisation.
pub const NOT_INITIALIZED_MESSAGE: &str = "A try to output data while theme is not inited. \
     output is impossible.\nCheck if your theme does not have errors.";

/// Banner shown on a second initialisation.
pub const DOUBLE_INIT_MESSAGE: &str =
    "Theme should not be inited twice. Something wrong with theme.";

/// Prefix of per-record failure banners.
pub const APPEND_ERROR_PREFIX: &str = "APPEND ERROR: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for [`Session::init`].
    Idle,
    /// Rendering records.
    Active,
}

/// What became of a record.
#[derive(Debug)]
pub enum Outcome {
    Appended { grouped: bool },
    Replaced,
    Cleared,
    TrackbarMoved,
    /// Session data changed without visible output.
    Updated,
    HookCalled,
    Ignored,
    /// The proxy dropped the record.
    Stopped,
    NotInitialized,
    /// Reported with an error banner.
    Failed(ChatViewError),
}

impl Outcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::NotInitialized)
    }
}

struct ActiveTheme {
    config: ThemeConfig,
    templates: TemplateSet,
    resolver: Box<dyn VarResolver>,
    date_format: DateTimeFormatter,
}

pub struct Session<H> {
    host: H,
    theme: Option<ActiveTheme>,
    hooks: HookRegistry,
    transcript: Transcript,
    scroller: Scroller,
    users: UserMap,
    /// Key of the open message group; set only while its slot exists.
    group: Option<GroupingKey>,
    pending_headers: HashMap<String, LinkId>,
    next_transaction: u64,
    delivered: HashSet<String>,
    settings: BTreeMap<String, Value>,
    opened: DateTime<FixedOffset>,
}

impl<H: ChatHost> Session<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            theme: None,
            hooks: HookRegistry::default(),
            transcript: Transcript::new(),
            scroller: Scroller::default(),
            users: UserMap::default(),
            group: None,
            pending_headers: HashMap::new(),
            next_transaction: 0,
            delivered: HashSet::new(),
            settings: BTreeMap::new(),
            opened: Local::now().fixed_offset(),
        }
    }

    /// Override the session opening time.
    #[must_use]
    pub fn with_opened(mut self, opened: DateTime<FixedOffset>) -> Self {
        self.opened = opened;
        self
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.theme.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Hooks may be registered before or after initialisation.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn scroller(&self) -> &Scroller {
        &self.scroller
    }

    pub fn scroller_mut(&mut self) -> &mut Scroller {
        &mut self.scroller
    }

    pub fn users(&self) -> &UserMap {
        &self.users
    }

    /// Whether a delivery receipt arrived for message `id`.
    #[must_use]
    pub fn is_delivered(&self, id: &str) -> bool {
        self.delivered.contains(id)
    }

    pub fn settings(&self) -> &BTreeMap<String, Value> {
        &self.settings
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.transcript.to_html()
    }

    /// Activate the theme. Only the first call succeeds.
    pub fn init(&mut self, config: ThemeConfig) -> Result<()> {
        if self.theme.is_some() {
            error!("theme initialized twice");
            self.transcript.push_banner(DOUBLE_INIT_MESSAGE);
            return Err(ChatViewError::AlreadyInitialized);
        }
        let templates = TemplateSet::from_config(&config);
        let resolver = resolver_for(config.dialect);
        let date_format = DateTimeFormatter::new(&config.date_format);
        self.scroller = Scroller::new(config.animate_scroll);
        info!(
            dialect = ?config.dialect,
            grouping = config.grouping,
            previews = config.link_previews,
            "theme initialized"
        );
        self.theme = Some(ActiveTheme {
            config,
            templates,
            resolver,
            date_format,
        });
        Ok(())
    }

    /// Decode and process one JSON record.
    pub fn receive_json(&mut self, text: &str) -> Outcome {
        match HostRecord::from_json(text) {
            Ok(record) => self.receive(record),
            Err(error) if self.theme.is_some() => self.fail(error.into()),
            Err(error) => {
                warn!(%error, "malformed record before theme initialization");
                self.transcript.push_banner(NOT_INITIALIZED_MESSAGE);
                Outcome::NotInitialized
            }
        }
    }

    /// Process one record.
    pub fn receive(&mut self, record: HostRecord) -> Outcome {
        let span = debug_span!("record", kind = record.kind());
        let _guard = span.enter();
        if self.theme.is_none() {
            warn!("record before theme initialization");
            self.transcript.push_banner(NOT_INITIALIZED_MESSAGE);
            return Outcome::NotInitialized;
        }
        match self.process(record) {
            Ok(outcome) => outcome,
            Err(error) => self.fail(error),
        }
    }

    /// Host-initiated scroll by `delta` pixels. Returns the new offset.
    pub fn scroll_by(&mut self, delta: i32, view: &Viewport) -> u32 {
        self.scroller.cancel();
        let target = i64::from(view.offset) + i64::from(delta);
        let clamped = target.clamp(0, i64::from(view.max_offset()));
        u32::try_from(clamped).unwrap_or_default()
    }

    fn fail(&mut self, error: ChatViewError) -> Outcome {
        error!(%error, "failed to render record");
        let text = format!("{APPEND_ERROR_PREFIX}{error}");
        self.host.console(&text);
        self.transcript.push_banner(text);
        self.scroller.invalidate();
        Outcome::Failed(error)
    }

    fn process(&mut self, record: HostRecord) -> Result<Outcome> {
        let mut custom = None;
        if let Some(proxy) = self.hooks.proxy() {
            match proxy.filter(&record) {
                ProxyDecision::Continue => {}
                ProxyDecision::Stop => return Ok(Outcome::Stopped),
                ProxyDecision::Render(template) => custom = Some(template),
            }
        }

        match record {
            HostRecord::Message(event) => self.render_event(event, custom.as_ref()),
            HostRecord::Replace(replace) => self.replace(replace, custom.as_ref()),
            HostRecord::Clear => {
                self.transcript.clear();
                self.group = None;
                self.pending_headers.clear();
                Ok(Outcome::Cleared)
            }
            HostRecord::Trackbar => self.trackbar(),
            HostRecord::Avatar(avatar) => {
                self.set_avatar(&avatar);
                Ok(Outcome::Updated)
            }
            HostRecord::Js(call) => {
                self.hooks
                    .call(&call.name, &mut self.transcript, &call.args)?;
                self.scroller.invalidate();
                Ok(Outcome::HookCalled)
            }
            HostRecord::Tranend(end) => {
                let Some(link) = self.pending_headers.remove(&end.id) else {
                    debug!(transaction = %end.id, "no pending header request");
                    return Ok(Outcome::Ignored);
                };
                if let Some(url) = self.transcript.link(link).map(|link| link.url.clone()) {
                    self.apply_preview(link, &url, end.header("content-type"));
                }
                Ok(Outcome::Updated)
            }
            HostRecord::Receipt(receipt) => {
                self.delivered.insert(receipt.id);
                Ok(Outcome::Updated)
            }
            HostRecord::Settings(update) => {
                self.settings.extend(update.values);
                Ok(Outcome::Updated)
            }
            HostRecord::Unknown => Ok(Outcome::Ignored),
        }
    }

    fn render_event(&mut self, mut event: ChatEvent, custom: Option<&Template>) -> Result<Outcome> {
        let theme = self.theme.as_ref().ok_or(ChatViewError::NotInitialized)?;
        let chat = event.mtype.is_chat();
        if !chat {
            self.group = None;
            self.transcript.remove_slot();
        }
        learn_user(&mut self.users, &event);
        if event.mtype == MessageType::Urls {
            event.message = Some(urls_html(&event.urls));
        }

        let key = GroupingKey::of(&event);
        let continuation = chat
            && custom.is_none()
            && theme.config.grouping
            && self.group.as_ref().is_some_and(|prev| prev.continues(&key))
            && self.transcript.has_slot()
            && theme.templates.get(Role::next(event.local)).is_some();

        theme.resolver.prepare(&mut event, continuation);
        let template = match custom {
            Some(template) => template,
            None => {
                let role = Role::for_event(&event, continuation).ok_or_else(|| {
                    ChatViewError::TemplateNotFound {
                        kind: event.mtype.to_string(),
                    }
                })?;
                theme
                    .templates
                    .get(role)
                    .ok_or_else(|| ChatViewError::TemplateNotFound {
                        kind: role.as_str().to_string(),
                    })?
            }
        };

        let ctx = VarContext {
            event: &event,
            host: &self.host,
            users: &self.users,
            date_format: &theme.date_format,
            avatars: &theme.config.avatars,
            chat_name: &theme.config.chat_name,
            opened: self.opened,
            now: Local::now().fixed_offset(),
        };
        let rendered = template.render(theme.resolver.as_ref(), &self.hooks, &ctx);
        let has_slot = rendered.iter().any(|segment| matches!(segment, Segment::Slot));
        let previews = theme.config.link_previews;

        let segments = self.transcript.linkify(rendered);
        let links = collect_links(&segments);
        if continuation {
            self.transcript.insert_before_slot(segments)?;
        } else {
            self.transcript.remove_slot();
            self.transcript.append(segments);
        }
        self.group = (chat && has_slot).then_some(key);

        if chat && event.local {
            self.scroller.force();
        } else {
            self.scroller.invalidate();
        }
        debug!(
            mtype = %event.mtype,
            grouped = continuation,
            links = links.len(),
            "rendered event"
        );
        if previews {
            self.request_link_headers(links);
        }
        Ok(Outcome::Appended {
            grouped: continuation,
        })
    }

    /// Swap the body of an earlier message, or render the record as a new
    /// message when the original is not in the transcript.
    fn replace(&mut self, replace: ReplaceEvent, custom: Option<&Template>) -> Result<Outcome> {
        let ReplaceEvent {
            replace_id,
            mut event,
        } = replace;
        let is_muc = self.host.is_muc();
        let sender = event.sender.clone().unwrap_or_default();
        let new_id = event
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| replace_id.clone());
        let old_key = replace_key(is_muc, event.local, &sender, &replace_id);
        let new_key = replace_key(is_muc, event.local, &sender, &new_id);

        let body = self
            .transcript
            .linkify(vec![Segment::Html(event.message.clone().unwrap_or_default())]);
        let links = collect_links(&body);
        if self.transcript.replace_message(&old_key, &new_key, body) {
            debug!(from = %old_key, to = %new_key, "message replaced");
            self.scroller.invalidate();
            if self
                .theme
                .as_ref()
                .is_some_and(|theme| theme.config.link_previews)
            {
                self.request_link_headers(links);
            }
            return Ok(Outcome::Replaced);
        }

        debug!(replace_id = %replace_id, "replaced message not found, appending");
        event.mtype = MessageType::Message;
        self.render_event(event, custom)
    }

    fn trackbar(&mut self) -> Result<Outcome> {
        let theme = self.theme.as_ref().ok_or(ChatViewError::NotInitialized)?;
        let template =
            theme
                .templates
                .get(Role::Trackbar)
                .ok_or_else(|| ChatViewError::TemplateNotFound {
                    kind: Role::Trackbar.as_str().to_string(),
                })?;
        let event = ChatEvent::default();
        let ctx = VarContext {
            event: &event,
            host: &self.host,
            users: &self.users,
            date_format: &theme.date_format,
            avatars: &theme.config.avatars,
            chat_name: &theme.config.chat_name,
            opened: self.opened,
            now: Local::now().fixed_offset(),
        };
        let html = segments_to_html(&template.render(theme.resolver.as_ref(), &self.hooks, &ctx));
        self.transcript.move_trackbar_to_end(html);
        self.group = None;
        self.transcript.remove_slot();
        self.scroller.invalidate();
        Ok(Outcome::TrackbarMoved)
    }

    fn set_avatar(&mut self, avatar: &AvatarEvent) {
        match avatar.sender.as_deref() {
            Some(nick) if self.host.is_muc() => self.users.set_avatar(nick, &avatar.avatar),
            _ if avatar.local => self.users.set_local_avatar(&avatar.avatar),
            _ => self.users.set_remote_avatar(&avatar.avatar),
        }
    }

    fn request_link_headers(&mut self, links: Vec<(LinkId, String)>) {
        for (link, url) in links {
            if let Some(kind) = PreviewKind::youtube(&url) {
                self.transcript.attach_preview(link, kind);
                continue;
            }
            if !is_previewable_url(&url) {
                continue;
            }
            self.next_transaction += 1;
            let transaction = self.next_transaction.to_string();
            match self.host.request_url_headers(&transaction, &url) {
                HeaderReply::Ready(headers) => {
                    let content_type = headers
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
                        .map(|(_, value)| value.as_str());
                    self.apply_preview(link, &url, content_type);
                }
                HeaderReply::Pending => {
                    debug!(%transaction, %url, "header request pending");
                    self.pending_headers.insert(transaction, link);
                }
                HeaderReply::Unsupported => self.apply_preview(link, &url, None),
            }
        }
    }

    fn apply_preview(&mut self, link: LinkId, url: &str, content_type: Option<&str>) {
        let kind = content_type
            .and_then(PreviewKind::from_content_type)
            .or_else(|| PreviewKind::from_extension(url));
        if let Some(kind) = kind
            && self.transcript.attach_preview(link, kind)
        {
            self.scroller.invalidate();
        }
    }
}

/// Remember avatars and colours announced with presence events.
fn learn_user(users: &mut UserMap, event: &ChatEvent) {
    let Some(nick) = event.sender.as_deref() else {
        return;
    };
    match event.mtype {
        MessageType::Join => {
            if let Some(avatar) = &event.avatar {
                users.set_avatar(nick, avatar);
            }
            if let Some(color) = &event.nickcolor {
                users.set_nick_color(nick, color);
            }
        }
        MessageType::NewNick => {
            if let Some(new) = &event.newnick {
                users.rename(nick, new);
            }
        }
        _ => {}
    }
}

/// Body of a `urls` event: one link per line.
fn urls_html(urls: &BTreeMap<String, String>) -> String {
    urls.iter()
        .map(|(url, title)| {
            let text = if title.is_empty() { url } else { title };
            format!(r#"<a href="{}">{}</a>"#, escape_attr(url), escape_html(text))
        })
        .collect::<Vec<_>>()
        .join("<br/>")
}

fn collect_links(segments: &[Segment]) -> Vec<(LinkId, String)> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Link(link) => Some((link.id, link.url.clone())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHost;

    #[test]
    fn test_urls_html() {
        let urls = BTreeMap::from([
            ("https://a.org/?x=1&y=2".to_string(), String::new()),
            ("https://b.org".to_string(), "B <site>".to_string()),
        ]);
        assert_eq!(
            urls_html(&urls),
            r#"<a href="https://a.org/?x=1&amp;y=2">https://a.org/?x=1&amp;y=2</a><br/><a href="https://b.org">B &lt;site&gt;</a>"#
        );
    }

    #[test]
    fn test_scroll_by_cancels_and_clamps() {
        let mut session = Session::new(StaticHost::new(false));
        session.scroller_mut().force();
        let view = Viewport::new(1000, 400, 100);
        assert_eq!(session.scroll_by(-500, &view), 0);
        assert!(!session.scroller().is_animating());
        assert_eq!(session.scroll_by(10_000, &view), 600);
    }

    #[test]
    fn test_join_teaches_avatar() {
        let mut users = UserMap::default();
        let mut event = ChatEvent::new(MessageType::Join);
        event.sender = Some("bob".to_string());
        event.avatar = Some("avatar://bob".to_string());
        event.nickcolor = Some("#abcdef".to_string());
        learn_user(&mut users, &event);
        assert_eq!(users.avatar_for_nick("bob"), Some("avatar://bob"));
        assert_eq!(users.nick_color("bob"), Some("#abcdef"));
    }
}
