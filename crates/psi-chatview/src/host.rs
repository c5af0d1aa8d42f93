//! The seam between the renderer and the application hosting it.

use std::collections::{BTreeMap, HashMap};

use tracing::info;

/// Colour of the local user's nick.
pub const LOCAL_NICK_COLOR: &str = "#0000ff";

/// Palette for remote nicks.
pub const NICK_PALETTE: &[&str] = &[
    "#c0392b", "#d35400", "#b7950b", "#27ae60", "#16a085", "#2980b9", "#8e44ad", "#7f8c8d",
    "#a93226", "#1e8449", "#2471a3", "#6c3483",
];

/// Answer to a header request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderReply {
    /// Headers are available right away.
    Ready(BTreeMap<String, String>),
    /// The host answers later with a `tranend` record carrying the same id.
    Pending,
    /// The host cannot fetch headers; classify by extension.
    Unsupported,
}

/// Services the renderer needs from its host.
pub trait ChatHost {
    /// Whether this is a group chat.
    fn is_muc(&self) -> bool;

    fn default_avatar_url(&self) -> String;

    fn local_user_avatar(&self) -> Option<String>;

    fn remote_user_avatar(&self) -> Option<String>;

    /// Picture associated with the local side of the chat.
    fn local_user_image(&self) -> Option<String> {
        None
    }

    /// Picture associated with the remote side of the chat.
    fn remote_user_image(&self) -> Option<String> {
        None
    }

    /// Colour for a nick.
    fn nick_color(&self, nick: &str, local: bool) -> String {
        if local {
            return LOCAL_NICK_COLOR.to_string();
        }
        let hash = nick
            .bytes()
            .fold(0u32, |hash, byte| hash.wrapping_mul(31).wrapping_add(u32::from(byte)));
        NICK_PALETTE[hash as usize % NICK_PALETTE.len()].to_string()
    }

    /// Start a header request for `url`, correlated by `transaction`.
    fn request_url_headers(&mut self, _transaction: &str, _url: &str) -> HeaderReply {
        HeaderReply::Unsupported
    }

    /// Diagnostic output from the renderer.
    fn console(&self, text: &str) {
        info!(target: "psi_chatview::console", "{text}");
    }
}

/// A host backed by plain data.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    pub muc: bool,
    pub default_avatar: String,
    pub local_avatar: Option<String>,
    pub remote_avatar: Option<String>,
    pub local_image: Option<String>,
    pub remote_image: Option<String>,
    /// Known headers by url.
    pub headers: HashMap<String, BTreeMap<String, String>>,
    /// Answer every header request with [`HeaderReply::Pending`].
    pub deferred_headers: bool,
    /// Header requests made so far, as (transaction, url).
    pub header_requests: Vec<(String, String)>,
}

impl StaticHost {
    #[must_use]
    pub fn new(muc: bool) -> Self {
        Self {
            muc,
            default_avatar: "qrc:/psi/default_avatar".to_string(),
            ..Self::default()
        }
    }
}

impl ChatHost for StaticHost {
    fn is_muc(&self) -> bool {
        self.muc
    }

    fn default_avatar_url(&self) -> String {
        self.default_avatar.clone()
    }

    fn local_user_avatar(&self) -> Option<String> {
        self.local_avatar.clone()
    }

    fn remote_user_avatar(&self) -> Option<String> {
        self.remote_avatar.clone()
    }

    fn local_user_image(&self) -> Option<String> {
        self.local_image.clone()
    }

    fn remote_user_image(&self) -> Option<String> {
        self.remote_image.clone()
    }

    fn request_url_headers(&mut self, transaction: &str, url: &str) -> HeaderReply {
        self.header_requests.push((transaction.to_string(), url.to_string()));
        if self.deferred_headers {
            HeaderReply::Pending
        } else if let Some(headers) = self.headers.get(url) {
            HeaderReply::Ready(headers.clone())
        } else {
            HeaderReply::Unsupported
        }
    }
}
