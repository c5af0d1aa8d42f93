//! Chat transcript renderer.
//!
//! The host application feeds a [`Session`] with records (chat messages,
//! status notices, replacements, trackbar moves, ...) and the session keeps
//! an ordered [`Transcript`] that renders to HTML. Themes come in two
//! dialects: native Psi themes with named templates, and Adium message
//! styles loaded from a bundle directory with [`adium::AdiumTheme`].
//!
//! # Example
//!
//! ```
//! use psi_chatview::{Outcome, Session, StaticHost, ThemeConfig};
//!
//! let config = ThemeConfig::default()
//!     .with_template("receivedMessage", "<p>%sender%: %message%</p>");
//! let mut session = Session::new(StaticHost::new(false));
//! session.init(config).unwrap();
//!
//! let outcome = session.receive_json(
//!     r#"{"type":"message","mtype":"message","sender":"alice","userid":"alice","message":"hi"}"#,
//! );
//! assert!(matches!(outcome, Outcome::Appended { grouped: false }));
//! assert_eq!(session.to_html(), "<p>alice: hi</p>");
//! ```

pub mod adium;
mod config;
pub mod datetime;
mod error;
mod grouping;
mod hooks;
mod host;
pub mod html;
mod preview;
pub mod resolve;
mod scroll;
mod session;
mod template;
mod templates;
mod transcript;
mod users;

pub use config::{DEFAULT_DATE_FORMAT, DefaultAvatars, Dialect, ThemeConfig};
pub use error::{ChatViewError, Result};
pub use grouping::GroupingKey;
pub use hooks::{Hook, HookRegistry, Proxy, ProxyDecision, VarHandler};
pub use host::{ChatHost, HeaderReply, LOCAL_NICK_COLOR, NICK_PALETTE, StaticHost};
pub use preview::{PreviewKind, is_previewable_url};
pub use scroll::{MAX_STEP, SNAP_DISTANCE, STEP_INTERVAL_MS, Scroller, Viewport};
pub use session::{
    APPEND_ERROR_PREFIX, DOUBLE_INIT_MESSAGE, NOT_INITIALIZED_MESSAGE, Outcome, Session,
    SessionState,
};
pub use template::{ADIUM_INSERT_POINT, Part, Template};
pub use templates::{DEFAULT_TRACKBAR, Role, TemplateSet};
pub use transcript::{BANNER_STYLE, Link, LinkId, Segment, Transcript, replace_key, segments_to_html};
pub use users::{UserInfo, UserMap};

pub use psi_chatview_model as model;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
