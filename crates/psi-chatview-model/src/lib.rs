//! Records exchanged between a chat window host and its HTML renderer.
//!
//! The host serialises every event as a JSON object whose `type` field
//! selects the record kind:
//!
//! ```
//! use psi_chatview_model::{HostRecord, MessageType};
//!
//! let record = HostRecord::from_json(
//!     r#"{"type":"message","mtype":"join","sender":"bob","time":"2024-03-01T10:15:00+01:00"}"#,
//! )
//! .unwrap();
//! match record {
//!     HostRecord::Message(event) => assert_eq!(event.mtype, MessageType::Join),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod error;
mod event;
mod kind;
mod record;
mod timestamp;

pub use error::{ModelError, Result};
pub use event::{
    AvatarEvent, ChatEvent, HookCall, Receipt, ReplaceEvent, SettingsUpdate, TransactionEnd,
};
pub use kind::MessageType;
pub use record::HostRecord;
pub use timestamp::parse_timestamp;
