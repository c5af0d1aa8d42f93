//! Error types for the chat view renderer.

use std::path::PathBuf;

use thiserror::Error;

use psi_chatview_model::ModelError;

/// Errors raised while initialising a session or rendering a record.
#[derive(Debug, Error)]
pub enum ChatViewError {
    /// A record arrived before the theme was initialised.
    #[error("theme is not initialized")]
    NotInitialized,

    /// `init` was called on an active session.
    #[error("theme should not be initialized twice")]
    AlreadyInitialized,

    /// No template is available for the event kind.
    #[error("template not found: {kind}")]
    TemplateNotFound { kind: String },

    /// A `js` record named a hook nobody registered.
    #[error("unknown hook: {0}")]
    UnknownHook(String),

    /// A registered hook reported a failure.
    #[error("hook {name} failed: {message}")]
    Hook { name: String, message: String },

    /// Continuation requested but the transcript has no grouping slot.
    #[error("no grouping slot to insert into")]
    MissingSlot,

    /// Malformed host record.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Malformed theme configuration.
    #[error("invalid theme configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Theme directory does not exist.
    #[error("theme not found: {}", .0.display())]
    ThemeNotFound(PathBuf),

    /// A required theme file is missing.
    #[error("missing theme resource: {0}")]
    MissingResource(String),

    /// Info.plist could not be parsed.
    #[error("invalid Info.plist: {0}")]
    Plist(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatViewError {
    /// Create a hook failure.
    pub fn hook(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hook {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type for renderer operations.
pub type Result<T> = std::result::Result<T, ChatViewError>;
