//! Qt main window layout state reader.
//!
//! A main window persists the arrangement of its toolbars and dock widgets
//! as an opaque blob (usually stored base64-encoded in the application
//! settings). This crate decodes that blob into plain Rust structures and
//! prints a textual dump of it.
//!
//! # Example
//!
//! ```
//! use psi_layout::{dump_to_string, parse_base64_state};
//!
//! // Header only: marker 0xFF, version 0.
//! let state = parse_base64_state("AAAA/wAAAAA=").unwrap();
//! assert!(state.records.is_empty());
//! assert_eq!(dump_to_string(&state), "state version 0\n");
//! ```
//!
//! # Floating geometry
//!
//! Extended toolbar records carry the geometry of floating toolbars packed
//! into two 32-bit words, see [`FloatingRect`].

pub mod cursor;
mod dump;
mod error;
pub mod header;
mod reader;
mod rect;
mod types;

pub use dump::{dump_to_string, write_dump};
pub use error::{LayoutError, Result};
pub use reader::{parse_base64_state, parse_state};
pub use rect::{COORD_BIAS, FloatingRect};
pub use types::{
    DockArea, DockLayout, LayoutRecord, LayoutState, ToolBarEntry, ToolBarLayout, ToolBarLine,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
