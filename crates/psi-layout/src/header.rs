//! State header and record markers.
//!
//! # Structure
//!
//! | Offset | Length | Field   | Value        |
//! |--------|--------|---------|--------------|
//! | 0-3    | 4      | marker  | `0x000000FF` |
//! | 4-7    | 4      | version | `0`          |
//!
//! The header is followed by a flat sequence of records, each introduced by
//! a single marker byte.

use crate::cursor::ByteCursor;
use crate::error::{LayoutError, Result};

/// Header length in bytes.
pub const HEADER_LEN: usize = 8;

/// Sentinel value opening every state blob.
pub const VERSION_MARKER: u32 = 0xFF;

/// The only supported state version.
pub const STATE_VERSION: u32 = 0;

/// Toolbar layout record marker.
pub const TOOLBAR_STATE_MARKER: u8 = 0xFE;

/// Extended toolbar layout record marker (adds floating geometry).
pub const TOOLBAR_STATE_MARKER_EX: u8 = 0xFC;

/// Dock widget layout record marker.
pub const DOCK_WIDGET_STATE_MARKER: u8 = 0xFD;

/// Kind of record introduced by a marker byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    ToolBars,
    ToolBarsExtended,
    Docks,
}

impl RecordKind {
    /// Classify a marker byte.
    #[must_use]
    pub const fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            TOOLBAR_STATE_MARKER => Some(Self::ToolBars),
            TOOLBAR_STATE_MARKER_EX => Some(Self::ToolBarsExtended),
            DOCK_WIDGET_STATE_MARKER => Some(Self::Docks),
            _ => None,
        }
    }
}

/// Read and validate the header, returning the version.
pub fn read_header(cursor: &mut ByteCursor<'_>) -> Result<u32> {
    let marker = cursor.read_u32()?;
    if marker != VERSION_MARKER {
        return Err(LayoutError::InvalidMagic {
            expected: VERSION_MARKER,
            found: marker,
        });
    }
    let version = cursor.read_u32()?;
    if version != STATE_VERSION {
        return Err(LayoutError::UnsupportedVersion {
            expected: STATE_VERSION,
            found: version,
        });
    }
    Ok(version)
}

/// Build a valid header.
#[must_use]
pub fn build_header() -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(&VERSION_MARKER.to_be_bytes());
    header[4..].copy_from_slice(&STATE_VERSION.to_be_bytes());
    header
}
