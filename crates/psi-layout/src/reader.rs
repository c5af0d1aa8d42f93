//! Layout state reader.
//!
//! Decodes a complete state blob in a single pass. Header mismatches and
//! record shapes this reader does not understand are fatal; there is no
//! partial-result recovery.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

use crate::cursor::ByteCursor;
use crate::error::{LayoutError, Result};
use crate::header::{RecordKind, read_header};
use crate::rect::FloatingRect;
use crate::types::{
    DockArea, DockLayout, LayoutRecord, LayoutState, ToolBarEntry, ToolBarLayout, ToolBarLine,
};

/// Shown byte: bit 0 is visibility.
const SHOWN_BIT: u8 = 0x01;
/// Shown byte: bit 1 is vertical orientation.
const VERTICAL_BIT: u8 = 0x02;

/// Decode a base64-encoded state blob.
///
/// Leading and trailing whitespace is ignored.
pub fn parse_base64_state(input: &str) -> Result<LayoutState> {
    let bytes = STANDARD.decode(input.trim())?;
    parse_state(&bytes)
}

/// Decode a raw state blob.
pub fn parse_state(data: &[u8]) -> Result<LayoutState> {
    let mut cursor = ByteCursor::new(data);
    let version = read_header(&mut cursor)?;
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    while !cursor.is_empty() {
        let offset = cursor.offset();
        let marker = cursor.read_u8()?;
        match RecordKind::from_marker(marker) {
            Some(RecordKind::ToolBars) => {
                records.push(LayoutRecord::ToolBars(read_toolbar_layout(
                    &mut cursor,
                    false,
                )?));
            }
            Some(RecordKind::ToolBarsExtended) => {
                records.push(LayoutRecord::ToolBars(read_toolbar_layout(
                    &mut cursor,
                    true,
                )?));
            }
            Some(RecordKind::Docks) => {
                records.push(LayoutRecord::Docks(read_dock_layout(&mut cursor)?));
            }
            None => {
                warn!(offset, marker, "skipping unknown record marker");
                skipped.push(offset);
            }
        }
    }

    debug!(
        records = records.len(),
        skipped = skipped.len(),
        "decoded layout state"
    );
    Ok(LayoutState {
        version,
        records,
        skipped,
    })
}

fn read_count(cursor: &mut ByteCursor<'_>, what: &'static str) -> Result<usize> {
    let offset = cursor.offset();
    let count = cursor.read_i32()?;
    usize::try_from(count).map_err(|_| LayoutError::invalid_count(what, count, offset))
}

fn read_toolbar_layout(cursor: &mut ByteCursor<'_>, extended: bool) -> Result<ToolBarLayout> {
    let line_count = read_count(cursor, "toolbar line")?;
    let mut lines = Vec::new();
    for _ in 0..line_count {
        let offset = cursor.offset();
        let code = cursor.read_i32()?;
        let area =
            DockArea::from_code(code).ok_or(LayoutError::InvalidDockArea { code, offset })?;
        let entry_count = read_count(cursor, "toolbar entry")?;
        let mut entries = Vec::new();
        for _ in 0..entry_count {
            entries.push(read_toolbar_entry(cursor, extended)?);
        }
        debug!(area = %area, entries = entries.len(), "toolbar line");
        lines.push(ToolBarLine { area, entries });
    }
    Ok(ToolBarLayout { extended, lines })
}

fn read_toolbar_entry(cursor: &mut ByteCursor<'_>, extended: bool) -> Result<ToolBarEntry> {
    let name = cursor.read_string()?;
    let shown = cursor.read_u8()?;
    let pos = cursor.read_i32()?;
    let size = cursor.read_i32()?;
    let rect = if extended {
        let geom0 = cursor.read_u32()?;
        let geom1 = cursor.read_u32()?;
        Some(FloatingRect::unpack(geom0, geom1))
    } else {
        None
    };
    Ok(ToolBarEntry {
        name,
        shown: shown & SHOWN_BIT != 0,
        vertical: shown & VERTICAL_BIT != 0,
        pos,
        size,
        rect,
    })
}

fn read_dock_layout(cursor: &mut ByteCursor<'_>) -> Result<DockLayout> {
    let offset = cursor.offset();
    let count = cursor.read_i32()?;
    if count != 0 {
        return Err(LayoutError::UnsupportedDockLayout { count, offset });
    }
    let width = cursor.read_i32()?;
    let height = cursor.read_i32()?;
    let mut corners = [0i32; 4];
    for corner in &mut corners {
        *corner = cursor.read_i32()?;
    }
    Ok(DockLayout {
        central_size: (width, height),
        corners,
    })
}
