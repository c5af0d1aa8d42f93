//! Human-readable dump of a decoded layout state.
//!
//! Toolbar records print one group per line and one block per toolbar:
//!
//! ```text
//! toolbar layout (extended): 1 line(s)
//! [line 0: top]
//!   - name: mainToolBar
//!     pos: top
//!     shown: true
//!     item_pos: 0
//!     item_size: -1
//!     rect: floating:false x:0 y:0 w:0 h:0
//! ```

use std::io::Write;

use crate::error::Result;
use crate::types::{DockArea, DockLayout, LayoutRecord, LayoutState, ToolBarEntry, ToolBarLayout};

/// Write the dump of `state` to `out`.
pub fn write_dump<W: Write>(state: &LayoutState, out: &mut W) -> Result<()> {
    writeln!(out, "state version {}", state.version)?;
    for record in &state.records {
        match record {
            LayoutRecord::ToolBars(layout) => write_toolbars(layout, out)?,
            LayoutRecord::Docks(docks) => write_docks(docks, out)?,
        }
    }
    if !state.skipped.is_empty() {
        let offsets: Vec<String> = state.skipped.iter().map(ToString::to_string).collect();
        writeln!(out, "skipped unknown markers at: {}", offsets.join(", "))?;
    }
    Ok(())
}

/// Render the dump into a string.
#[must_use]
pub fn dump_to_string(state: &LayoutState) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_dump(state, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_toolbars<W: Write>(layout: &ToolBarLayout, out: &mut W) -> Result<()> {
    let kind = if layout.extended { " (extended)" } else { "" };
    writeln!(
        out,
        "toolbar layout{kind}: {} line(s)",
        layout.lines.len()
    )?;
    for (index, line) in layout.lines.iter().enumerate() {
        writeln!(out, "[line {index}: {}]", line.area)?;
        for entry in &line.entries {
            write_entry(entry, line.area, out)?;
        }
    }
    Ok(())
}

fn write_entry<W: Write>(entry: &ToolBarEntry, area: DockArea, out: &mut W) -> Result<()> {
    writeln!(out, "  - name: {}", entry.name)?;
    writeln!(out, "    pos: {area}")?;
    writeln!(out, "    shown: {}", entry.shown)?;
    writeln!(out, "    item_pos: {}", entry.pos)?;
    writeln!(out, "    item_size: {}", entry.size)?;
    writeln!(out, "    rect: {}", entry.rect.unwrap_or_default())?;
    Ok(())
}

fn write_docks<W: Write>(docks: &DockLayout, out: &mut W) -> Result<()> {
    let (width, height) = docks.central_size;
    let [top_left, top_right, bottom_left, bottom_right] = docks.corners;
    writeln!(out, "dock layout")?;
    writeln!(out, "  central_size: {width}x{height}")?;
    writeln!(
        out,
        "  corners: top_left={} top_right={} bottom_left={} bottom_right={}",
        corner_name(top_left),
        corner_name(top_right),
        corner_name(bottom_left),
        corner_name(bottom_right)
    )?;
    Ok(())
}

fn corner_name(code: i32) -> String {
    DockArea::from_code(code)
        .map(|area| area.as_str().to_string())
        .unwrap_or_else(|| code.to_string())
}
