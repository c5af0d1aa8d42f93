//! Decoded layout state structures.

use std::fmt;

use crate::rect::FloatingRect;

/// Main window dock area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockArea {
    Left,
    Right,
    Top,
    Bottom,
}

impl DockArea {
    /// All areas in position-code order.
    pub const ALL: [DockArea; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Map a stored position code (0..=3) to an area.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Top),
            3 => Some(Self::Bottom),
            _ => None,
        }
    }

    /// Stored position code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Top => 2,
            Self::Bottom => 3,
        }
    }

    /// Lowercase area name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for DockArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One toolbar inside a toolbar line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolBarEntry {
    /// Toolbar object name.
    pub name: String,
    /// Whether the toolbar is visible.
    pub shown: bool,
    /// Whether the toolbar was vertical when saved.
    pub vertical: bool,
    /// Position inside the line.
    pub pos: i32,
    /// Preferred size along the line (-1 when unset).
    pub size: i32,
    /// Floating geometry, only present in extended records.
    pub rect: Option<FloatingRect>,
}

/// A row of toolbars docked in one area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolBarLine {
    pub area: DockArea,
    pub entries: Vec<ToolBarEntry>,
}

/// Toolbar layout record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolBarLayout {
    /// Whether the record was written in the extended form with floating geometry.
    pub extended: bool,
    pub lines: Vec<ToolBarLine>,
}

impl ToolBarLayout {
    /// Total number of toolbar entries across all lines.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.lines.iter().map(|line| line.entries.len()).sum()
    }
}

/// Dock widget layout record (only the empty-dock form is decoded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockLayout {
    /// Central widget size as (width, height).
    pub central_size: (i32, i32),
    /// Corner ownership values (top-left, top-right, bottom-left, bottom-right).
    pub corners: [i32; 4],
}

/// A tagged record in the state stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutRecord {
    ToolBars(ToolBarLayout),
    Docks(DockLayout),
}

/// Full decoded state blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutState {
    /// Header version.
    pub version: u32,
    /// Records in stream order.
    pub records: Vec<LayoutRecord>,
    /// Offsets of unrecognized marker bytes that were skipped.
    pub skipped: Vec<usize>,
}

impl LayoutState {
    /// Iterate over toolbar layout records.
    pub fn toolbar_layouts(&self) -> impl Iterator<Item = &ToolBarLayout> {
        self.records.iter().filter_map(|record| match record {
            LayoutRecord::ToolBars(layout) => Some(layout),
            LayoutRecord::Docks(_) => None,
        })
    }

    /// Look up a toolbar entry by object name.
    #[must_use]
    pub fn find_toolbar(&self, name: &str) -> Option<(DockArea, &ToolBarEntry)> {
        self.toolbar_layouts()
            .flat_map(|layout| layout.lines.iter())
            .flat_map(|line| line.entries.iter().map(move |entry| (line.area, entry)))
            .find(|(_, entry)| entry.name == name)
    }
}
