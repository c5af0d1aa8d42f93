//! Adium message style support.

mod plist;
mod theme;

pub use plist::{InfoPlist, PlistValue};
pub use theme::{AdiumTheme, BUILTIN_TEMPLATE, RESOURCE_FILES, guess_version};
