//! Library components of the toolbar state dump tool.

pub mod cli;
pub mod commands;
pub mod logging;
