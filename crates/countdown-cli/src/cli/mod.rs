//! CLI module for the countdown tool.
//!
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, CreateArgs, Mode, ShowArgs, UpdateArgs};
pub use display::Display;
