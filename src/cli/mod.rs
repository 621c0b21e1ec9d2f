//! CLI module
//!
//! Command-line simulator for the paging engine.
//!
//! # Commands
//!
//! - `load` - Run a single load and print its result
//! - `walk` - Refresh, then grow the window to both boundaries
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, LoadTypeArg, OutputFormat};
pub use runner::Runner;
