//! Command-line front end for `plainpaste`.
//!
//! The binary is a thin wrapper: [`Cli`] parses arguments, [`run`] does the
//! work against any reader and writer so the whole tool can be driven from
//! tests.

pub mod args;
mod commands;
pub mod logging;
pub mod report;

pub use args::{Cli, Commands, OutputFormat, ThemeArg};
pub use commands::run;
