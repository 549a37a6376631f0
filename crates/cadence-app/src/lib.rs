//! Command-line front end for the cadence recurrence engine.

mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
