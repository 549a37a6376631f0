//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::expand::ExpandArgs;
use crate::commands::explain::ExplainArgs;

/// Expands RFC 5545 recurrence rules into concrete occurrences.
#[derive(Debug, Parser)]
#[command(name = "cadence", version, about, long_about = None)]
pub struct Cli {
    /// Keep debug logging instead of the configured level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the occurrences of a rule from a start instant.
    Expand(ExpandArgs),

    /// Print the canonical rule and how each part is applied.
    Explain(ExplainArgs),
}
