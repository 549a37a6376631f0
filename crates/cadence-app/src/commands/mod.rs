//! Subcommand implementations. Each writes its output to the given writer.

pub mod expand;
pub mod explain;
