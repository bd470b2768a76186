//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::dump::DumpArgs;
use crate::commands::verify::VerifyArgs;

/// RUM session verifier.
///
/// Rebuilds user sessions from JSON-lines RUM event dumps and checks that
/// every session is consistent.
#[derive(Debug, Parser)]
#[command(name = "rumcheck", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check every session in an event dump and report the outcome per session.
    Verify(VerifyArgs),

    /// Print the reconstructed sessions as JSON.
    Dump(DumpArgs),
}
