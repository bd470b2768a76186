//! Dump command: print reconstructed sessions as JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rumcheck_core::group_sessions;

use crate::commands::util::load_events;

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// JSON-lines event file (reads stdin when omitted).
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

pub fn run<W: Write>(writer: &mut W, args: &DumpArgs) -> Result<()> {
    let events = load_events(args.input.as_deref())?;
    let sessions = group_sessions(&events).context("session reconstruction failed")?;
    let json = serde_json::to_string_pretty(&sessions).context("failed to serialize sessions")?;
    writeln!(writer, "{json}")?;
    Ok(())
}
