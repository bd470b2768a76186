//! Verify command: rebuild every session of an event dump and report it.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rumcheck_core::{GroupingConfig, RawEvent, Session, group_sessions_isolated};

use crate::commands::util::{format_date, load_events};
use crate::{Config, FailurePolicy};

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// JSON-lines event file (reads stdin when omitted).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Report each session on its own instead of stopping at the first violation.
    #[arg(long)]
    pub isolate: bool,
}

/// Session counts of a verification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
}

pub fn run<W: Write>(writer: &mut W, args: &VerifyArgs, config: &Config) -> Result<Summary> {
    let events = load_events(args.input.as_deref())?;
    let policy = if args.isolate {
        FailurePolicy::Isolate
    } else {
        config.failure_policy
    };
    tracing::debug!(%policy, parallel = config.parallel, "verifying sessions");
    verify_events(writer, &events, policy, config.parallel)
}

/// Verifies already loaded events and writes one line per session.
///
/// Under [`FailurePolicy::Abort`] the report stops at the first failing
/// session: its `FAILED` line is written and the violation is returned.
pub fn verify_events<W: Write>(
    writer: &mut W,
    events: &[RawEvent],
    policy: FailurePolicy,
    parallel: bool,
) -> Result<Summary> {
    let mut summary = Summary::default();
    let outcomes = group_sessions_isolated(events, GroupingConfig { parallel })
        .context("session verification failed")?;

    for outcome in outcomes {
        match outcome.result {
            Ok(session) => {
                write_passed(writer, &session)?;
                summary.passed += 1;
            }
            Err(err) => {
                writeln!(writer, "FAILED {} {}: {err}", outcome.session_id, err.kind())?;
                summary.failed += 1;
                if policy == FailurePolicy::Abort {
                    return Err(anyhow::Error::new(err).context("session verification failed"));
                }
            }
        }
    }

    writeln!(writer, "{} ok, {} failed", summary.passed, summary.failed)?;
    Ok(summary)
}

fn write_passed<W: Write>(writer: &mut W, session: &Session) -> Result<()> {
    let start = session
        .view_visits()
        .first()
        .map_or_else(|| "-".to_string(), |visit| format_date(visit.start_date()));
    writeln!(
        writer,
        "ok {} visits={} events={} start={start}",
        session.session_id(),
        session.view_visits().len(),
        session.event_count()
    )?;
    Ok(())
}
