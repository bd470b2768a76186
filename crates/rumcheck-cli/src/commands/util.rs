//! Shared utilities for CLI commands.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::DateTime;

use rumcheck_core::RawEvent;

/// Reads JSON-lines events from a file, or from stdin when no path is given.
pub fn load_events(input: Option<&Path>) -> Result<Vec<RawEvent>> {
    let events = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            parse_events(BufReader::new(file))
                .with_context(|| format!("failed to read events from {}", path.display()))?
        }
        None => parse_events(io::stdin().lock()).context("failed to read events from stdin")?,
    };
    tracing::debug!(event_count = events.len(), "loaded events");
    Ok(events)
}

/// Parses one JSON object per line, skipping blank lines.
pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<RawEvent>> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        if !value.is_object() {
            anyhow::bail!("line {} is not a JSON object", idx + 1);
        }
        events.push(RawEvent::new(value));
    }
    Ok(events)
}

/// Formats a RUM `date` (milliseconds since the epoch) as RFC 3339.
pub fn format_date(date_ms: u64) -> String {
    i64::try_from(date_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map_or_else(
            || format!("{date_ms}ms"),
            |dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        )
}
