//! Session reconstruction from a flat batch of RUM events.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::event::{RawEvent, classify};
use crate::order::order_by_time;
use crate::types::{SessionId, ViewId};
use crate::validate::validate;
use crate::violation::ConsistencyViolation;
use crate::visit::{EventsByType, ViewVisit, assemble, order_visits};

/// A validated RUM session: its view visits in the order they started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    session_id: SessionId,
    view_visits: Vec<ViewVisit>,
}

impl Session {
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn view_visits(&self) -> &[ViewVisit] {
        &self.view_visits
    }

    pub fn find_visit(&self, view_id: &ViewId) -> Option<&ViewVisit> {
        self.view_visits
            .iter()
            .find(|visit| visit.view_id() == view_id)
    }

    /// Number of events across all visits.
    pub fn event_count(&self) -> usize {
        self.view_visits.iter().map(ViewVisit::event_count).sum()
    }
}

/// Knobs for [`group_sessions_isolated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingConfig {
    /// Rebuild sessions on the rayon pool.
    pub parallel: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Outcome of reconstructing one session when failures are isolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub session_id: SessionId,
    pub result: Result<Session, ConsistencyViolation>,
}

/// Reconstructs every session in the batch, failing on the first violation.
///
/// Sessions are returned in ascending `session.id` order.
pub fn group_sessions(records: &[RawEvent]) -> Result<Vec<Session>, ConsistencyViolation> {
    partition_by_session(records)?
        .into_iter()
        .map(|(session_id, records)| build_session(session_id, &records))
        .collect()
}

/// Reconstructs every session in the batch, keeping one outcome per session.
///
/// A rejected session does not affect the others. Only a record whose
/// `session.id` cannot be read fails the whole call, since it belongs to no
/// session. With [`GroupingConfig::parallel`] set, sessions are rebuilt on the rayon pool;
/// outcomes are in ascending `session.id` order either way.
pub fn group_sessions_isolated(
    records: &[RawEvent],
    config: GroupingConfig,
) -> Result<Vec<SessionOutcome>, ConsistencyViolation> {
    let partitions: Vec<_> = partition_by_session(records)?.into_iter().collect();
    let outcomes: Vec<SessionOutcome> = if config.parallel {
        partitions.into_par_iter().map(outcome).collect()
    } else {
        partitions.into_iter().map(outcome).collect()
    };
    Ok(outcomes)
}

fn outcome((session_id, records): (SessionId, Vec<&RawEvent>)) -> SessionOutcome {
    let result = build_session(session_id.clone(), &records);
    if let Err(err) = &result {
        tracing::warn!(
            session_id = %session_id,
            kind = %err.kind(),
            error = %err,
            "rejected session"
        );
    }
    SessionOutcome { session_id, result }
}

/// Splits the batch by `session.id`.
fn partition_by_session(
    records: &[RawEvent],
) -> Result<BTreeMap<SessionId, Vec<&RawEvent>>, ConsistencyViolation> {
    let mut partitions: BTreeMap<SessionId, Vec<&RawEvent>> = BTreeMap::new();
    for record in records {
        partitions.entry(record.session_id()?).or_default().push(record);
    }
    tracing::debug!(
        records = records.len(),
        sessions = partitions.len(),
        "partitioned events by session"
    );
    Ok(partitions)
}

/// Rebuilds and validates one session from records sharing `session_id`.
pub(crate) fn build_session(
    session_id: SessionId,
    records: &[&RawEvent],
) -> Result<Session, ConsistencyViolation> {
    let classified = records
        .iter()
        .map(|record| classify(record))
        .collect::<Result<Vec<_>, _>>()?;
    let events: EventsByType = order_by_time(classified).into_iter().collect();
    let visits = assemble(events)?;

    let session = Session {
        session_id,
        view_visits: order_visits(visits),
    };
    validate(&session)?;

    tracing::debug!(
        session_id = %session.session_id,
        visits = session.view_visits.len(),
        events = session.event_count(),
        "reconstructed session"
    );
    Ok(session)
}
