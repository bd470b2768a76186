//! Consistency violations raised while reconstructing a RUM session.
//!
//! Every variant is session-fatal: the session being built is discarded and
//! the violation is handed to the caller with enough context (session, view
//! and a JSON snapshot of the offending event) to locate the bad record.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::event_type::EventType;
use crate::types::{ResourceId, SessionId, ViewId};

/// A broken consistency rule found in a batch of RUM events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsistencyViolation {
    /// The record could not be decoded into the shape its `type` declares.
    #[error("malformed event: {reason}")]
    MalformedEvent {
        session_id: Option<SessionId>,
        reason: String,
        event: Box<Value>,
    },

    /// A non-view event references a view with no view event in the session.
    #[error(
        "cannot link {event_type} event to a view visit: session {session_id} has no view event with view.id {view_id}"
    )]
    OrphanEvent {
        session_id: SessionId,
        view_id: ViewId,
        event_type: EventType,
        event: Box<Value>,
    },

    /// Two view events of the same visit disagree on `view.url`.
    #[error(
        "view.url {found} differs from {expected} used by other view events of view.id {view_id} in session {session_id}"
    )]
    InconsistentPath {
        session_id: SessionId,
        view_id: ViewId,
        expected: String,
        found: String,
        event: Box<Value>,
    },

    /// Two resource events of one session share a `resource.id`.
    #[error(
        "resource.id should be unique: found at least two resource events with resource.id {resource_id} in session {session_id}"
    )]
    DuplicateResourceId {
        session_id: SessionId,
        resource_id: ResourceId,
    },

    /// The lowest document version of a visit already reports an inactive view.
    #[error("view visit {view_id} in session {session_id} can't start with an inactive view event")]
    InactiveFirstView {
        session_id: SessionId,
        view_id: ViewId,
        event: Box<Value>,
    },

    /// A view event reports an active view after an inactive one in the same visit.
    #[error(
        "view {view_id} in session {session_id} is reported active after it was marked inactive"
    )]
    ReactivatedView {
        session_id: SessionId,
        view_id: ViewId,
        event: Box<Value>,
    },
}

impl ConsistencyViolation {
    /// Returns the discriminant without the payload.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        match self {
            Self::MalformedEvent { .. } => ViolationKind::MalformedEvent,
            Self::OrphanEvent { .. } => ViolationKind::OrphanEvent,
            Self::InconsistentPath { .. } => ViolationKind::InconsistentPath,
            Self::DuplicateResourceId { .. } => ViolationKind::DuplicateResourceId,
            Self::InactiveFirstView { .. } => ViolationKind::InactiveFirstView,
            Self::ReactivatedView { .. } => ViolationKind::ReactivatedView,
        }
    }

    /// The session the offending event belongs to, when it could be read.
    #[must_use]
    pub const fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::MalformedEvent { session_id, .. } => session_id.as_ref(),
            Self::OrphanEvent { session_id, .. }
            | Self::InconsistentPath { session_id, .. }
            | Self::DuplicateResourceId { session_id, .. }
            | Self::InactiveFirstView { session_id, .. }
            | Self::ReactivatedView { session_id, .. } => Some(session_id),
        }
    }

    #[must_use]
    pub const fn view_id(&self) -> Option<&ViewId> {
        match self {
            Self::MalformedEvent { .. } | Self::DuplicateResourceId { .. } => None,
            Self::OrphanEvent { view_id, .. }
            | Self::InconsistentPath { view_id, .. }
            | Self::InactiveFirstView { view_id, .. }
            | Self::ReactivatedView { view_id, .. } => Some(view_id),
        }
    }

    /// JSON snapshot of the offending event.
    #[must_use]
    pub fn event(&self) -> Option<&Value> {
        match self {
            Self::DuplicateResourceId { .. } => None,
            Self::MalformedEvent { event, .. }
            | Self::OrphanEvent { event, .. }
            | Self::InconsistentPath { event, .. }
            | Self::InactiveFirstView { event, .. }
            | Self::ReactivatedView { event, .. } => Some(&**event),
        }
    }
}

/// Stable, payload-free name of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MalformedEvent,
    OrphanEvent,
    InconsistentPath,
    DuplicateResourceId,
    InactiveFirstView,
    ReactivatedView,
}

impl ViolationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedEvent => "malformed_event",
            Self::OrphanEvent => "orphan_event",
            Self::InconsistentPath => "inconsistent_path",
            Self::DuplicateResourceId => "duplicate_resource_id",
            Self::InactiveFirstView => "inactive_first_view",
            Self::ReactivatedView => "reactivated_view",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn orphan_message_names_type_and_view() {
        let violation = ConsistencyViolation::OrphanEvent {
            session_id: SessionId::new("S1").unwrap(),
            view_id: ViewId::new("V2").unwrap(),
            event_type: EventType::Action,
            event: Box::new(json!({"type": "action"})),
        };

        assert_eq!(
            violation.to_string(),
            "cannot link action event to a view visit: session S1 has no view event with view.id V2"
        );
        assert_eq!(violation.kind(), ViolationKind::OrphanEvent);
        assert_eq!(violation.view_id().map(ViewId::as_str), Some("V2"));
        assert_eq!(violation.event(), Some(&json!({"type": "action"})));
    }

    #[test]
    fn duplicate_resource_has_no_snapshot() {
        let violation = ConsistencyViolation::DuplicateResourceId {
            session_id: SessionId::new("S1").unwrap(),
            resource_id: ResourceId::new("R1").unwrap(),
        };

        assert!(violation.event().is_none());
        assert!(violation.view_id().is_none());
        assert_eq!(violation.session_id().map(SessionId::as_str), Some("S1"));
    }

    #[test]
    fn malformed_event_may_lack_session() {
        let violation = ConsistencyViolation::MalformedEvent {
            session_id: None,
            reason: "missing string field `session.id`".to_string(),
            event: Box::new(json!({})),
        };

        assert!(violation.session_id().is_none());
        assert_eq!(
            violation.to_string(),
            "malformed event: missing string field `session.id`"
        );
    }

    #[test]
    fn kind_codes_are_snake_case() {
        assert_eq!(ViolationKind::DuplicateResourceId.to_string(), "duplicate_resource_id");
        let json = serde_json::to_string(&ViolationKind::InactiveFirstView).unwrap();
        assert_eq!(json, "\"inactive_first_view\"");
    }

    #[test]
    fn violations_and_outcomes_have_full_equality() {
        fn full_eq<T: Eq>() {}

        full_eq::<ConsistencyViolation>();
        full_eq::<crate::event::RawEvent>();
        full_eq::<crate::session::SessionOutcome>();
    }
}
