//! Cross-event consistency rules over an assembled session.
//!
//! Path consistency is enforced while visits are assembled; the rules here
//! need the finished visits.

use std::collections::HashSet;

use crate::event::RumEvent;
use crate::session::Session;
use crate::types::SessionId;
use crate::violation::ConsistencyViolation;
use crate::visit::ViewVisit;

/// Runs every post-assembly rule, stopping at the first violation.
pub fn validate(session: &Session) -> Result<(), ConsistencyViolation> {
    check_unique_resource_ids(session)?;
    for visit in session.view_visits() {
        check_activity_transitions(session.session_id(), visit)?;
    }
    Ok(())
}

/// Each resource event of a session must have its own `resource.id`.
pub fn check_unique_resource_ids(session: &Session) -> Result<(), ConsistencyViolation> {
    let mut seen = HashSet::new();
    let resources = session
        .view_visits()
        .iter()
        .flat_map(ViewVisit::resource_events);
    for resource in resources {
        if !seen.insert(&resource.resource.id) {
            return Err(ConsistencyViolation::DuplicateResourceId {
                session_id: session.session_id().clone(),
                resource_id: resource.resource.id.clone(),
            });
        }
    }
    Ok(())
}

/// A visit must start active, and once inactive it must stay inactive.
pub fn check_activity_transitions(
    session_id: &SessionId,
    visit: &ViewVisit,
) -> Result<(), ConsistencyViolation> {
    let mut was_active = false;
    for (index, event) in visit.view_events().iter().enumerate() {
        let is_active = event.view.is_active;
        if index == 0 {
            if !is_active {
                return Err(ConsistencyViolation::InactiveFirstView {
                    session_id: session_id.clone(),
                    view_id: visit.view_id().clone(),
                    event: event.snapshot(),
                });
            }
        } else if !was_active && is_active {
            return Err(ConsistencyViolation::ReactivatedView {
                session_id: session_id.clone(),
                view_id: visit.view_id().clone(),
                event: event.snapshot(),
            });
        }
        was_active = is_active;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::event::RawEvent;
    use crate::fixtures;
    use crate::session::build_session;
    use crate::violation::ViolationKind;

    fn session_id() -> SessionId {
        SessionId::new("S1").unwrap()
    }

    /// One visit whose view events report the given activity flags, in version order.
    fn activity(flags: &[bool]) -> Vec<RawEvent> {
        flags
            .iter()
            .zip(0u64..)
            .map(|(is_active, version)| {
                fixtures::view("S1", "V1", "/a", *is_active, version, 100 + version)
            })
            .collect()
    }

    fn check(records: &[RawEvent]) -> Result<Session, ConsistencyViolation> {
        build_session(session_id(), &records.iter().collect::<Vec<_>>())
    }

    #[test]
    fn active_then_inactive_is_legal() {
        assert!(check(&activity(&[true, false, false])).is_ok());
        assert!(check(&activity(&[true, true, false])).is_ok());
        assert!(check(&activity(&[true])).is_ok());
    }

    #[test]
    fn reactivation_is_rejected() {
        let err = check(&activity(&[true, false, true])).unwrap_err();

        assert_eq!(err.kind(), ViolationKind::ReactivatedView);
        let event = err.event().unwrap();
        assert_eq!(event["_dd"]["document_version"], 2);
    }

    #[test]
    fn inactive_first_view_is_rejected() {
        let err = check(&activity(&[false])).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::InactiveFirstView);

        let err = check(&activity(&[false, true])).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::InactiveFirstView);
    }

    #[test]
    fn activity_follows_document_version_not_time() {
        // Version 1 (inactive) arrives before version 0 (active) in time.
        let records = [
            fixtures::view("S1", "V1", "/a", false, 1, 100),
            fixtures::view("S1", "V1", "/a", true, 0, 100),
        ];
        assert!(check(&records).is_ok());
    }

    #[test]
    fn duplicate_resource_ids_across_visits_are_rejected() {
        let records = [
            fixtures::view("S1", "V1", "/a", true, 0, 100),
            fixtures::view("S1", "V2", "/b", true, 0, 200),
            fixtures::resource("S1", "V1", "R1", 120),
            fixtures::resource("S1", "V2", "R1", 220),
        ];

        let err = check(&records).unwrap_err();
        let ConsistencyViolation::DuplicateResourceId { resource_id, .. } = &err else {
            panic!("expected a duplicate resource id, got {err:?}");
        };
        assert_eq!(resource_id.as_str(), "R1");
    }

    #[test]
    fn distinct_resource_ids_pass() {
        let records = [
            fixtures::view("S1", "V1", "/a", true, 0, 100),
            fixtures::resource("S1", "V1", "R1", 120),
            fixtures::resource("S1", "V1", "R2", 130),
        ];
        assert!(check(&records).is_ok());
    }

    #[test]
    fn uniqueness_is_checked_before_activity() {
        let records = [
            fixtures::view("S1", "V1", "/a", false, 0, 100),
            fixtures::resource("S1", "V1", "R1", 120),
            fixtures::resource("S1", "V1", "R1", 130),
        ];

        let err = check(&records).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::DuplicateResourceId);
    }
}
