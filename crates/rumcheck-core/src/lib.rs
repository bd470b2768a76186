//! Core domain logic for RUM session verification.
//!
//! This crate rebuilds user sessions from a flat batch of RUM events and
//! checks the consistency rules a well-formed session obeys:
//! - Classification: decoding raw records into typed view/action/resource/error events
//! - Assembly: grouping events into view visits ordered by time and document version
//! - Validation: unique resource IDs, consistent view paths, view activity transitions

pub mod event;
pub mod event_type;
mod order;
pub mod session;
pub mod types;
pub mod validate;
pub mod violation;
pub mod visit;

#[cfg(test)]
mod fixtures;

pub use event::{ClassifiedEvent, RawEvent, RumEvent, TimedEvent, classify};
pub use event_type::{EventType, UnknownEventType};
pub use order::order_by_time;
pub use session::{
    GroupingConfig, Session, SessionOutcome, group_sessions, group_sessions_isolated,
};
pub use types::{ResourceId, SessionId, ValidationError, ViewId};
pub use violation::{ConsistencyViolation, ViolationKind};
pub use visit::{EventsByType, ViewVisit, assemble, order_visits};
