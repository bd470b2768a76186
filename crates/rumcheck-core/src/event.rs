//! Raw RUM event records and their typed decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event_type::{EventType, UnknownEventType};
use crate::types::{ResourceId, SessionId, ViewId};
use crate::violation::ConsistencyViolation;

/// A raw RUM event exactly as the instrumented application emitted it.
///
/// The record is opaque until classified; only `session.id` and `type` are
/// read directly, everything else is decoded by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEvent(Value);

impl RawEvent {
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Reads the `session.id` partition key.
    pub fn session_id(&self) -> Result<SessionId, ConsistencyViolation> {
        let raw = self
            .0
            .pointer("/session/id")
            .and_then(Value::as_str)
            .ok_or_else(|| self.malformed(None, "missing string field `session.id`"))?;
        SessionId::new(raw).map_err(|err| self.malformed(None, err.to_string()))
    }

    /// Reads and parses the `type` tag.
    pub fn event_type(&self) -> Result<EventType, ConsistencyViolation> {
        let session_id = self.session_id().ok();
        let raw = self
            .0
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| self.malformed(session_id.clone(), "missing string field `type`"))?;
        raw.parse::<EventType>()
            .map_err(|err: UnknownEventType| self.malformed(session_id, err.to_string()))
    }

    fn malformed(
        &self,
        session_id: Option<SessionId>,
        reason: impl Into<String>,
    ) -> ConsistencyViolation {
        ConsistencyViolation::MalformedEvent {
            session_id,
            reason: reason.into(),
            event: Box::new(self.0.clone()),
        }
    }
}

impl From<Value> for RawEvent {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// An event positioned on the session timeline.
///
/// Lets ordering and assembly work over any decoded representation
/// (typed events, classified events, or test fixtures).
pub trait TimedEvent {
    /// Event time in milliseconds (`date`).
    fn date(&self) -> u64;
}

/// A decoded event that belongs to one view of one session.
pub trait RumEvent: TimedEvent + Serialize {
    const EVENT_TYPE: EventType;

    fn session_id(&self) -> &SessionId;

    fn view_id(&self) -> &ViewId;

    /// JSON snapshot used as diagnostic context in violations.
    fn snapshot(&self) -> Box<Value> {
        Box::new(serde_json::to_value(self).unwrap_or(Value::Null))
    }
}

/// `session` attributes shared by every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRef {
    pub id: SessionId,
}

/// `view` attributes carried by non-view events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRef {
    pub id: ViewId,
}

/// `view` attributes of a view event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewAttributes {
    pub id: ViewId,
    /// Used as the visit path.
    pub url: String,
    pub is_active: bool,
}

/// Internal `_dd` attributes of a view event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAttributes {
    /// Incremented on every update of the same view.
    pub document_version: u64,
}

/// A view update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEvent {
    pub date: u64,
    pub session: SessionRef,
    pub view: ViewAttributes,
    #[serde(rename = "_dd")]
    pub dd: DocumentAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub action_type: String,
}

/// A user action (tap, scroll, custom action, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub date: u64,
    pub session: SessionRef,
    pub view: ViewRef,
    pub action: ActionAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAttributes {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// A loaded resource (network request, image, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEvent {
    pub date: u64,
    pub session: SessionRef,
    pub view: ViewRef,
    pub resource: ResourceAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorAttributes {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// An error reported while the view was displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub date: u64,
    pub session: SessionRef,
    pub view: ViewRef,
    pub error: ErrorAttributes,
}

macro_rules! impl_rum_event {
    ($event:ty, $event_type:expr) => {
        impl TimedEvent for $event {
            fn date(&self) -> u64 {
                self.date
            }
        }

        impl RumEvent for $event {
            const EVENT_TYPE: EventType = $event_type;

            fn session_id(&self) -> &SessionId {
                &self.session.id
            }

            fn view_id(&self) -> &ViewId {
                &self.view.id
            }
        }
    };
}

impl_rum_event!(ViewEvent, EventType::View);
impl_rum_event!(ActionEvent, EventType::Action);
impl_rum_event!(ResourceEvent, EventType::Resource);
impl_rum_event!(ErrorEvent, EventType::Error);

/// A raw event decoded into the payload its `type` declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedEvent {
    View(ViewEvent),
    Action(ActionEvent),
    Resource(ResourceEvent),
    Error(ErrorEvent),
}

impl ClassifiedEvent {
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::View(_) => EventType::View,
            Self::Action(_) => EventType::Action,
            Self::Resource(_) => EventType::Resource,
            Self::Error(_) => EventType::Error,
        }
    }
}

impl TimedEvent for ClassifiedEvent {
    fn date(&self) -> u64 {
        match self {
            Self::View(event) => event.date,
            Self::Action(event) => event.date,
            Self::Resource(event) => event.date,
            Self::Error(event) => event.date,
        }
    }
}

/// Decodes a raw record into its typed payload.
///
/// Fails with [`ConsistencyViolation::MalformedEvent`] when the `type` tag is
/// missing or unknown, or when the payload does not match the declared type.
pub fn classify(raw: &RawEvent) -> Result<ClassifiedEvent, ConsistencyViolation> {
    let event_type = raw.event_type()?;
    let classified = match event_type {
        EventType::View => ClassifiedEvent::View(decode(raw, event_type)?),
        EventType::Action => ClassifiedEvent::Action(decode(raw, event_type)?),
        EventType::Resource => ClassifiedEvent::Resource(decode(raw, event_type)?),
        EventType::Error => ClassifiedEvent::Error(decode(raw, event_type)?),
    };
    tracing::trace!(%event_type, date = classified.date(), "classified event");
    Ok(classified)
}

fn decode<T: DeserializeOwned>(
    raw: &RawEvent,
    event_type: EventType,
) -> Result<T, ConsistencyViolation> {
    T::deserialize(raw.as_value()).map_err(|err| {
        raw.malformed(
            raw.session_id().ok(),
            format!("cannot decode {event_type} event: {err}"),
        )
    })
}
