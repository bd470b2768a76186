//! JSON builders for RUM events used across unit tests.

use serde_json::json;

use crate::event::RawEvent;

pub fn view(
    session: &str,
    view: &str,
    url: &str,
    is_active: bool,
    document_version: u64,
    date: u64,
) -> RawEvent {
    RawEvent::new(json!({
        "type": "view",
        "date": date,
        "session": {"id": session, "type": "user"},
        "view": {"id": view, "url": url, "is_active": is_active},
        "_dd": {"document_version": document_version},
    }))
}

pub fn action(session: &str, view: &str, date: u64) -> RawEvent {
    RawEvent::new(json!({
        "type": "action",
        "date": date,
        "session": {"id": session},
        "view": {"id": view, "url": "ignored"},
        "action": {"type": "tap"},
    }))
}

pub fn resource(session: &str, view: &str, resource_id: &str, date: u64) -> RawEvent {
    RawEvent::new(json!({
        "type": "resource",
        "date": date,
        "session": {"id": session},
        "view": {"id": view},
        "resource": {"id": resource_id, "type": "xhr", "url": "https://example.com/api"},
    }))
}

pub fn error(session: &str, view: &str, date: u64) -> RawEvent {
    RawEvent::new(json!({
        "type": "error",
        "date": date,
        "session": {"id": session},
        "view": {"id": view},
        "error": {"message": "boom", "source": "source"},
    }))
}
