//! View visits: per-view aggregates of a session's events.
//!
//! # Algorithm Summary
//!
//! 1. Seed one builder per distinct `view.id` found among view events
//! 2. Walk view events in time order, fixing the visit path from the first one
//! 3. Link action, resource and error events to their visit by `view.id`
//! 4. Re-sort each visit's view events by document version
//! 5. Order visits by the date of their lowest-document-version view event

use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;

use serde::Serialize;

use crate::event::{
    ActionEvent, ClassifiedEvent, ErrorEvent, ResourceEvent, RumEvent, TimedEvent, ViewEvent,
};
use crate::types::ViewId;
use crate::violation::ConsistencyViolation;

/// Typed events of one session, split by kind.
///
/// Each list keeps the order of the sequence it was split from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsByType {
    pub views: Vec<ViewEvent>,
    pub actions: Vec<ActionEvent>,
    pub resources: Vec<ResourceEvent>,
    pub errors: Vec<ErrorEvent>,
}

impl EventsByType {
    /// Total number of events across all kinds.
    pub fn len(&self) -> usize {
        self.views.len() + self.actions.len() + self.resources.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<ClassifiedEvent> for EventsByType {
    fn from_iter<I: IntoIterator<Item = ClassifiedEvent>>(iter: I) -> Self {
        let mut split = Self::default();
        for event in iter {
            match event {
                ClassifiedEvent::View(event) => split.views.push(event),
                ClassifiedEvent::Action(event) => split.actions.push(event),
                ClassifiedEvent::Resource(event) => split.resources.push(event),
                ClassifiedEvent::Error(event) => split.errors.push(event),
            }
        }
        split
    }
}

/// A single view visit tracked in a session.
///
/// Groups every event sent while the view identified by `view_id` was
/// displayed. Visits are read-only once assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewVisit {
    view_id: ViewId,
    path: String,
    start_date: u64,
    view_events: Vec<ViewEvent>,
    action_events: Vec<ActionEvent>,
    resource_events: Vec<ResourceEvent>,
    error_events: Vec<ErrorEvent>,
}

impl ViewVisit {
    pub const fn view_id(&self) -> &ViewId {
        &self.view_id
    }

    /// The `view.url` shared by every view event of the visit.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Date of the lowest-document-version view event.
    pub const fn start_date(&self) -> u64 {
        self.start_date
    }

    /// View updates in ascending document version.
    pub fn view_events(&self) -> &[ViewEvent] {
        &self.view_events
    }

    pub fn first_view_event(&self) -> Option<&ViewEvent> {
        self.view_events.first()
    }

    /// Actions in time order.
    pub fn action_events(&self) -> &[ActionEvent] {
        &self.action_events
    }

    /// Resources in time order.
    pub fn resource_events(&self) -> &[ResourceEvent] {
        &self.resource_events
    }

    /// Errors in time order.
    pub fn error_events(&self) -> &[ErrorEvent] {
        &self.error_events
    }

    pub fn event_count(&self) -> usize {
        self.view_events.len()
            + self.action_events.len()
            + self.resource_events.len()
            + self.error_events.len()
    }
}

/// Mutable accumulator for one visit, alive only during [`assemble`].
#[derive(Debug)]
struct ViewVisitBuilder {
    view_id: ViewId,
    path: Option<String>,
    view_events: Vec<ViewEvent>,
    action_events: Vec<ActionEvent>,
    resource_events: Vec<ResourceEvent>,
    error_events: Vec<ErrorEvent>,
}

impl ViewVisitBuilder {
    const fn new(view_id: ViewId) -> Self {
        Self {
            view_id,
            path: None,
            view_events: Vec::new(),
            action_events: Vec::new(),
            resource_events: Vec::new(),
            error_events: Vec::new(),
        }
    }

    /// Appends a view update, fixing the path on the first one.
    fn push_view(&mut self, event: ViewEvent) -> Result<(), ConsistencyViolation> {
        if let Some(path) = &self.path {
            if *path != event.view.url {
                return Err(ConsistencyViolation::InconsistentPath {
                    session_id: event.session.id.clone(),
                    view_id: self.view_id.clone(),
                    expected: path.clone(),
                    found: event.view.url.clone(),
                    event: event.snapshot(),
                });
            }
        } else {
            self.path = Some(event.view.url.clone());
        }
        self.view_events.push(event);
        Ok(())
    }

    fn into_visit(mut self) -> ViewVisit {
        self.view_events.sort_by_key(|event| event.dd.document_version);
        // Builders are seeded from view events, so the list is never empty.
        let start_date = self.view_events.first().map_or(0, TimedEvent::date);
        ViewVisit {
            view_id: self.view_id,
            path: self.path.unwrap_or_default(),
            start_date,
            view_events: self.view_events,
            action_events: self.action_events,
            resource_events: self.resource_events,
            error_events: self.error_events,
        }
    }
}

/// Looks up the visit an event belongs to.
fn visit_for<'a, E: RumEvent>(
    builders: &'a mut HashMap<ViewId, ViewVisitBuilder>,
    event: &E,
) -> Result<&'a mut ViewVisitBuilder, ConsistencyViolation> {
    builders
        .get_mut(event.view_id())
        .ok_or_else(|| ConsistencyViolation::OrphanEvent {
            session_id: event.session_id().clone(),
            view_id: event.view_id().clone(),
            event_type: E::EVENT_TYPE,
            event: event.snapshot(),
        })
}

/// Groups time-ordered events of one session into view visits keyed by `view.id`.
///
/// Fails with [`ConsistencyViolation::OrphanEvent`] when an event references
/// a view with no view event, and with
/// [`ConsistencyViolation::InconsistentPath`] when view events of one visit
/// disagree on `view.url`.
pub fn assemble(
    events: EventsByType,
) -> Result<HashMap<ViewId, ViewVisit>, ConsistencyViolation> {
    let EventsByType {
        views,
        actions,
        resources,
        errors,
    } = events;

    let view_ids: HashSet<&ViewId> = views.iter().map(|event| &event.view.id).collect();
    let mut builders: HashMap<ViewId, ViewVisitBuilder> = view_ids
        .into_iter()
        .map(|view_id| (view_id.clone(), ViewVisitBuilder::new(view_id.clone())))
        .collect();

    for event in views {
        visit_for(&mut builders, &event)?.push_view(event)?;
    }
    for event in actions {
        visit_for(&mut builders, &event)?.action_events.push(event);
    }
    for event in resources {
        visit_for(&mut builders, &event)?.resource_events.push(event);
    }
    for event in errors {
        visit_for(&mut builders, &event)?.error_events.push(event);
    }

    Ok(builders
        .into_iter()
        .map(|(view_id, builder)| (view_id, builder.into_visit()))
        .collect())
}

/// Orders visits by start date; visits starting together are ordered by `view.id`.
pub fn order_visits<S: BuildHasher>(visits: HashMap<ViewId, ViewVisit, S>) -> Vec<ViewVisit> {
    let mut ordered: Vec<ViewVisit> = visits.into_values().collect();
    ordered.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.view_id.cmp(&b.view_id))
    });
    ordered
}
