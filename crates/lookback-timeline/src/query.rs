//! Query filters over the retained window
//!
//! Every field is optional. Supplied fields are combined as a conjunction,
//! so an event must satisfy all of them to be returned.

use serde::{Deserialize, Serialize};

use crate::event::{EventKind, TimelineEvent};

/// Filter parameters for [`StateTimeline::query`](crate::StateTimeline::query)
///
/// Deserializes from camelCase JSON (`startTime`, `endTime`, `targetName`,
/// `eventType`, `limit`) so request parameters can be passed straight through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineQuery {
    /// Inclusive lower bound on the event timestamp
    pub start_time: Option<i64>,
    /// Inclusive upper bound on the event timestamp
    pub end_time: Option<i64>,
    /// Exact target name
    pub target_name: Option<String>,
    /// Exact event kind
    pub event_type: Option<EventKind>,
    /// Maximum number of results; the timeline's default applies when unset
    pub limit: Option<usize>,
}

impl TimelineQuery {
    /// A query with no predicates
    pub fn new() -> Self {
        Self::default()
    }

    /// Only events at or after `start`
    pub fn since(mut self, start: i64) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Only events at or before `end`
    pub fn until(mut self, end: i64) -> Self {
        self.end_time = Some(end);
        self
    }

    /// Only events within `[start, end]`
    pub fn between(self, start: i64, end: i64) -> Self {
        self.since(start).until(end)
    }

    /// Only events for the given target
    pub fn for_target(mut self, target_name: impl Into<String>) -> Self {
        self.target_name = Some(target_name.into());
        self
    }

    /// Only events of the given kind
    pub fn of_kind(mut self, kind: EventKind) -> Self {
        self.event_type = Some(kind);
        self
    }

    /// Cap the number of results
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check whether an event satisfies every supplied predicate
    ///
    /// The limit is not a predicate and is ignored here.
    pub fn matches(&self, event: &TimelineEvent) -> bool {
        if self.start_time.is_some_and(|start| event.timestamp < start) {
            return false;
        }
        if self.end_time.is_some_and(|end| event.timestamp > end) {
            return false;
        }
        if self
            .target_name
            .as_deref()
            .is_some_and(|target| event.target_name != target)
        {
            return false;
        }
        if self.event_type.is_some_and(|kind| event.kind() != kind) {
            return false;
        }
        true
    }
}
