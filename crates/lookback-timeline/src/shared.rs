//! Thread-safe timeline handle
//!
//! [`StateTimeline`] performs no locking of its own. `SharedTimeline` wraps it
//! in a reader-writer lock so producers and consumers on different threads
//! never observe a slot mid-overwrite.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::TimelineConfig;
use crate::error::TimelineError;
use crate::event::{DebuggerSnapshot, TimelineEvent};
use crate::query::TimelineQuery;
use crate::timeline::{StateTimeline, TimelineStats};

/// Cloneable, lock-protected handle to a [`StateTimeline`]
///
/// Clones share the same underlying timeline.
#[derive(Debug, Clone, Default)]
pub struct SharedTimeline {
    inner: Arc<RwLock<StateTimeline>>,
}

impl From<StateTimeline> for SharedTimeline {
    fn from(timeline: StateTimeline) -> Self {
        Self {
            inner: Arc::new(RwLock::new(timeline)),
        }
    }
}

impl SharedTimeline {
    /// Create a shared timeline retaining at most `max_size` events
    pub fn new(max_size: usize) -> Result<Self, TimelineError> {
        StateTimeline::new(max_size).map(Self::from)
    }

    /// Create a shared timeline from a configuration
    pub fn with_config(config: TimelineConfig) -> Result<Self, TimelineError> {
        StateTimeline::with_config(config).map(Self::from)
    }

    /// Append an event
    pub fn append(&self, event: TimelineEvent) {
        self.inner.write().append(event);
    }

    /// Events matching `query`, newest first
    pub fn query(&self, query: &TimelineQuery) -> Vec<Arc<TimelineEvent>> {
        self.inner.read().query(query)
    }

    /// Clone of the most recent snapshot payload for `target_name`
    pub fn latest_snapshot(&self, target_name: &str) -> Option<DebuggerSnapshot> {
        self.inner.read().latest_snapshot(target_name).cloned()
    }

    /// Drop every retained event
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no events are retained
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Maximum number of retained events
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Current counters
    pub fn stats(&self) -> TimelineStats {
        self.inner.read().stats()
    }

    /// Run `f` with shared access to the underlying timeline
    pub fn with_timeline<R>(&self, f: impl FnOnce(&StateTimeline) -> R) -> R {
        f(&self.inner.read())
    }
}
