//! Bounded circular timeline
//!
//! Events live in a vector that grows until it reaches capacity and is then
//! overwritten in place at the write cursor. Only the first `events.len()`
//! slots are ever read, so no slot needs a "vacant" marker.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::config::TimelineConfig;
use crate::error::TimelineError;
use crate::event::{DebuggerSnapshot, TimelineEvent};
use crate::query::TimelineQuery;

/// Point-in-time counters for a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimelineStats {
    /// Events currently retained
    pub retained: usize,
    /// Maximum number of retained events
    pub capacity: usize,
    /// Events appended since construction or the last clear
    pub total_appended: u64,
    /// Events overwritten to make room for newer ones
    pub evicted: u64,
}

/// Fixed-capacity, append-only log of the most recent timeline events
///
/// Appending is O(1). Once the timeline is full each append evicts exactly the
/// oldest retained event. Queries scan newest to oldest.
///
/// The timeline performs no locking; wrap it in a
/// [`SharedTimeline`](crate::SharedTimeline) to share it across threads.
#[derive(Debug)]
pub struct StateTimeline {
    /// Retained events, `len() <= max_size`
    events: Vec<Arc<TimelineEvent>>,
    /// Next write position
    head: usize,
    max_size: usize,
    default_query_limit: usize,
    total_appended: u64,
    /// Timestamp of the most recent append
    last_timestamp: Option<i64>,
}

impl Default for StateTimeline {
    fn default() -> Self {
        Self::from_valid_config(TimelineConfig::default())
    }
}

impl StateTimeline {
    /// Create a timeline retaining at most `max_size` events
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvalidCapacity`] if `max_size` is zero.
    pub fn new(max_size: usize) -> Result<Self, TimelineError> {
        Self::with_config(TimelineConfig::default().with_max_size(max_size))
    }

    /// Create a timeline from a configuration
    #[instrument(skip_all, fields(max_size = config.max_size))]
    pub fn with_config(config: TimelineConfig) -> Result<Self, TimelineError> {
        config.validate()?;
        debug!(
            default_query_limit = config.default_query_limit,
            "Creating state timeline"
        );
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: TimelineConfig) -> Self {
        Self {
            events: Vec::with_capacity(config.max_size),
            head: 0,
            max_size: config.max_size,
            default_query_limit: config.default_query_limit,
            total_appended: 0,
            last_timestamp: None,
        }
    }

    /// Append an event, evicting the oldest one if the timeline is full
    ///
    /// Timestamps are not required to be ordered. An event older than the
    /// previous append is stored in arrival order like any other.
    pub fn append(&mut self, event: TimelineEvent) {
        trace!(
            timestamp = event.timestamp,
            target = %event.target_name,
            kind = %event.kind(),
            "Appending timeline event"
        );

        if let Some(last) = self.last_timestamp
            && event.timestamp < last
        {
            debug!(
                timestamp = event.timestamp,
                previous = last,
                "Timeline event arrived out of order"
            );
        }
        self.last_timestamp = Some(event.timestamp);

        let event = Arc::new(event);
        if self.events.len() < self.max_size {
            self.events.push(event);
        } else {
            let evicted = std::mem::replace(&mut self.events[self.head], event);
            trace!(
                timestamp = evicted.timestamp,
                target = %evicted.target_name,
                "Evicted oldest timeline event"
            );
        }
        self.head = (self.head + 1) % self.max_size;
        self.total_appended += 1;
    }

    /// Events matching `query`, newest first
    ///
    /// Scanning stops once the limit is reached, so the result holds the
    /// newest matches. The timeline's default limit applies when the query
    /// carries none.
    pub fn query(&self, query: &TimelineQuery) -> Vec<Arc<TimelineEvent>> {
        let limit = query.limit.unwrap_or(self.default_query_limit);
        self.newest_first()
            .filter(|event| query.matches(event))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Payload of the most recent snapshot for `target_name`, if still retained
    pub fn latest_snapshot(&self, target_name: &str) -> Option<&DebuggerSnapshot> {
        self.newest_first()
            .filter(|event| event.target_name == target_name)
            .find_map(|event| event.as_snapshot())
    }

    /// Drop every retained event and reset the counters
    ///
    /// Capacity and the default query limit are preserved.
    pub fn clear(&mut self) {
        debug!(retained = self.events.len(), "Clearing state timeline");
        self.events.clear();
        self.head = 0;
        self.total_appended = 0;
        self.last_timestamp = None;
    }

    /// The most recently appended event
    pub fn latest(&self) -> Option<&Arc<TimelineEvent>> {
        self.newest_first().next()
    }

    /// Retained events in insertion order, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<TimelineEvent>> + '_ {
        let len = self.events.len();
        // Before the buffer first fills, head == len and the oldest slot is 0.
        let oldest = self.head % len.max(1);
        (0..len).map(move |i| &self.events[(oldest + i) % len])
    }

    fn newest_first(&self) -> impl Iterator<Item = &Arc<TimelineEvent>> + '_ {
        self.iter().rev()
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are retained
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Maximum number of retained events
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Result cap applied to queries without their own limit
    pub fn default_query_limit(&self) -> usize {
        self.default_query_limit
    }

    /// Current counters
    pub fn stats(&self) -> TimelineStats {
        TimelineStats {
            retained: self.events.len(),
            capacity: self.max_size,
            total_appended: self.total_appended,
            evicted: self.total_appended - self.events.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CompilationData, EventData, EventKind, HotReloadData, HotReloadStatus};

    fn compilation(timestamp: i64, target: &str) -> TimelineEvent {
        TimelineEvent::new(timestamp, target, EventData::Compilation(CompilationData::success()))
    }

    fn hot_reload(timestamp: i64, target: &str) -> TimelineEvent {
        TimelineEvent::new(
            timestamp,
            target,
            EventData::HotReload(HotReloadData {
                status: HotReloadStatus::Success,
            }),
        )
    }

    fn snapshot(timestamp: i64, target: &str) -> TimelineEvent {
        TimelineEvent::debugger_snapshot(DebuggerSnapshot::new(target, timestamp, "sandbox"))
    }

    fn timestamps(events: &[Arc<TimelineEvent>]) -> Vec<i64> {
        events.iter().map(|e| e.timestamp).collect()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            StateTimeline::new(0),
            Err(TimelineError::InvalidCapacity)
        ));
    }

    #[test]
    fn test_default_capacity() {
        let timeline = StateTimeline::default();
        assert_eq!(timeline.capacity(), 10_000);
        assert_eq!(timeline.default_query_limit(), 100);
        assert!(timeline.is_empty());
    }

    // ========================================================================
    // Append and eviction
    // ========================================================================

    #[test]
    fn test_append_until_full() {
        let mut timeline = StateTimeline::new(3).unwrap();
        for ts in 1..=3 {
            timeline.append(compilation(ts, "a"));
        }
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.head, 0);
        assert_eq!(timestamps(&timeline.query(&TimelineQuery::new())), vec![3, 2, 1]);
    }

    #[test]
    fn test_append_evicts_oldest() {
        let mut timeline = StateTimeline::new(3).unwrap();
        for ts in 1..=5 {
            timeline.append(compilation(ts, "a"));
        }
        assert_eq!(timeline.len(), 3);
        assert_eq!(timestamps(&timeline.query(&TimelineQuery::new())), vec![5, 4, 3]);

        let chronological: Vec<_> = timeline.iter().map(|e| e.timestamp).collect();
        assert_eq!(chronological, vec![3, 4, 5]);
    }

    #[test]
    fn test_capacity_one() {
        let mut timeline = StateTimeline::new(1).unwrap();
        timeline.append(compilation(1, "a"));
        timeline.append(compilation(2, "a"));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.latest().map(|e| e.timestamp), Some(2));
    }

    #[test]
    fn test_out_of_order_timestamps_kept_in_arrival_order() {
        let mut timeline = StateTimeline::new(4).unwrap();
        timeline.append(compilation(10, "a"));
        timeline.append(compilation(5, "a"));
        timeline.append(compilation(7, "a"));
        assert_eq!(timestamps(&timeline.query(&TimelineQuery::new())), vec![7, 5, 10]);
    }

    #[test]
    fn test_stats_track_evictions() {
        let mut timeline = StateTimeline::new(2).unwrap();
        for ts in 1..=5 {
            timeline.append(compilation(ts, "a"));
        }
        assert_eq!(
            timeline.stats(),
            TimelineStats {
                retained: 2,
                capacity: 2,
                total_appended: 5,
                evicted: 3,
            }
        );
    }

    // ========================================================================
    // Query
    // ========================================================================

    #[test]
    fn test_query_filters_by_target_after_eviction() {
        let mut timeline = StateTimeline::new(3).unwrap();
        timeline.append(compilation(1, "t1"));
        timeline.append(hot_reload(2, "t1"));
        timeline.append(compilation(3, "t2"));
        timeline.append(compilation(4, "t1"));

        let results = timeline.query(&TimelineQuery::new().for_target("t1"));
        assert_eq!(timestamps(&results), vec![4, 2]);
    }

    #[test]
    fn test_query_limit_keeps_newest_matches() {
        let mut timeline = StateTimeline::new(10).unwrap();
        for ts in 1..=8 {
            timeline.append(compilation(ts, "a"));
        }
        let results = timeline.query(&TimelineQuery::new().with_limit(3));
        assert_eq!(timestamps(&results), vec![8, 7, 6]);
    }

    #[test]
    fn test_query_zero_limit_returns_nothing() {
        let mut timeline = StateTimeline::new(4).unwrap();
        timeline.append(compilation(1, "a"));
        assert!(timeline.query(&TimelineQuery::new().with_limit(0)).is_empty());
    }

    #[test]
    fn test_query_uses_configured_default_limit() {
        let config = TimelineConfig::default()
            .with_max_size(10)
            .with_default_query_limit(2);
        let mut timeline = StateTimeline::with_config(config).unwrap();
        for ts in 1..=5 {
            timeline.append(compilation(ts, "a"));
        }
        assert_eq!(timestamps(&timeline.query(&TimelineQuery::new())), vec![5, 4]);
    }

    #[test]
    fn test_query_by_kind_and_time() {
        let mut timeline = StateTimeline::new(10).unwrap();
        timeline.append(compilation(1, "a"));
        timeline.append(hot_reload(2, "a"));
        timeline.append(hot_reload(3, "b"));
        timeline.append(hot_reload(4, "a"));
        timeline.append(compilation(5, "a"));

        let query = TimelineQuery::new().of_kind(EventKind::HotReload).until(3);
        assert_eq!(timestamps(&timeline.query(&query)), vec![3, 2]);
    }

    #[test]
    fn test_query_results_survive_later_appends() {
        let mut timeline = StateTimeline::new(2).unwrap();
        timeline.append(compilation(1, "a"));
        let before = timeline.query(&TimelineQuery::new());

        timeline.append(compilation(2, "a"));
        timeline.append(compilation(3, "a"));

        assert_eq!(timestamps(&before), vec![1]);
        assert_eq!(timestamps(&timeline.query(&TimelineQuery::new())), vec![3, 2]);
    }

    // ========================================================================
    // Snapshot lookup
    // ========================================================================

    #[test]
    fn test_latest_snapshot_returns_newest() {
        let mut timeline = StateTimeline::new(10).unwrap();
        timeline.append(snapshot(1, "a"));
        timeline.append(snapshot(2, "a"));
        timeline.append(snapshot(3, "b"));
        timeline.append(compilation(4, "a"));

        let found = timeline.latest_snapshot("a").unwrap();
        assert_eq!(found.timestamp, 2);
        assert!(timeline.latest_snapshot("c").is_none());
    }

    #[test]
    fn test_latest_snapshot_gone_after_eviction() {
        let mut timeline = StateTimeline::new(3).unwrap();
        timeline.append(snapshot(1, "a"));
        timeline.append(snapshot(2, "a"));
        for ts in 3..=5 {
            timeline.append(compilation(ts, "a"));
        }
        assert!(timeline.latest_snapshot("a").is_none());
    }

    // ========================================================================
    // Clear
    // ========================================================================

    #[test]
    fn test_clear_resets_to_new() {
        let mut timeline = StateTimeline::new(3).unwrap();
        for ts in 1..=4 {
            timeline.append(snapshot(ts, "a"));
        }
        timeline.clear();

        assert!(timeline.is_empty());
        assert_eq!(timeline.capacity(), 3);
        assert!(timeline.query(&TimelineQuery::new()).is_empty());
        assert!(timeline.latest_snapshot("a").is_none());
        assert_eq!(
            timeline.stats(),
            TimelineStats {
                capacity: 3,
                ..Default::default()
            }
        );

        timeline.append(compilation(10, "a"));
        timeline.append(compilation(11, "a"));
        assert_eq!(timestamps(&timeline.query(&TimelineQuery::new())), vec![11, 10]);
        assert_eq!(timeline.head, 2);
    }
}
