//! # Lookback Timeline
//!
//! A fixed-capacity, append-only log of recent debugging events.
//!
//! Producers (compiler, debugger runtime, hot-reload) append
//! [`TimelineEvent`]s. The timeline keeps the most recent `max_size` of them,
//! silently evicting the oldest once full, so memory stays bounded no matter
//! how many events arrive. Consumers replay the retained window with
//! [`TimelineQuery`] filters or recover the newest full debugger state for a
//! target with [`StateTimeline::latest_snapshot`].
//!
//! ## Features
//!
//! - **StateTimeline**: circular buffer with O(1) append and newest-first queries
//! - **SharedTimeline**: lock-protected handle for multi-threaded producers/consumers
//! - **TimelineQuery**: time range, target, and kind filters with a result cap
//! - **TimelineConfig**: capacity and default query limit, loadable from the environment
//!
//! ## Example
//!
//! ```rust
//! use lookback_timeline::{
//!     CompilationData, DebuggerSnapshot, EventKind, StateTimeline, TimelineEvent, TimelineQuery,
//! };
//!
//! let mut timeline = StateTimeline::new(1_000).unwrap();
//!
//! timeline.append(TimelineEvent::compilation("app", CompilationData::success()));
//! timeline.append(TimelineEvent::debugger_snapshot(DebuggerSnapshot::new(
//!     "app", 1_700_000_000_000, "sandbox",
//! )));
//!
//! let builds = timeline.query(&TimelineQuery::new().of_kind(EventKind::Compilation));
//! assert_eq!(builds.len(), 1);
//!
//! let snapshot = timeline.latest_snapshot("app").unwrap();
//! assert_eq!(snapshot.program_type, "sandbox");
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod query;
pub mod shared;
pub mod timeline;

// Re-exports
pub use config::{DEFAULT_MAX_SIZE, DEFAULT_QUERY_LIMIT, TimelineConfig};
pub use error::TimelineError;
pub use event::{
    CompilationData, CompilationStatus, DebuggerSnapshot, EventData, EventKind, HotReloadData,
    HotReloadStatus, SnapshotHistory, TimelineEvent,
};
pub use query::TimelineQuery;
pub use shared::SharedTimeline;
pub use timeline::{StateTimeline, TimelineStats};
