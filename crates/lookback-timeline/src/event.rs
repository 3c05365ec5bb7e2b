//! Timeline events
//!
//! Every event carries a caller-supplied timestamp, the name of the target it
//! concerns, and a kind-specific payload. The payload is a tagged union, so an
//! event's kind is always the kind of its payload.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TimelineError;

/// Category of a timeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A build of the target finished
    Compilation,
    /// A full capture of the debugger model and state
    DebuggerSnapshot,
    /// A hot-reload attempt finished
    HotReload,
}

impl EventKind {
    /// All known kinds
    pub const ALL: [EventKind; 3] = [
        EventKind::Compilation,
        EventKind::DebuggerSnapshot,
        EventKind::HotReload,
    ];

    /// The wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Compilation => "compilation",
            EventKind::DebuggerSnapshot => "debugger_snapshot",
            EventKind::HotReload => "hot_reload",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TimelineError::unknown_event_kind(s))
    }
}

/// Outcome of a compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilationStatus {
    Success,
    Error,
}

/// Payload of a compilation event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationData {
    pub status: CompilationStatus,
    /// Compiler messages, usually present only on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl CompilationData {
    /// A successful compilation
    pub fn success() -> Self {
        Self {
            status: CompilationStatus::Success,
            errors: None,
        }
    }

    /// A failed compilation with its error messages
    pub fn failed<S: Into<String>>(errors: impl IntoIterator<Item = S>) -> Self {
        Self {
            status: CompilationStatus::Error,
            errors: Some(errors.into_iter().map(Into::into).collect()),
        }
    }
}

/// Summary of the message history attached to a snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotHistory {
    pub num_messages: u64,
    #[serde(default)]
    pub recent: Vec<Value>,
    #[serde(default)]
    pub snapshots: Vec<Value>,
}

/// Full debugger state for a target at one instant
///
/// `model` and `state` are opaque to the timeline and are never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebuggerSnapshot {
    pub target_name: String,
    pub timestamp: i64,
    #[serde(default)]
    pub model: Value,
    #[serde(default)]
    pub history: Option<SnapshotHistory>,
    #[serde(default)]
    pub state: Value,
    pub program_type: String,
}

impl DebuggerSnapshot {
    /// Create an empty snapshot for a target
    pub fn new(
        target_name: impl Into<String>,
        timestamp: i64,
        program_type: impl Into<String>,
    ) -> Self {
        Self {
            target_name: target_name.into(),
            timestamp,
            model: Value::Null,
            history: None,
            state: Value::Null,
            program_type: program_type.into(),
        }
    }

    /// Attach the program model
    pub fn with_model(mut self, model: Value) -> Self {
        self.model = model;
        self
    }

    /// Attach the debugger state
    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }

    /// Attach a history summary
    pub fn with_history(mut self, history: SnapshotHistory) -> Self {
        self.history = Some(history);
        self
    }
}

/// Outcome of a hot-reload attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotReloadStatus {
    Success,
    Skipped,
}

/// Payload of a hot-reload event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotReloadData {
    pub status: HotReloadStatus,
}

/// Kind-specific event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventData {
    Compilation(CompilationData),
    DebuggerSnapshot(DebuggerSnapshot),
    HotReload(HotReloadData),
}

impl EventData {
    /// The kind tag of this payload
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Compilation(_) => EventKind::Compilation,
            Self::DebuggerSnapshot(_) => EventKind::DebuggerSnapshot,
            Self::HotReload(_) => EventKind::HotReload,
        }
    }
}

/// A single timestamped record in the timeline
///
/// Serializes as `{"timestamp", "targetName", "type", "data"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// Milliseconds since the Unix epoch, supplied by the producer
    pub timestamp: i64,
    /// Build target or debug session this event concerns
    pub target_name: String,
    #[serde(flatten)]
    pub data: EventData,
}

impl TimelineEvent {
    /// Create an event with an explicit timestamp
    pub fn new(timestamp: i64, target_name: impl Into<String>, data: EventData) -> Self {
        Self {
            timestamp,
            target_name: target_name.into(),
            data,
        }
    }

    /// Create an event stamped with the current wall-clock time
    pub fn now(target_name: impl Into<String>, data: EventData) -> Self {
        Self::new(Utc::now().timestamp_millis(), target_name, data)
    }

    /// Create a compilation event stamped now
    pub fn compilation(target_name: impl Into<String>, data: CompilationData) -> Self {
        Self::now(target_name, EventData::Compilation(data))
    }

    /// Create a snapshot event
    ///
    /// The event takes its target and timestamp from the snapshot itself.
    pub fn debugger_snapshot(snapshot: DebuggerSnapshot) -> Self {
        Self {
            timestamp: snapshot.timestamp,
            target_name: snapshot.target_name.clone(),
            data: EventData::DebuggerSnapshot(snapshot),
        }
    }

    /// Create a hot-reload event stamped now
    pub fn hot_reload(target_name: impl Into<String>, status: HotReloadStatus) -> Self {
        Self::now(target_name, EventData::HotReload(HotReloadData { status }))
    }

    /// The kind of this event
    pub fn kind(&self) -> EventKind {
        self.data.kind()
    }

    /// The snapshot payload, if this is a snapshot event
    pub fn as_snapshot(&self) -> Option<&DebuggerSnapshot> {
        match &self.data {
            EventData::DebuggerSnapshot(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
