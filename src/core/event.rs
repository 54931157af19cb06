// Canonical events: the vendor-independent shape consumed by the
// reconciliation engine. The normalization layer is the only place that
// knows vendor JSON; everything past it speaks these types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Envelope around a canonical event. The project and author identifiers
/// drive the integration configuration lookup, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub project_id: String,
    pub author_account_id: Option<String>,
    pub event: CanonicalEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanonicalEvent {
    TaskCreated {
        source_id: String,
        fields: TaskFields,
    },
    TaskUpdated {
        source_id: String,
        fields: TaskFields,
    },
    TaskDeleted {
        source_id: String,
    },
    TimeCreated(TimeEntryFields),
    TimeUpdated(TimeEntryFields),
    TimeDeleted {
        source_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFields {
    pub title: String,
    pub body: String,
    /// Source-side completion state. None when the vendor does not model
    /// completion; the engine then leaves the target's flag untouched.
    pub resolved: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntryFields {
    pub source_id: String,
    /// Source id of the task this entry belongs to, when it names one.
    pub parent_source_id: Option<String>,
    pub range: TimeRange,
    pub summary: String,
}

/// The interval a time entry covers, in the source system's own offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}
