// Link records tie an entity in the source system (Jira, Clockify) to its
// counterpart in ActiveCollab. At most one record exists per
// (entity_kind, source_id); the store enforces this via create_if_absent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Task,
    TimeEntry,
}

/// Persisted correspondence between a source entity and its target counterpart.
///
/// `source_id` is immutable. `target_id` and the parent reference can be
/// repointed when the target entity is deleted out-of-band and recreated, or
/// when a time entry is moved to another parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    pub entity_kind: EntityKind,
    pub source_id: String,
    pub target_id: i64,
    pub target_parent_id: Option<i64>,
    pub target_parent_type: Option<String>,
}

/// A link as handed to the store; the store assigns the record id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLink {
    pub entity_kind: EntityKind,
    pub source_id: String,
    pub target_id: i64,
    pub target_parent_id: Option<i64>,
    pub target_parent_type: Option<String>,
}

impl NewLink {
    pub fn task(source_id: impl Into<String>, target_id: i64) -> Self {
        Self {
            entity_kind: EntityKind::Task,
            source_id: source_id.into(),
            target_id,
            target_parent_id: None,
            target_parent_type: None,
        }
    }

    pub fn time_entry(
        source_id: impl Into<String>,
        target_id: i64,
        parent_id: i64,
        parent_type: impl Into<String>,
    ) -> Self {
        Self {
            entity_kind: EntityKind::TimeEntry,
            source_id: source_id.into(),
            target_id,
            target_parent_id: Some(parent_id),
            target_parent_type: Some(parent_type.into()),
        }
    }
}
