// Ports define what the engine needs from the outside world, without
// implementing it.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in
//   the adapters layer.
//
// Testing guidance
// - In-memory implementations live under adapters::in_memory and back every
//   engine and shell test.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::IntegrationConfig;
use crate::core::link::{EntityKind, LinkRecord, NewLink};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote entity not found")]
    NotFound,

    #[error("remote api error: status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}

/// Task as the target system reports it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTask {
    pub id: i64,
    pub is_completed: bool,
}

/// Time record as the target system reports it back. The parent reference
/// is whatever the remote actually filed the record under, which may differ
/// from what was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTimeEntry {
    pub id: i64,
    pub parent_id: i64,
    pub parent_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub name: String,
    pub body: String,
    pub subscribers: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePayload {
    pub value: String,
    pub record_date: String,
    pub job_type_id: i64,
    pub billable_status: i64,
    pub summary: String,
    pub task_id: Option<i64>,
}

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Equality match on the source identifier, at most one result.
    async fn find_by_source(
        &self,
        kind: EntityKind,
        source_id: &str,
    ) -> Result<Option<LinkRecord>, StoreError>;

    /// Atomic insert keyed on (entity_kind, source_id). Returns the existing
    /// record when one is already present, so concurrent reconciliations of
    /// the same source entity converge on one link.
    async fn create_if_absent(&self, link: NewLink) -> Result<LinkRecord, StoreError>;

    /// Repoint an existing link at a new target entity, optionally updating
    /// the recorded parent reference.
    async fn update_target(
        &self,
        record_id: &str,
        target_id: i64,
        parent: Option<(i64, String)>,
    ) -> Result<(), StoreError>;

    async fn delete(&self, record_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait IntegrationStore: Send + Sync {
    /// Composite equality filter, limit one.
    async fn find(
        &self,
        project_id: &str,
        author_account_id: Option<&str>,
    ) -> Result<Option<IntegrationConfig>, StoreError>;
}

/// CRUD surface of one target-system project, addressed relative to the
/// configured account/project base path and authenticated with the
/// integration token.
#[async_trait]
pub trait RemoteProject: Send + Sync {
    async fn find_task(&self, id: i64) -> Result<RemoteTask, RemoteError>;
    async fn create_task(&self, payload: &TaskPayload) -> Result<RemoteTask, RemoteError>;
    async fn update_task(&self, id: i64, payload: &TaskPayload) -> Result<RemoteTask, RemoteError>;
    async fn delete_task(&self, id: i64) -> Result<(), RemoteError>;
    async fn complete_task(&self, id: i64) -> Result<(), RemoteError>;
    async fn reopen_task(&self, id: i64) -> Result<(), RemoteError>;

    async fn find_time(&self, id: i64) -> Result<RemoteTimeEntry, RemoteError>;
    async fn create_time(&self, payload: &TimePayload) -> Result<RemoteTimeEntry, RemoteError>;
    async fn update_time(&self, id: i64, payload: &TimePayload)
        -> Result<RemoteTimeEntry, RemoteError>;
    async fn move_time(&self, id: i64, task_id: i64) -> Result<(), RemoteError>;
    async fn delete_time(&self, id: i64) -> Result<(), RemoteError>;
}

/// Builds a remote client for one integration's account and project.
pub trait RemoteFactory: Send + Sync {
    fn connect(&self, config: &IntegrationConfig) -> Result<Arc<dyn RemoteProject>, RemoteError>;
}
