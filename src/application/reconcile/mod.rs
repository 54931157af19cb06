// The reconciliation engine. One inbound event at a time: look up the
// integration configuration, connect the remote client, then dispatch on
// the event kind. All state lives in the injected stores; the engine itself
// holds nothing between invocations.
//
// Failure semantics
// - Lookup-style remote calls treat any failure as "not found" and take the
//   fallback branch.
// - Primary mutating calls propagate and abort the event.
// - Cleanup calls go through the best_effort wrapper.

mod task;
mod time;

use std::sync::Arc;

use crate::application::errors::ReconcileError;
use crate::core::config::IntegrationConfig;
use crate::core::event::{CanonicalEvent, InboundEvent};
use crate::core::link::{EntityKind, LinkRecord};
use crate::core::ports::{IntegrationStore, LinkStore, RemoteFactory, RemoteProject};

pub struct Reconciler {
    links: Arc<dyn LinkStore>,
    integrations: Arc<dyn IntegrationStore>,
    remotes: Arc<dyn RemoteFactory>,
}

impl Reconciler {
    pub fn new(
        links: Arc<dyn LinkStore>,
        integrations: Arc<dyn IntegrationStore>,
        remotes: Arc<dyn RemoteFactory>,
    ) -> Self {
        Self {
            links,
            integrations,
            remotes,
        }
    }

    pub async fn handle(&self, inbound: InboundEvent) -> Result<(), ReconcileError> {
        let config = self
            .integrations
            .find(&inbound.project_id, inbound.author_account_id.as_deref())
            .await
            .ok()
            .flatten()
            .ok_or(ReconcileError::ConfigMissing {
                project_id: inbound.project_id.clone(),
            })?;

        let remote = self.remotes.connect(&config)?;

        match inbound.event {
            CanonicalEvent::TaskCreated { source_id, fields } => {
                self.task_created(remote.as_ref(), &config, &source_id, &fields)
                    .await
            }
            CanonicalEvent::TaskUpdated { source_id, fields } => {
                self.task_updated(remote.as_ref(), &config, &source_id, &fields)
                    .await
            }
            CanonicalEvent::TaskDeleted { source_id } => {
                self.task_deleted(remote.as_ref(), &source_id).await
            }
            CanonicalEvent::TimeCreated(fields) => {
                self.time_created(remote.as_ref(), &config, &fields).await
            }
            CanonicalEvent::TimeUpdated(fields) => {
                self.time_updated(remote.as_ref(), &config, &fields).await
            }
            CanonicalEvent::TimeDeleted { source_id } => {
                self.time_deleted(remote.as_ref(), &source_id).await
            }
        }
    }

    pub(crate) fn links(&self) -> &dyn LinkStore {
        self.links.as_ref()
    }

    /// Store failures are indistinguishable from "no record": the engine
    /// falls through to the implicit-create path instead of failing the
    /// whole webhook.
    pub(crate) async fn find_link(&self, kind: EntityKind, source_id: &str) -> Option<LinkRecord> {
        self.links
            .find_by_source(kind, source_id)
            .await
            .ok()
            .flatten()
    }

    /// Intended target parent for a time entry: present only when the event
    /// names a parent task, that task is linked, and the linked target task
    /// still exists remotely. Anything else files the entry at project level.
    pub(crate) async fn resolve_parent(
        &self,
        remote: &dyn RemoteProject,
        parent_source_id: Option<&str>,
    ) -> Option<i64> {
        let source_id = parent_source_id?;
        let link = self.find_link(EntityKind::Task, source_id).await?;
        match remote.find_task(link.target_id).await {
            Ok(task) => Some(task.id),
            Err(error) => {
                tracing::warn!(%error, source_id, "linked parent task is gone, filing at project level");
                None
            }
        }
    }
}

pub(crate) fn task_payload(
    config: &IntegrationConfig,
    fields: &crate::core::event::TaskFields,
) -> crate::core::ports::TaskPayload {
    crate::core::ports::TaskPayload {
        name: fields.title.clone(),
        body: fields.body.clone(),
        subscribers: config.defaults.subscribers.clone(),
    }
}

pub(crate) fn time_payload(
    config: &IntegrationConfig,
    fields: &crate::core::event::TimeEntryFields,
    task_id: Option<i64>,
) -> crate::core::ports::TimePayload {
    crate::core::ports::TimePayload {
        value: crate::core::format::duration_value(&fields.range),
        record_date: crate::core::format::record_date(&fields.range),
        job_type_id: config.defaults.job_type_id,
        billable_status: config.defaults.billable_status,
        summary: fields.summary.clone(),
        task_id,
    }
}
