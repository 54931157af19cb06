// Task reconciliation. Keyed on (event type, link existence, remote task
// existence):
//
// - created, no link      -> create remote task, persist link
// - created, link present -> duplicate delivery, converge on the update path
// - updated, no link      -> implicit create (entity predates the integration)
// - updated, stale target -> recreate remote task, repoint the link
// - updated, target alive -> field update, then a separate completion call
// - deleted               -> best-effort remote delete, best-effort link delete

use tracing::{info, warn};

use crate::application::best_effort::best_effort;
use crate::application::errors::ReconcileError;
use crate::application::reconcile::{task_payload, Reconciler};
use crate::core::config::IntegrationConfig;
use crate::core::event::TaskFields;
use crate::core::link::{EntityKind, NewLink};
use crate::core::ports::{RemoteProject, RemoteTask};

impl Reconciler {
    pub(crate) async fn task_created(
        &self,
        remote: &dyn RemoteProject,
        config: &IntegrationConfig,
        source_id: &str,
        fields: &TaskFields,
    ) -> Result<(), ReconcileError> {
        if self.find_link(EntityKind::Task, source_id).await.is_some() {
            // Duplicate delivery. Update-if-exists instead of a blind create,
            // so the remote never ends up with two tasks for one source id.
            return self.task_updated(remote, config, source_id, fields).await;
        }

        info!(source_id, "creating remote task");
        let payload = task_payload(config, fields);
        let task = remote.create_task(&payload).await?;
        self.links()
            .create_if_absent(NewLink::task(source_id, task.id))
            .await?;
        Ok(())
    }

    pub(crate) async fn task_updated(
        &self,
        remote: &dyn RemoteProject,
        config: &IntegrationConfig,
        source_id: &str,
        fields: &TaskFields,
    ) -> Result<(), ReconcileError> {
        let payload = task_payload(config, fields);

        let Some(link) = self.find_link(EntityKind::Task, source_id).await else {
            // The entity existed before the integration was switched on.
            info!(source_id, "no task link, creating implicitly");
            let task = remote.create_task(&payload).await?;
            self.links()
                .create_if_absent(NewLink::task(source_id, task.id))
                .await?;
            return self.reconcile_completion(remote, &task, fields.resolved).await;
        };

        match remote.find_task(link.target_id).await {
            Ok(existing) => {
                let updated = remote.update_task(existing.id, &payload).await?;
                self.reconcile_completion(remote, &updated, fields.resolved)
                    .await
            }
            Err(error) => {
                // Target deleted out-of-band. Recreate and repoint the
                // existing link; never a second link for this source id.
                warn!(%error, source_id, target_id = link.target_id, "linked task is gone, recreating");
                let task = remote.create_task(&payload).await?;
                self.links().update_target(&link.id, task.id, None).await?;
                self.reconcile_completion(remote, &task, fields.resolved)
                    .await
            }
        }
    }

    /// Completion is a dedicated endpoint on the remote API, never part of
    /// the field update. Only called when source and target disagree.
    async fn reconcile_completion(
        &self,
        remote: &dyn RemoteProject,
        task: &RemoteTask,
        resolved: Option<bool>,
    ) -> Result<(), ReconcileError> {
        match resolved {
            Some(true) if !task.is_completed => remote.complete_task(task.id).await?,
            Some(false) if task.is_completed => remote.reopen_task(task.id).await?,
            _ => {}
        }
        Ok(())
    }

    pub(crate) async fn task_deleted(
        &self,
        remote: &dyn RemoteProject,
        source_id: &str,
    ) -> Result<(), ReconcileError> {
        let Some(link) = self.find_link(EntityKind::Task, source_id).await else {
            // Already reconciled or never linked.
            return Ok(());
        };

        info!(source_id, target_id = link.target_id, "deleting remote task");
        best_effort("delete remote task", remote.delete_task(link.target_id)).await;
        best_effort("delete task link", self.links().delete(&link.id)).await;
        Ok(())
    }
}
