// Time-entry reconciliation. The intricate part is the movable parent: an
// entry's task can be relinked, deleted, or missing on the remote side, and
// the remote decides where a record is actually filed.
//
// - created            -> resolve parent, create remote entry, persist link
//                         with the parent as reported back by the remote
// - updated, no link   -> fall back to the created path
// - updated, stale     -> recreate remote entry, repoint the link
// - updated, relocated -> move first, then apply the field update
// - deleted            -> best-effort remote delete, best-effort link delete

use tracing::{info, warn};

use crate::application::best_effort::best_effort;
use crate::application::errors::ReconcileError;
use crate::application::reconcile::{time_payload, Reconciler};
use crate::core::config::IntegrationConfig;
use crate::core::event::TimeEntryFields;
use crate::core::link::{EntityKind, NewLink};
use crate::core::ports::RemoteProject;

impl Reconciler {
    pub(crate) async fn time_created(
        &self,
        remote: &dyn RemoteProject,
        config: &IntegrationConfig,
        fields: &TimeEntryFields,
    ) -> Result<(), ReconcileError> {
        let task_id = self
            .resolve_parent(remote, fields.parent_source_id.as_deref())
            .await;
        let payload = time_payload(config, fields, task_id);

        info!(
            source_id = fields.source_id,
            ?task_id,
            value = payload.value,
            "creating remote time entry"
        );
        let entry = remote.create_time(&payload).await?;

        // The remote is authoritative about where the record ended up.
        self.links()
            .create_if_absent(NewLink::time_entry(
                &fields.source_id,
                entry.id,
                entry.parent_id,
                entry.parent_type,
            ))
            .await?;
        Ok(())
    }

    pub(crate) async fn time_updated(
        &self,
        remote: &dyn RemoteProject,
        config: &IntegrationConfig,
        fields: &TimeEntryFields,
    ) -> Result<(), ReconcileError> {
        let Some(link) = self.find_link(EntityKind::TimeEntry, &fields.source_id).await else {
            // Events may arrive for entries that predate the integration.
            return self.time_created(remote, config, fields).await;
        };

        let task_id = self
            .resolve_parent(remote, fields.parent_source_id.as_deref())
            .await;
        let payload = time_payload(config, fields, task_id);

        match remote.find_time(link.target_id).await {
            Ok(existing) => {
                // Relocation: the remote rejects field updates that
                // reference a stale parent, so the move goes first.
                if let Some(task_id) = task_id {
                    if existing.parent_id != task_id {
                        info!(
                            source_id = fields.source_id,
                            from = existing.parent_id,
                            to = task_id,
                            "moving remote time entry"
                        );
                        remote.move_time(existing.id, task_id).await?;
                    }
                }
                let updated = remote.update_time(existing.id, &payload).await?;
                self.links()
                    .update_target(
                        &link.id,
                        updated.id,
                        Some((updated.parent_id, updated.parent_type)),
                    )
                    .await?;
                Ok(())
            }
            Err(error) => {
                warn!(
                    %error,
                    source_id = fields.source_id,
                    target_id = link.target_id,
                    "linked time entry is gone, recreating"
                );
                let entry = remote.create_time(&payload).await?;
                self.links()
                    .update_target(&link.id, entry.id, Some((entry.parent_id, entry.parent_type)))
                    .await?;
                Ok(())
            }
        }
    }

    pub(crate) async fn time_deleted(
        &self,
        remote: &dyn RemoteProject,
        source_id: &str,
    ) -> Result<(), ReconcileError> {
        let Some(link) = self.find_link(EntityKind::TimeEntry, source_id).await else {
            return Ok(());
        };

        info!(source_id, target_id = link.target_id, "deleting remote time entry");
        best_effort("delete remote time entry", remote.delete_time(link.target_id)).await;
        best_effort("delete time link", self.links().delete(&link.id)).await;
        Ok(())
    }
}
