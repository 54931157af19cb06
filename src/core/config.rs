// Integration configuration: how one source project maps onto one
// ActiveCollab project, plus the credentials and defaults needed to address
// that account. Looked up by (project id, author account id) before any
// reconciliation begins.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    pub id: String,
    /// Project identifier in the source system (Jira project, Clockify project).
    pub source_project_id: String,
    /// Account identifier of the webhook author, when the source vendor
    /// scopes integrations per user (Jira). None for Clockify.
    pub source_account_id: Option<String>,
    pub activecollab: ActiveCollabTarget,
    pub defaults: SyncDefaults,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCollabTarget {
    /// Account root, e.g. `https://app.activecollab.com/12345`.
    pub base_url: String,
    pub project_id: i64,
    pub token: String,
}

impl fmt::Debug for ActiveCollabTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ActiveCollabTarget")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Static defaults applied to entities created in the target system. These
/// come exclusively from configuration; the engine carries no inline codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncDefaults {
    pub job_type_id: i64,
    pub billable_status: i64,
    pub subscribers: Vec<i64>,
}
