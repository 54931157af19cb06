use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::config::IntegrationConfig;
use crate::core::ports::{IntegrationStore, StoreError};

#[derive(Default)]
pub struct InMemoryIntegrationStore {
    configs: Mutex<Vec<IntegrationConfig>>,
    offline: AtomicBool,
}

impl InMemoryIntegrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configs(configs: Vec<IntegrationConfig>) -> Self {
        Self {
            configs: Mutex::new(configs),
            offline: AtomicBool::new(false),
        }
    }

    pub async fn insert(&self, config: IntegrationConfig) {
        self.configs.lock().await.push(config);
    }

    pub fn set_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl IntegrationStore for InMemoryIntegrationStore {
    async fn find(
        &self,
        project_id: &str,
        author_account_id: Option<&str>,
    ) -> Result<Option<IntegrationConfig>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("integration store offline".into()));
        }
        Ok(self
            .configs
            .lock()
            .await
            .iter()
            .find(|c| {
                c.source_project_id == project_id
                    && match &c.source_account_id {
                        // Account-scoped integrations (Jira) require a match;
                        // project-scoped ones (Clockify) ignore the author.
                        Some(account) => author_account_id == Some(account.as_str()),
                        None => true,
                    }
            })
            .cloned())
    }
}
