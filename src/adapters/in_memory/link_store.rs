use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::link::{EntityKind, LinkRecord, NewLink};
use crate::core::ports::{LinkStore, StoreError};

#[derive(Default)]
pub struct InMemoryLinkStore {
    records: Mutex<Vec<LinkRecord>>,
    offline: AtomicBool,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<LinkRecord> {
        self.records.lock().await.clone()
    }

    pub async fn find_link(&self, kind: EntityKind, source_id: &str) -> Option<LinkRecord> {
        self.records
            .lock()
            .await
            .iter()
            .find(|r| r.entity_kind == kind && r.source_id == source_id)
            .cloned()
    }

    fn guard(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("link store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn find_by_source(
        &self,
        kind: EntityKind,
        source_id: &str,
    ) -> Result<Option<LinkRecord>, StoreError> {
        self.guard()?;
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|r| r.entity_kind == kind && r.source_id == source_id)
            .cloned())
    }

    async fn create_if_absent(&self, link: NewLink) -> Result<LinkRecord, StoreError> {
        self.guard()?;
        // Check-and-insert under one guard: concurrent creates for the same
        // source entity converge on the first record.
        let mut records = self.records.lock().await;
        if let Some(existing) = records
            .iter()
            .find(|r| r.entity_kind == link.entity_kind && r.source_id == link.source_id)
        {
            return Ok(existing.clone());
        }
        let record = LinkRecord {
            id: Uuid::now_v7().to_string(),
            entity_kind: link.entity_kind,
            source_id: link.source_id,
            target_id: link.target_id,
            target_parent_id: link.target_parent_id,
            target_parent_type: link.target_parent_type,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn update_target(
        &self,
        record_id: &str,
        target_id: i64,
        parent: Option<(i64, String)>,
    ) -> Result<(), StoreError> {
        self.guard()?;
        let mut records = self.records.lock().await;
        // Tolerates a concurrently removed record.
        if let Some(record) = records.iter_mut().find(|r| r.id == record_id) {
            record.target_id = target_id;
            if let Some((parent_id, parent_type)) = parent {
                record.target_parent_id = Some(parent_id);
                record.target_parent_type = Some(parent_type);
            }
        }
        Ok(())
    }

    async fn delete(&self, record_id: &str) -> Result<(), StoreError> {
        self.guard()?;
        self.records.lock().await.retain(|r| r.id != record_id);
        Ok(())
    }
}
