// Fake remote project: behaves like one ActiveCollab project and records
// every call it receives, so engine tests can assert call ordering.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::config::IntegrationConfig;
use crate::core::ports::{
    RemoteError, RemoteFactory, RemoteProject, RemoteTask, RemoteTimeEntry, TaskPayload,
    TimePayload,
};

pub struct InMemoryRemoteProject {
    project_id: i64,
    next_id: AtomicI64,
    tasks: Mutex<HashMap<i64, RemoteTask>>,
    times: Mutex<HashMap<i64, RemoteTimeEntry>>,
    task_writes: Mutex<Vec<TaskPayload>>,
    time_writes: Mutex<Vec<TimePayload>>,
    calls: Mutex<Vec<String>>,
    offline: AtomicBool,
}

impl InMemoryRemoteProject {
    pub fn new(project_id: i64) -> Self {
        Self {
            project_id,
            next_id: AtomicI64::new(100),
            tasks: Mutex::new(HashMap::new()),
            times: Mutex::new(HashMap::new()),
            task_writes: Mutex::new(Vec::new()),
            time_writes: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn task_exists(&self, id: i64) -> bool {
        self.tasks.lock().await.contains_key(&id)
    }

    pub async fn time_exists(&self, id: i64) -> bool {
        self.times.lock().await.contains_key(&id)
    }

    pub async fn remove_task(&self, id: i64) {
        self.tasks.lock().await.remove(&id);
    }

    pub async fn remove_time(&self, id: i64) {
        self.times.lock().await.remove(&id);
    }

    pub async fn last_task_payload(&self) -> Option<TaskPayload> {
        self.task_writes.lock().await.last().cloned()
    }

    pub async fn last_time_payload(&self) -> Option<TimePayload> {
        self.time_writes.lock().await.last().cloned()
    }

    async fn record(&self, call: impl Into<String>) {
        self.calls.lock().await.push(call.into());
    }

    fn guard(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport("remote offline".into()));
        }
        Ok(())
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteProject for InMemoryRemoteProject {
    async fn find_task(&self, id: i64) -> Result<RemoteTask, RemoteError> {
        self.record(format!("find_task({id})")).await;
        self.guard()?;
        self.tasks
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn create_task(&self, payload: &TaskPayload) -> Result<RemoteTask, RemoteError> {
        self.record("create_task").await;
        self.guard()?;
        self.task_writes.lock().await.push(payload.clone());
        let task = RemoteTask {
            id: self.allocate_id(),
            is_completed: false,
        };
        self.tasks.lock().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: i64, payload: &TaskPayload) -> Result<RemoteTask, RemoteError> {
        self.record(format!("update_task({id})")).await;
        self.guard()?;
        self.task_writes.lock().await.push(payload.clone());
        self.tasks
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn delete_task(&self, id: i64) -> Result<(), RemoteError> {
        self.record(format!("delete_task({id})")).await;
        self.guard()?;
        self.tasks
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RemoteError::NotFound)
    }

    async fn complete_task(&self, id: i64) -> Result<(), RemoteError> {
        self.record(format!("complete_task({id})")).await;
        self.guard()?;
        let mut tasks = self.tasks.lock().await;
        let task = tasks.get_mut(&id).ok_or(RemoteError::NotFound)?;
        task.is_completed = true;
        Ok(())
    }

    async fn reopen_task(&self, id: i64) -> Result<(), RemoteError> {
        self.record(format!("reopen_task({id})")).await;
        self.guard()?;
        let mut tasks = self.tasks.lock().await;
        let task = tasks.get_mut(&id).ok_or(RemoteError::NotFound)?;
        task.is_completed = false;
        Ok(())
    }

    async fn find_time(&self, id: i64) -> Result<RemoteTimeEntry, RemoteError> {
        self.record(format!("find_time({id})")).await;
        self.guard()?;
        self.times
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn create_time(&self, payload: &TimePayload) -> Result<RemoteTimeEntry, RemoteError> {
        self.record("create_time").await;
        self.guard()?;
        self.time_writes.lock().await.push(payload.clone());
        // The remote decides the actual parent: the named task, or the
        // project itself when none is named.
        let entry = match payload.task_id {
            Some(task_id) => RemoteTimeEntry {
                id: self.allocate_id(),
                parent_id: task_id,
                parent_type: "Task".into(),
            },
            None => RemoteTimeEntry {
                id: self.allocate_id(),
                parent_id: self.project_id,
                parent_type: "Project".into(),
            },
        };
        self.times.lock().await.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update_time(
        &self,
        id: i64,
        payload: &TimePayload,
    ) -> Result<RemoteTimeEntry, RemoteError> {
        self.record(format!("update_time({id})")).await;
        self.guard()?;
        self.time_writes.lock().await.push(payload.clone());
        self.times
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn move_time(&self, id: i64, task_id: i64) -> Result<(), RemoteError> {
        self.record(format!("move_time({id}->{task_id})")).await;
        self.guard()?;
        let mut times = self.times.lock().await;
        let entry = times.get_mut(&id).ok_or(RemoteError::NotFound)?;
        entry.parent_id = task_id;
        entry.parent_type = "Task".into();
        Ok(())
    }

    async fn delete_time(&self, id: i64) -> Result<(), RemoteError> {
        self.record(format!("delete_time({id})")).await;
        self.guard()?;
        self.times
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RemoteError::NotFound)
    }
}

/// Hands out the same fake project regardless of configuration.
pub struct InMemoryRemoteFactory {
    project: Arc<InMemoryRemoteProject>,
}

impl InMemoryRemoteFactory {
    pub fn new(project: Arc<InMemoryRemoteProject>) -> Self {
        Self { project }
    }
}

impl RemoteFactory for InMemoryRemoteFactory {
    fn connect(&self, _config: &IntegrationConfig) -> Result<Arc<dyn RemoteProject>, RemoteError> {
        Ok(self.project.clone())
    }
}
