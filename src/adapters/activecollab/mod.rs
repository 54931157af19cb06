// ActiveCollab REST client. One client per integration, scoped to the
// configured account and project, authenticated with the
// `X-Angie-AuthApiToken` header. Responses wrap the entity in a
// `{ "single": … }` envelope.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::core::config::{ActiveCollabTarget, IntegrationConfig};
use crate::core::ports::{
    RemoteError, RemoteFactory, RemoteProject, RemoteTask, RemoteTimeEntry, TaskPayload,
    TimePayload,
};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Default)]
pub struct ActiveCollabFactory;

impl ActiveCollabFactory {
    pub fn new() -> Self {
        Self
    }
}

impl RemoteFactory for ActiveCollabFactory {
    fn connect(&self, config: &IntegrationConfig) -> Result<Arc<dyn RemoteProject>, RemoteError> {
        Ok(Arc::new(ActiveCollabProject::new(&config.activecollab)?))
    }
}

pub struct ActiveCollabProject {
    client: Client,
    /// `{base_url}/api/v1` — completion endpoints are account-scoped.
    account_url: String,
    /// `{base_url}/api/v1/projects/{project_id}` — everything else.
    project_url: String,
    /// ActiveCollab tokens are prefixed with the issuing user's id; created
    /// tasks are assigned to that user.
    assignee_id: Option<i64>,
}

impl ActiveCollabProject {
    pub fn new(target: &ActiveCollabTarget) -> Result<Self, RemoteError> {
        let mut headers = header::HeaderMap::new();
        let token = header::HeaderValue::from_str(&target.token)
            .map_err(|error| RemoteError::Transport(format!("invalid api token: {error}")))?;
        headers.insert("X-Angie-AuthApiToken", token);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|error| {
                RemoteError::Transport(format!("failed to build http client: {error}"))
            })?;

        let base = target.base_url.trim_end_matches('/');
        Ok(Self {
            client,
            account_url: format!("{base}/api/v1"),
            project_url: format!("{base}/api/v1/projects/{}", target.project_id),
            assignee_id: user_from_token(&target.token),
        })
    }

    async fn single<T: DeserializeOwned>(&self, response: Response) -> Result<T, RemoteError> {
        let envelope: Single<T> = check(response)
            .await?
            .json()
            .await
            .map_err(|error| RemoteError::Transport(error.to_string()))?;
        Ok(envelope.single)
    }
}

#[derive(Deserialize)]
struct Single<T> {
    single: T,
}

#[derive(Deserialize)]
struct TaskDto {
    id: i64,
    #[serde(default)]
    is_completed: bool,
}

#[derive(Deserialize)]
struct TimeDto {
    id: i64,
    parent_id: i64,
    parent_type: String,
}

impl From<TaskDto> for RemoteTask {
    fn from(dto: TaskDto) -> Self {
        Self {
            id: dto.id,
            is_completed: dto.is_completed,
        }
    }
}

impl From<TimeDto> for RemoteTimeEntry {
    fn from(dto: TimeDto) -> Self {
        Self {
            id: dto.id,
            parent_id: dto.parent_id,
            parent_type: dto.parent_type,
        }
    }
}

async fn check(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(RemoteError::NotFound);
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

fn transport(error: reqwest::Error) -> RemoteError {
    RemoteError::Transport(error.to_string())
}

/// The numeric prefix of an ActiveCollab token is the issuing user's id.
fn user_from_token(token: &str) -> Option<i64> {
    token.split('-').next()?.parse().ok()
}

#[async_trait]
impl RemoteProject for ActiveCollabProject {
    async fn find_task(&self, id: i64) -> Result<RemoteTask, RemoteError> {
        let response = self
            .client
            .get(format!("{}/tasks/{id}", self.project_url))
            .send()
            .await
            .map_err(transport)?;
        Ok(self.single::<TaskDto>(response).await?.into())
    }

    async fn create_task(&self, payload: &TaskPayload) -> Result<RemoteTask, RemoteError> {
        let response = self
            .client
            .post(format!("{}/tasks", self.project_url))
            .json(&json!({
                "name": payload.name,
                "body": payload.body,
                "subscribers": payload.subscribers,
                "assignee_id": self.assignee_id,
            }))
            .send()
            .await
            .map_err(transport)?;
        Ok(self.single::<TaskDto>(response).await?.into())
    }

    async fn update_task(&self, id: i64, payload: &TaskPayload) -> Result<RemoteTask, RemoteError> {
        let response = self
            .client
            .put(format!("{}/tasks/{id}", self.project_url))
            .json(&json!({
                "name": payload.name,
                "body": payload.body,
                "subscribers": payload.subscribers,
            }))
            .send()
            .await
            .map_err(transport)?;
        Ok(self.single::<TaskDto>(response).await?.into())
    }

    async fn delete_task(&self, id: i64) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(format!("{}/tasks/{id}", self.project_url))
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn complete_task(&self, id: i64) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(format!("{}/complete/task/{id}", self.account_url))
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn reopen_task(&self, id: i64) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(format!("{}/open/task/{id}", self.account_url))
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn find_time(&self, id: i64) -> Result<RemoteTimeEntry, RemoteError> {
        let response = self
            .client
            .get(format!("{}/time-records/{id}", self.project_url))
            .send()
            .await
            .map_err(transport)?;
        Ok(self.single::<TimeDto>(response).await?.into())
    }

    async fn create_time(&self, payload: &TimePayload) -> Result<RemoteTimeEntry, RemoteError> {
        let response = self
            .client
            .post(format!("{}/time-records", self.project_url))
            .json(&json!({
                "value": payload.value,
                "record_date": payload.record_date,
                "job_type_id": payload.job_type_id,
                "billable_status": payload.billable_status,
                "summary": payload.summary,
                "task_id": payload.task_id,
            }))
            .send()
            .await
            .map_err(transport)?;
        Ok(self.single::<TimeDto>(response).await?.into())
    }

    async fn update_time(
        &self,
        id: i64,
        payload: &TimePayload,
    ) -> Result<RemoteTimeEntry, RemoteError> {
        let response = self
            .client
            .put(format!("{}/time-records/{id}", self.project_url))
            .json(&json!({
                "value": payload.value,
                "record_date": payload.record_date,
                "job_type_id": payload.job_type_id,
                "billable_status": payload.billable_status,
                "summary": payload.summary,
                "task_id": payload.task_id,
            }))
            .send()
            .await
            .map_err(transport)?;
        Ok(self.single::<TimeDto>(response).await?.into())
    }

    async fn move_time(&self, id: i64, task_id: i64) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(format!("{}/time-records/{id}/move", self.project_url))
            .json(&json!({ "task_id": task_id }))
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn delete_time(&self, id: i64) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(format!("{}/time-records/{id}", self.project_url))
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }
}
