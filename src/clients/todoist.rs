//! Todoist REST v2 task tracker client

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::clients::http::ApiClient;
use crate::error::Result;
use crate::models::{Task, TaskCreate, TaskUpdate};

const TODOIST_BASE_URL: &str = "https://api.todoist.com";

/// Task tracker operations the reconcilers depend on
#[async_trait]
pub trait TaskTracker: Send + Sync {
    async fn create_task(&self, create: TaskCreate) -> Result<Task>;
    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>>;
    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<Task>;
}

/// Todoist-backed implementation of [`TaskTracker`]
pub struct TodoistClient {
    api: ApiClient,
}

impl TodoistClient {
    pub fn new(api_key: &str) -> Result<Self> {
        let api = ApiClient::with_bearer_token(TODOIST_BASE_URL, Some(api_key.to_string()))?;
        Ok(Self { api })
    }
}

#[async_trait]
impl TaskTracker for TodoistClient {
    async fn create_task(&self, create: TaskCreate) -> Result<Task> {
        let response: TaskResponse = self.api.post_json("/rest/v2/tasks", &create).await?;
        Ok(response.into())
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        let responses: Vec<TaskResponse> = self
            .api
            .get_json("/rest/v2/tasks", &[("project_id", project_id)])
            .await?;
        Ok(responses.into_iter().map(Task::from).collect())
    }

    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<Task> {
        let path = format!("/rest/v2/tasks/{}", task_id);
        let response: TaskResponse = self.api.post_json(&path, &update).await?;
        Ok(response.into())
    }
}

/// Task payload as the REST v2 API returns it; the due date arrives
/// nested under `due.date`
#[derive(Debug, Clone, Deserialize)]
struct TaskResponse {
    id: String,
    content: String,
    #[serde(default)]
    description: String,
    project_id: String,
    #[serde(default)]
    section_id: Option<String>,
    #[serde(default)]
    due: Option<DueResponse>,
}

#[derive(Debug, Clone, Deserialize)]
struct DueResponse {
    date: NaiveDate,
}

impl From<TaskResponse> for Task {
    fn from(response: TaskResponse) -> Self {
        Task {
            id: response.id,
            content: response.content,
            description: response.description,
            project_id: response.project_id,
            section_id: response.section_id,
            due_date: response.due.map(|due| due.date),
        }
    }
}
