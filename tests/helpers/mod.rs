//! Test helper utilities
//!
//! Recording doubles for the task tracker, chat notifier and seen store,
//! plus builders for sources, episodes and tasks shared by the
//! integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use episode_tracker::clients::{ChatNotifier, TaskTracker};
use episode_tracker::error::{Error, Result};
use episode_tracker::models::source::{
    InMangaInputs, SourceBindings, SpyXFamilyInputs, TheTvDbInputs,
};
use episode_tracker::models::{
    NonScheduledEpisode, ScheduledEpisode, Source, Task, TaskCreate, TaskUpdate,
};
use episode_tracker::store::SeenStore;

/// Tracker double that records every call and serves a canned task list
/// for any project
pub struct RecordingTracker {
    tasks: Vec<Task>,
    pub listed_projects: Mutex<Vec<String>>,
    pub created: Mutex<Vec<TaskCreate>>,
    pub updated: Mutex<Vec<(String, TaskUpdate)>>,
}

impl RecordingTracker {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            listed_projects: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
        }
    }

    pub fn created_tasks(&self) -> Vec<TaskCreate> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated_tasks(&self) -> Vec<(String, TaskUpdate)> {
        self.updated.lock().unwrap().clone()
    }

    pub fn listed_project_ids(&self) -> Vec<String> {
        let mut ids = self.listed_projects.lock().unwrap().clone();
        ids.sort();
        ids
    }
}

#[async_trait]
impl TaskTracker for RecordingTracker {
    async fn create_task(&self, create: TaskCreate) -> Result<Task> {
        let mut created = self.created.lock().unwrap();
        created.push(create.clone());
        Ok(Task {
            id: format!("created-{}", created.len()),
            content: create.content,
            description: create.description,
            project_id: create.project_id,
            section_id: create.section_id,
            due_date: Some(create.due_date),
        })
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        self.listed_projects
            .lock()
            .unwrap()
            .push(project_id.to_string());
        Ok(self.tasks.clone())
    }

    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<Task> {
        self.updated
            .lock()
            .unwrap()
            .push((task_id.to_string(), update));
        let patched = self
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .cloned()
            .unwrap_or_else(|| Task {
                id: task_id.to_string(),
                content: String::new(),
                description: String::new(),
                project_id: String::new(),
                section_id: None,
                due_date: None,
            });
        Ok(patched)
    }
}

/// Tracker double whose write calls always fail with a remote error
pub struct FailingTracker;

#[async_trait]
impl TaskTracker for FailingTracker {
    async fn create_task(&self, _create: TaskCreate) -> Result<Task> {
        Err(remote_error())
    }

    async fn list_tasks(&self, _project_id: &str) -> Result<Vec<Task>> {
        Ok(Vec::new())
    }

    async fn update_task(&self, _task_id: &str, _update: TaskUpdate) -> Result<Task> {
        Err(remote_error())
    }
}

/// Tracker double that rejects one specific create immediately and
/// yields once before recording any other, so sibling calls are still
/// pending at the moment the failure lands
pub struct FlakyTracker {
    fail_content: String,
    pub created: Mutex<Vec<String>>,
}

impl FlakyTracker {
    pub fn failing_on(content: &str) -> Self {
        Self {
            fail_content: content.to_string(),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn created_contents(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskTracker for FlakyTracker {
    async fn create_task(&self, create: TaskCreate) -> Result<Task> {
        if create.content == self.fail_content {
            return Err(remote_error());
        }
        tokio::task::yield_now().await;
        let mut created = self.created.lock().unwrap();
        created.push(create.content.clone());
        Ok(Task {
            id: format!("created-{}", created.len()),
            content: create.content,
            description: create.description,
            project_id: create.project_id,
            section_id: create.section_id,
            due_date: Some(create.due_date),
        })
    }

    async fn list_tasks(&self, _project_id: &str) -> Result<Vec<Task>> {
        Ok(Vec::new())
    }

    async fn update_task(&self, task_id: &str, _update: TaskUpdate) -> Result<Task> {
        Ok(Task {
            id: task_id.to_string(),
            content: String::new(),
            description: String::new(),
            project_id: String::new(),
            section_id: None,
            due_date: None,
        })
    }
}

fn remote_error() -> Error {
    Error::Request {
        url: "https://api.todoist.com/rest/v2/tasks".to_string(),
        status: 403,
        body: "Forbidden".to_string(),
    }
}

/// Notifier double that records sent messages
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatNotifier for RecordingNotifier {
    async fn send_message(&self, text: &str) -> Result<()> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// In-memory seen store that records every replacement
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<String>>>,
    pub puts: Mutex<Vec<(String, Vec<String>)>>,
}

impl MemoryStore {
    pub fn new(seeded: &[(&str, &[&str])]) -> Self {
        let records = seeded
            .iter()
            .map(|(name, ids)| {
                let ids = ids.iter().map(|id| id.to_string()).collect();
                (name.to_string(), ids)
            })
            .collect();
        Self {
            records: Mutex::new(records),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn put_calls(&self) -> Vec<(String, Vec<String>)> {
        self.puts.lock().unwrap().clone()
    }

    pub fn stored(&self, source_name: &str) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .get(source_name)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl SeenStore for MemoryStore {
    async fn get_records(&self, source_name: &str) -> Result<Vec<String>> {
        Ok(self.stored(source_name))
    }

    async fn put_records(&self, source_name: &str, chapter_ids: Vec<String>) -> Result<()> {
        self.puts
            .lock()
            .unwrap()
            .push((source_name.to_string(), chapter_ids.clone()));
        self.records
            .lock()
            .unwrap()
            .insert(source_name.to_string(), chapter_ids);
        Ok(())
    }
}

pub fn tvdb_source(name: &str, project_id: &str, section_id: Option<&str>) -> Source {
    Source::TheTvDb(TheTvDbInputs {
        bindings: bindings(name, project_id, section_id),
    })
}

pub fn inmanga_source(name: &str, project_id: &str, section_id: Option<&str>) -> Source {
    Source::InManga(InMangaInputs {
        bindings: bindings(name, project_id, section_id),
        first_chapter_id: Uuid::nil(),
    })
}

pub fn spyxfamily_source(project_id: &str, section_id: Option<&str>) -> Source {
    Source::SpyXFamily(SpyXFamilyInputs {
        todoist_project_id: project_id.to_string(),
        todoist_section_id: section_id.map(String::from),
    })
}

fn bindings(name: &str, project_id: &str, section_id: Option<&str>) -> SourceBindings {
    SourceBindings {
        source_name: name.to_string(),
        source_encoded_name: name.to_lowercase().replace(' ', "-"),
        todoist_project_id: project_id.to_string(),
        todoist_section_id: section_id.map(String::from),
    }
}

pub fn scheduled_episode(
    source: &Source,
    chapter_id: &str,
    released_date: Option<NaiveDate>,
    platform: &str,
) -> ScheduledEpisode {
    ScheduledEpisode {
        source: source.clone(),
        chapter_id: chapter_id.to_string(),
        released_date,
        platform: platform.to_string(),
    }
}

pub fn non_scheduled_episode(source: &Source, chapter_id: &str, chapter_url: &str) -> NonScheduledEpisode {
    NonScheduledEpisode {
        source: source.clone(),
        chapter_id: chapter_id.to_string(),
        chapter_url: chapter_url.to_string(),
    }
}

pub fn task(
    id: &str,
    content: &str,
    description: &str,
    project_id: &str,
    section_id: Option<&str>,
    due_date: Option<NaiveDate>,
) -> Task {
    Task {
        id: id.to_string(),
        content: content.to_string(),
        description: description.to_string(),
        project_id: project_id.to_string(),
        section_id: section_id.map(String::from),
        due_date,
    }
}

pub fn day(year: i32, month: u32, dayofmonth: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dayofmonth).unwrap()
}
