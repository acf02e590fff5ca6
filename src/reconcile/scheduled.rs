//! Scheduled episode reconciliation
//!
//! Every upcoming episode gets exactly one tracker task, matched by task
//! content. Existing tasks are patched sparsely: only the fields that
//! actually differ are sent, and an unchanged task produces no call at
//! all.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::clients::TaskTracker;
use crate::error::Result;
use crate::models::{Patch, ScheduledEpisode, Task, TaskCreate, TaskUpdate};
use crate::reconcile::{join_batch, RunMode};

/// Reconcile scheduled episodes against the task tracker.
///
/// Normally only episodes releasing strictly after `today` matter; a
/// same-day release is not upcoming. A backfill (`assume_new`) keeps
/// every episode that has a date at all. No chat notification is ever
/// sent from this pass.
pub async fn reconcile_scheduled(
    tracker: &dyn TaskTracker,
    episodes: &[ScheduledEpisode],
    mode: RunMode,
    today: NaiveDate,
) -> Result<()> {
    let upcoming: Vec<&ScheduledEpisode> = episodes
        .iter()
        .filter(|episode| match episode.released_date {
            Some(date) => mode.assume_new || date > today,
            None => false,
        })
        .collect();

    let tasks = list_project_tasks(tracker, &upcoming).await?;
    let task_map: HashMap<&str, &Task> = tasks.iter().map(|t| (t.content.as_str(), t)).collect();

    let mut content_keys = HashSet::new();
    let mut writes = Vec::new();
    for episode in upcoming {
        let Some(released) = episode.released_date else {
            continue;
        };
        let content = episode.task_content();
        let description = format!("Released: {} on {}", released, episode.platform);
        let first_seen = content_keys.insert(content.clone());
        debug_assert!(first_seen, "duplicate task content: {}", content);

        let Some(task) = task_map.get(content.as_str()) else {
            info!("Creating task for {:?}", content);
            let create = TaskCreate {
                content,
                description,
                project_id: episode.source.project_id().to_string(),
                section_id: episode.source.section_id().map(String::from),
                due_date: released,
            };
            if !mode.dry_run {
                writes.push(tracker.create_task(create));
            }
            continue;
        };

        let mut patch = TaskUpdate::default();
        if task.description != description {
            patch.description = Patch::Set(description);
        }
        if task.due_date.map_or(true, |due| due != released) {
            patch.due_date = Patch::Set(released);
        }
        if task.section_id.as_deref() != episode.source.section_id() {
            patch.section_id = Patch::Set(episode.source.section_id().map(String::from));
        }

        if !patch.is_empty() {
            info!("Updating task for {:?} with params {:?}", content, patch);
            if !mode.dry_run {
                writes.push(tracker.update_task(&task.id, patch));
            }
        }
    }

    join_batch(writes).await?;
    Ok(())
}

/// Fetch the existing tasks of every project referenced by the filtered
/// episodes, one concurrent listing per distinct project
async fn list_project_tasks(
    tracker: &dyn TaskTracker,
    episodes: &[&ScheduledEpisode],
) -> Result<Vec<Task>> {
    let mut project_ids: Vec<&str> = episodes
        .iter()
        .map(|episode| episode.source.project_id())
        .collect();
    project_ids.sort_unstable();
    project_ids.dedup();

    let lookups = project_ids.into_iter().map(|id| tracker.list_tasks(id));
    let nested = join_batch(lookups).await?;
    Ok(nested.into_iter().flatten().collect())
}
