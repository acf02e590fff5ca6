//! Non-scheduled episode reconciliation
//!
//! Sources without a release calendar are deduplicated against the seen
//! store instead of the tracker. Each unseen episode gets a task and a
//! chat announcement, then the store entry for that source is replaced
//! wholesale with the episodes from the current fetch.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::clients::{ChatNotifier, TaskTracker};
use crate::error::Result;
use crate::models::{NonScheduledEpisode, TaskCreate};
use crate::reconcile::{join_batch, RunMode};
use crate::store::SeenStore;

/// Reconcile non-scheduled episodes against the seen store and the task
/// tracker.
///
/// A backfill (`assume_new`) treats every episode as unseen but keeps
/// the chat quiet. Announcements for genuinely new episodes are only
/// sent after their task has been created.
pub async fn reconcile_non_scheduled(
    tracker: &dyn TaskTracker,
    notifier: &dyn ChatNotifier,
    store: &dyn SeenStore,
    episodes: &[NonScheduledEpisode],
    mode: RunMode,
    today: NaiveDate,
) -> Result<()> {
    let mut source_names: Vec<&str> = episodes
        .iter()
        .map(|episode| episode.source.name())
        .collect();
    source_names.sort_unstable();
    source_names.dedup();

    let seen = load_seen_keys(store, &source_names).await?;

    let mut new_sources: HashSet<&str> = HashSet::new();
    let mut writes = Vec::new();
    for episode in episodes {
        if !mode.assume_new && seen.contains(&episode.natural_key()) {
            continue;
        }
        let content = episode.task_content();
        info!("Creating task and notification for {:?}", content);
        new_sources.insert(episode.source.name());

        let create = TaskCreate {
            content: content.clone(),
            description: String::new(),
            project_id: episode.source.project_id().to_string(),
            section_id: episode.source.section_id().map(String::from),
            due_date: today,
        };
        let announcement = (!mode.assume_new).then(|| format!("New episode: {}", content));
        if !mode.dry_run {
            writes.push(create_and_notify(tracker, notifier, create, announcement));
        }
    }
    join_batch(writes).await?;

    if new_sources.is_empty() {
        info!("No new non scheduled episodes");
        return Ok(());
    }

    // The store keeps one snapshot per source, replaced with the full
    // fetch result rather than merged with what it held before.
    let mut snapshots: Vec<(&str, Vec<String>)> = Vec::new();
    for episode in episodes {
        let name = episode.source.name();
        match snapshots.iter_mut().find(|(snapshot_name, _)| *snapshot_name == name) {
            Some((_, chapter_ids)) => chapter_ids.push(episode.chapter_id.clone()),
            None => snapshots.push((name, vec![episode.chapter_id.clone()])),
        }
    }

    let mut puts = Vec::new();
    for (name, chapter_ids) in snapshots {
        if !new_sources.contains(name) {
            debug!("Skipping {:?} because it has no new episodes", name);
            continue;
        }
        info!("Updating stored episodes for {:?}", name);
        if !mode.dry_run {
            puts.push(store.put_records(name, chapter_ids));
        }
    }
    join_batch(puts).await?;
    Ok(())
}

/// Load the persisted chapter ids of every source and flatten them into
/// natural keys for membership checks
async fn load_seen_keys(store: &dyn SeenStore, source_names: &[&str]) -> Result<HashSet<String>> {
    let lookups = source_names.iter().map(|name| store.get_records(name));
    let record_lists = join_batch(lookups).await?;

    let mut seen = HashSet::new();
    for (name, chapter_ids) in source_names.iter().zip(record_lists) {
        for chapter_id in chapter_ids {
            seen.insert(format!("{} {}", name, chapter_id));
        }
    }
    Ok(seen)
}

/// Create the tracker task, then announce it in chat once the create has
/// gone through
async fn create_and_notify(
    tracker: &dyn TaskTracker,
    notifier: &dyn ChatNotifier,
    create: TaskCreate,
    announcement: Option<String>,
) -> Result<()> {
    tracker.create_task(create).await?;
    if let Some(text) = announcement {
        notifier.send_message(&text).await?;
    }
    Ok(())
}
