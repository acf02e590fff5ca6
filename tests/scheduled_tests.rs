//! Integration tests for the scheduled reconciliation pass
//!
//! Drives `reconcile_scheduled` against a recording tracker double and
//! checks which tasks get created, which get patched and which are left
//! alone.

mod helpers;

use chrono::NaiveDate;
use episode_tracker::models::{Patch, ScheduledEpisode, Task, TaskCreate, TaskUpdate};
use episode_tracker::reconcile::{reconcile_scheduled, RunMode};

use helpers::{day, scheduled_episode, task, tvdb_source, FlakyTracker, RecordingTracker};

fn today() -> NaiveDate {
    day(2018, 1, 1)
}

/// Two sources with upcoming episodes, one source whose episode already
/// aired, and one episode without a date at all
fn episodes() -> Vec<ScheduledEpisode> {
    let source_0 = tvdb_source("Source 0", "project-0", None);
    let source_1 = tvdb_source("Source 1", "project-1", Some("section-1"));
    let source_2 = tvdb_source("Source 2", "project-2", None);
    vec![
        scheduled_episode(&source_1, "1", Some(day(2019, 1, 1)), "nginx"),
        scheduled_episode(&source_1, "2", Some(day(2019, 1, 7)), "nginx"),
        scheduled_episode(&source_2, "3x01", Some(day(2019, 1, 1)), "nginx"),
        scheduled_episode(&source_0, "0x01", Some(day(2017, 6, 1)), "nginx"),
        scheduled_episode(&source_2, "special", None, "nginx"),
    ]
}

/// task-1 matches its episode exactly, task-2 is stale on every patched
/// field, task-3 belongs to nothing we track
fn existing_tasks() -> Vec<Task> {
    vec![
        task(
            "task-1",
            "Source 1 1",
            "Released: 2019-01-01 on nginx",
            "project-1",
            Some("section-1"),
            Some(day(2019, 1, 1)),
        ),
        task(
            "task-2",
            "Source 1 2",
            "Released: 2019-01-01 on nginx",
            "project-1",
            None,
            Some(day(2019, 1, 1)),
        ),
        task("task-3", "Unrelated task", "", "project-1", None, None),
    ]
}

#[tokio::test]
async fn test_creates_missing_and_patches_stale_tasks() {
    let tracker = RecordingTracker::new(existing_tasks());
    let mode = RunMode {
        assume_new: false,
        dry_run: false,
    };

    reconcile_scheduled(&tracker, &episodes(), mode, today())
        .await
        .unwrap();

    // Past and undated episodes are dropped, so only two projects get listed
    assert_eq!(tracker.listed_project_ids(), vec!["project-1", "project-2"]);

    assert_eq!(
        tracker.created_tasks(),
        vec![TaskCreate {
            content: "Source 2 3x01".to_string(),
            description: "Released: 2019-01-01 on nginx".to_string(),
            project_id: "project-2".to_string(),
            section_id: None,
            due_date: day(2019, 1, 1),
        }]
    );

    assert_eq!(
        tracker.updated_tasks(),
        vec![(
            "task-2".to_string(),
            TaskUpdate {
                description: Patch::Set("Released: 2019-01-07 on nginx".to_string()),
                due_date: Patch::Set(day(2019, 1, 7)),
                section_id: Patch::Set(Some("section-1".to_string())),
            },
        )]
    );
}

#[tokio::test]
async fn test_assume_new_keeps_already_aired_episodes() {
    let tracker = RecordingTracker::new(existing_tasks());
    let mode = RunMode {
        assume_new: true,
        dry_run: false,
    };

    reconcile_scheduled(&tracker, &episodes(), mode, today())
        .await
        .unwrap();

    assert_eq!(
        tracker.listed_project_ids(),
        vec!["project-0", "project-1", "project-2"]
    );

    let created = tracker.created_tasks();
    assert_eq!(created.len(), 2);
    assert!(created.iter().any(|create| create.content == "Source 2 3x01"));
    assert!(created
        .iter()
        .any(|create| create.content == "Source 0 0x01" && create.due_date == day(2017, 6, 1)));

    // The stale task is patched the same way as in a normal run
    assert_eq!(tracker.updated_tasks().len(), 1);
}

#[tokio::test]
async fn test_dry_run_issues_no_writes() {
    for assume_new in [false, true] {
        let tracker = RecordingTracker::new(existing_tasks());
        let mode = RunMode {
            assume_new,
            dry_run: true,
        };

        reconcile_scheduled(&tracker, &episodes(), mode, today())
            .await
            .unwrap();

        assert!(!tracker.listed_project_ids().is_empty());
        assert!(tracker.created_tasks().is_empty());
        assert!(tracker.updated_tasks().is_empty());
    }
}

#[tokio::test]
async fn test_matching_tasks_produce_no_calls() {
    let tasks = vec![
        task(
            "task-1",
            "Source 1 1",
            "Released: 2019-01-01 on nginx",
            "project-1",
            Some("section-1"),
            Some(day(2019, 1, 1)),
        ),
        task(
            "task-2",
            "Source 1 2",
            "Released: 2019-01-07 on nginx",
            "project-1",
            Some("section-1"),
            Some(day(2019, 1, 7)),
        ),
        task(
            "task-4",
            "Source 2 3x01",
            "Released: 2019-01-01 on nginx",
            "project-2",
            None,
            Some(day(2019, 1, 1)),
        ),
    ];
    let tracker = RecordingTracker::new(tasks);

    reconcile_scheduled(&tracker, &episodes(), RunMode::default(), today())
        .await
        .unwrap();

    assert!(tracker.created_tasks().is_empty());
    assert!(tracker.updated_tasks().is_empty());
}

#[tokio::test]
async fn test_patch_skips_fields_that_already_match() {
    let source = tvdb_source("S2", "project-2", Some("section-1"));
    let episodes = vec![scheduled_episode(
        &source,
        "3x01",
        Some(day(2019, 1, 7)),
        "nginx",
    )];
    let tasks = vec![task(
        "task-2",
        "S2 3x01",
        "Released: 2019-01-07 on nginx",
        "project-2",
        None,
        Some(day(2019, 1, 1)),
    )];
    let tracker = RecordingTracker::new(tasks);

    reconcile_scheduled(&tracker, &episodes, RunMode::default(), today())
        .await
        .unwrap();

    // Description already matches, so the patch only carries the date
    // and the section
    assert_eq!(
        tracker.updated_tasks(),
        vec![(
            "task-2".to_string(),
            TaskUpdate {
                description: Patch::Keep,
                due_date: Patch::Set(day(2019, 1, 7)),
                section_id: Patch::Set(Some("section-1".to_string())),
            },
        )]
    );
    assert!(tracker.created_tasks().is_empty());
}

#[tokio::test]
async fn test_same_day_release_is_not_upcoming() {
    let source = tvdb_source("Source 1", "project-1", None);
    let episodes = vec![
        scheduled_episode(&source, "today", Some(today()), "nginx"),
        scheduled_episode(&source, "tomorrow", Some(day(2018, 1, 2)), "nginx"),
    ];
    let tracker = RecordingTracker::new(Vec::new());

    reconcile_scheduled(&tracker, &episodes, RunMode::default(), today())
        .await
        .unwrap();

    let created = tracker.created_tasks();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].content, "Source 1 tomorrow");
}

#[tokio::test]
async fn test_create_failure_does_not_cancel_sibling_creates() {
    let source = tvdb_source("Source 1", "project-1", None);
    let episodes = vec![
        scheduled_episode(&source, "1", Some(day(2019, 1, 1)), "nginx"),
        scheduled_episode(&source, "2", Some(day(2019, 1, 7)), "nginx"),
    ];
    let tracker = FlakyTracker::failing_on("Source 1 1");

    let result = reconcile_scheduled(&tracker, &episodes, RunMode::default(), today()).await;

    // The failed create aborts the pass, but the sibling already in
    // flight still runs to completion
    assert!(result.is_err());
    assert_eq!(tracker.created_contents(), vec!["Source 1 2"]);
}

#[tokio::test]
async fn test_undated_episodes_are_skipped_even_when_assumed_new() {
    let source = tvdb_source("Source 1", "project-1", None);
    let episodes = vec![scheduled_episode(&source, "special", None, "nginx")];
    let tracker = RecordingTracker::new(Vec::new());
    let mode = RunMode {
        assume_new: true,
        dry_run: false,
    };

    reconcile_scheduled(&tracker, &episodes, mode, today())
        .await
        .unwrap();

    assert!(tracker.listed_project_ids().is_empty());
    assert!(tracker.created_tasks().is_empty());
}
