//! Episode records produced by the providers
//!
//! Every provider returns the full list of episodes it can currently see,
//! not a delta. The orchestrator partitions the combined list by kind and
//! hands each partition to its reconciler.

use chrono::NaiveDate;

use crate::models::source::Source;

/// Episode of a scheduled source: carries a release date (when announced)
/// and the platform it airs on, never a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEpisode {
    pub source: Source,
    pub chapter_id: String,
    /// Release date, absent while the episode is listed but unscheduled
    pub released_date: Option<NaiveDate>,
    pub platform: String,
}

/// Episode of a non-scheduled source: released the moment it is observed,
/// identified by a direct URL.
#[derive(Debug, Clone, PartialEq)]
pub struct NonScheduledEpisode {
    pub source: Source,
    pub chapter_id: String,
    pub chapter_url: String,
}

/// One episode observation, tagged by reconciliation kind
#[derive(Debug, Clone, PartialEq)]
pub enum Episode {
    Scheduled(ScheduledEpisode),
    NonScheduled(NonScheduledEpisode),
}

impl Episode {
    pub fn source(&self) -> &Source {
        match self {
            Episode::Scheduled(ep) => &ep.source,
            Episode::NonScheduled(ep) => &ep.source,
        }
    }

    pub fn chapter_id(&self) -> &str {
        match self {
            Episode::Scheduled(ep) => &ep.chapter_id,
            Episode::NonScheduled(ep) => &ep.chapter_id,
        }
    }
}

impl ScheduledEpisode {
    /// Task content for this episode, also its identity among tracker tasks
    pub fn task_content(&self) -> String {
        format!("{} {}", self.source.name(), self.chapter_id)
    }
}

impl NonScheduledEpisode {
    /// Natural key matching this episode to its persisted record
    pub fn natural_key(&self) -> String {
        format!("{} {}", self.source.name(), self.chapter_id)
    }

    /// Task content linking straight to the chapter
    pub fn task_content(&self) -> String {
        format!("[{}]({})", self.natural_key(), self.chapter_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::source::{SourceBindings, TheTvDbInputs};

    fn sherlock() -> Source {
        Source::TheTvDb(TheTvDbInputs {
            bindings: SourceBindings {
                source_name: "Sherlock".to_string(),
                source_encoded_name: "sherlock".to_string(),
                todoist_project_id: "project-1".to_string(),
                todoist_section_id: None,
            },
        })
    }

    #[test]
    fn natural_key_joins_source_name_and_chapter_id() {
        let episode = NonScheduledEpisode {
            source: sherlock(),
            chapter_id: "42".to_string(),
            chapter_url: "https://example.com/42".to_string(),
        };
        assert_eq!(episode.natural_key(), "Sherlock 42");
    }

    #[test]
    fn scheduled_task_content() {
        let episode = ScheduledEpisode {
            source: sherlock(),
            chapter_id: "4x03".to_string(),
            released_date: NaiveDate::from_ymd_opt(2017, 1, 15),
            platform: "BBC One".to_string(),
        };
        assert_eq!(episode.task_content(), "Sherlock 4x03");
    }

    #[test]
    fn non_scheduled_task_content_is_a_link() {
        let episode = NonScheduledEpisode {
            source: sherlock(),
            chapter_id: "42".to_string(),
            chapter_url: "https://example.com/42".to_string(),
        };
        assert_eq!(
            episode.task_content(),
            "[Sherlock 42](https://example.com/42)"
        );
    }
}
