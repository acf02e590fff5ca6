//! Configured content sources and their provider-specific inputs
//!
//! The source catalog is a JSON array of `{"provider": ..., "inputs": {...}}`
//! objects (see [`crate::config::load_sources`]). Each provider validates its
//! own input shape at deserialization time, so a catalog entry with an unknown
//! provider or malformed inputs is rejected before any network work starts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed display name for the webcomic source; it tracks a single title,
/// so the catalog may not rename it.
pub const SPYXFAMILY_SOURCE_NAME: &str = "SpyXFamily";

/// Input fields shared by every provider: how the source is named and where
/// its tracker tasks go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBindings {
    /// Human-readable source name, used in task content and as the
    /// persisted-state key
    pub source_name: String,
    /// Name as it appears in the provider's URLs
    pub source_encoded_name: String,
    /// Tracker project receiving this source's tasks
    pub todoist_project_id: String,
    /// Optional tracker section within the project
    #[serde(default)]
    pub todoist_section_id: Option<String>,
}

/// Inputs for the manga-reading site provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMangaInputs {
    #[serde(flatten)]
    pub bindings: SourceBindings,
    /// Identifier of any chapter of the series; the chapter index endpoint
    /// resolves the full chapter list from it
    pub first_chapter_id: Uuid,
}

/// Inputs for the TV episode tracker provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheTvDbInputs {
    #[serde(flatten)]
    pub bindings: SourceBindings,
}

/// Inputs for the webcomic provider
///
/// The source name and encoded name are fixed to
/// [`SPYXFAMILY_SOURCE_NAME`]; supplying either in the catalog is rejected
/// as an unknown field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpyXFamilyInputs {
    pub todoist_project_id: String,
    #[serde(default)]
    pub todoist_section_id: Option<String>,
}

/// One configured content source: a provider plus that provider's inputs.
///
/// Serialized adjacently tagged, so the catalog entry
/// `{"provider": "InManga", "inputs": {...}}` round-trips unchanged.
/// Immutable once loaded; owned by the orchestrator for the duration of a
/// run, with episodes carrying clones back to the reconcilers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "inputs")]
pub enum Source {
    #[serde(rename = "InManga")]
    InManga(InMangaInputs),
    #[serde(rename = "TheTVDB")]
    TheTvDb(TheTvDbInputs),
    #[serde(rename = "SpyXFamily")]
    SpyXFamily(SpyXFamilyInputs),
}

impl Source {
    /// Provider name used for registry dispatch
    pub fn provider_name(&self) -> &'static str {
        match self {
            Source::InManga(_) => "InManga",
            Source::TheTvDb(_) => "TheTVDB",
            Source::SpyXFamily(_) => "SpyXFamily",
        }
    }

    /// Human-readable source name (persisted-state key, task content prefix)
    pub fn name(&self) -> &str {
        match self {
            Source::InManga(inputs) => &inputs.bindings.source_name,
            Source::TheTvDb(inputs) => &inputs.bindings.source_name,
            Source::SpyXFamily(_) => SPYXFAMILY_SOURCE_NAME,
        }
    }

    /// Source name as it appears in the provider's URLs
    pub fn encoded_name(&self) -> &str {
        match self {
            Source::InManga(inputs) => &inputs.bindings.source_encoded_name,
            Source::TheTvDb(inputs) => &inputs.bindings.source_encoded_name,
            Source::SpyXFamily(_) => SPYXFAMILY_SOURCE_NAME,
        }
    }

    /// Tracker project for this source's tasks
    pub fn project_id(&self) -> &str {
        match self {
            Source::InManga(inputs) => &inputs.bindings.todoist_project_id,
            Source::TheTvDb(inputs) => &inputs.bindings.todoist_project_id,
            Source::SpyXFamily(inputs) => &inputs.todoist_project_id,
        }
    }

    /// Tracker section for this source's tasks, if any
    pub fn section_id(&self) -> Option<&str> {
        match self {
            Source::InManga(inputs) => inputs.bindings.todoist_section_id.as_deref(),
            Source::TheTvDb(inputs) => inputs.bindings.todoist_section_id.as_deref(),
            Source::SpyXFamily(inputs) => inputs.todoist_section_id.as_deref(),
        }
    }
}
