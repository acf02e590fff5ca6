//! Tracker task payloads
//!
//! `TaskUpdate` is a sparse patch: a field left at [`Patch::Keep`] is never
//! serialized, so the tracker only sees the fields the reconciler actually
//! decided to change. `Patch::Set(None)` serializes as an explicit `null`,
//! which is how a task's section is cleared.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Per-field presence marker for sparse patches.
///
/// `Keep` means "do not touch this field"; `Set(value)` means "write this
/// value, even if the value itself is null." Serialization of a `Keep`
/// is an error; patch structs skip `Keep` fields instead of serializing
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Keep => Err(serde::ser::Error::custom(
                "Patch::Keep fields must be skipped, not serialized",
            )),
        }
    }
}

/// Tracker task as read back from the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub content: String,
    pub description: String,
    pub project_id: String,
    pub section_id: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Payload for creating a tracker task. A task without a section is
/// created with an explicit null `section_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCreate {
    pub content: String,
    pub description: String,
    pub project_id: String,
    pub section_id: Option<String>,
    pub due_date: NaiveDate,
}

/// Sparse patch for an existing tracker task.
///
/// `section_id` is `Patch<Option<String>>` so the patch can distinguish
/// "leave the section alone" from "move the task out of its section."
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub due_date: Patch<NaiveDate>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub section_id: Patch<Option<String>>,
}

impl TaskUpdate {
    /// True when no field is set; an empty patch must not be sent
    pub fn is_empty(&self) -> bool {
        self.description.is_keep() && self.due_date.is_keep() && self.section_id.is_keep()
    }
}
