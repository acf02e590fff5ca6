//! Domain data model: sources, episodes, tracker tasks

pub mod episode;
pub mod source;
pub mod task;

pub use episode::{Episode, NonScheduledEpisode, ScheduledEpisode};
pub use source::{Source, SourceBindings, SPYXFAMILY_SOURCE_NAME};
pub use task::{Patch, Task, TaskCreate, TaskUpdate};
