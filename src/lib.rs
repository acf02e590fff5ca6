//! # Episode Tracker
//!
//! Polls a fixed catalog of episode sources (a manga site, a TV tracker
//! and a webcomic site), deduplicates what it finds against previous
//! runs and pushes the new episodes out as Todoist tasks and Telegram
//! messages.
//!
//! - Scheduled sources publish release dates and are reconciled against
//!   the tasks already in the tracker.
//! - Non-scheduled sources have no calendar and are deduplicated against
//!   a local seen store instead.

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod html;
pub mod models;
pub mod providers;
pub mod reconcile;
pub mod show;
pub mod store;

pub use app::App;
pub use config::Settings;
pub use error::{Error, Result};
