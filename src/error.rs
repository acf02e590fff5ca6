//! Common error types for episode-tracker

use thiserror::Error;

/// Common result type for episode-tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the whole crate
///
/// `Config` is the only user-facing variant: it surfaces verbatim with a
/// non-zero exit. Everything else is logged and wrapped as `Internal`
/// before it reaches the user (see [`crate::app::App::run`]).
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing configuration (environment, source catalog, CLI input)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote API responded with an error status
    #[error("Error while fetching {url}: {status} {body}")]
    Request {
        url: String,
        status: u16,
        body: String,
    },

    /// Transport-level HTTP failure (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Scraped page or API response did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON encoding or decoding error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error wrapper for anything unexpected at the top level
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors that should surface to the user as-is instead of
    /// being wrapped as an internal error.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
