//! Persisted seen-episode state
//!
//! One row per source; the value column is the JSON array of chapter ids
//! exactly as the non-scheduled reconciler wrote it last. Rows are always
//! replaced wholesale, never merged.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

use crate::error::Result;

/// Seen-state persistence consumed by the non-scheduled reconciler.
///
/// A source with no stored row reads back as an empty list; "not found"
/// is not an error.
#[async_trait]
pub trait SeenStore: Send + Sync {
    async fn get_records(&self, source_name: &str) -> Result<Vec<String>>;
    async fn put_records(&self, source_name: &str, chapter_ids: Vec<String>) -> Result<()>;
}

/// SQLite-backed implementation of [`SeenStore`]
pub struct SqliteSeenStore {
    pool: SqlitePool,
}

impl SqliteSeenStore {
    /// Open the database at `db_path`, creating the file and schema on
    /// first run
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS seen_episodes (
                source_name TEXT PRIMARY KEY,
                chapter_ids TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SeenStore for SqliteSeenStore {
    async fn get_records(&self, source_name: &str) -> Result<Vec<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT chapter_ids FROM seen_episodes WHERE source_name = ?")
                .bind(source_name)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((json,)) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn put_records(&self, source_name: &str, chapter_ids: Vec<String>) -> Result<()> {
        let json = serde_json::to_string(&chapter_ids)?;
        sqlx::query(
            r#"
            INSERT INTO seen_episodes (source_name, chapter_ids)
            VALUES (?, ?)
            ON CONFLICT(source_name) DO UPDATE SET chapter_ids = excluded.chapter_ids
            "#,
        )
        .bind(source_name)
        .bind(json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
