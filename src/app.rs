//! Application wiring and the polling run
//!
//! Pulls every configured source concurrently, splits the result into
//! scheduled and non-scheduled episodes and hands each batch to its
//! reconciler. A failing source is logged and contributes no episodes;
//! it never aborts the run.

use chrono::Local;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::clients::{ChatNotifier, TaskTracker, TelegramClient, TodoistClient};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::models::{Episode, Source};
use crate::providers::ProviderRegistry;
use crate::reconcile::{reconcile_non_scheduled, reconcile_scheduled, RunMode};
use crate::store::{SeenStore, SqliteSeenStore};

/// The assembled application: source catalog plus the external service
/// handles the reconcilers talk to.
pub struct App {
    sources: Vec<Source>,
    disabled_sources: Vec<String>,
    providers: ProviderRegistry,
    tracker: Arc<dyn TaskTracker>,
    notifier: Arc<dyn ChatNotifier>,
    store: Arc<dyn SeenStore>,
}

impl App {
    /// Assemble an application from already-built parts
    pub fn new(
        sources: Vec<Source>,
        disabled_sources: Vec<String>,
        providers: ProviderRegistry,
        tracker: Arc<dyn TaskTracker>,
        notifier: Arc<dyn ChatNotifier>,
        store: Arc<dyn SeenStore>,
    ) -> Self {
        Self {
            sources,
            disabled_sources,
            providers,
            tracker,
            notifier,
            store,
        }
    }

    /// Wire the production clients described by the settings
    async fn connect(settings: &Settings, sources: Vec<Source>) -> Result<Self> {
        let tracker = TodoistClient::new(&settings.todoist_api_key)?;
        let notifier = TelegramClient::new(settings.telegram.clone())?;
        let store = SqliteSeenStore::open(&settings.database_path).await?;
        Ok(Self::new(
            sources,
            settings.disabled_sources.clone(),
            ProviderRegistry::new()?,
            Arc::new(tracker),
            Arc::new(notifier),
            Arc::new(store),
        ))
    }

    /// Wire the production clients and execute one polling run.
    ///
    /// Construction failures go through the same error policy as the
    /// run itself: a database or HTTP client that cannot be built is an
    /// internal error, not a raw one.
    pub async fn connect_and_run(
        settings: &Settings,
        sources: Vec<Source>,
        entire_source: Option<&str>,
        dry_run: bool,
    ) -> Result<()> {
        let app = internalize(Self::connect(settings, sources).await)?;
        app.run(entire_source, dry_run).await
    }

    /// One full polling run.
    ///
    /// Configuration problems surface verbatim; anything else is logged
    /// here and collapsed into a single-line internal error for the exit
    /// message.
    pub async fn run(&self, entire_source: Option<&str>, dry_run: bool) -> Result<()> {
        internalize(self.poll(entire_source, dry_run).await)
    }

    async fn poll(&self, entire_source: Option<&str>, dry_run: bool) -> Result<()> {
        let sources = match entire_source {
            Some(name) => filter_sources(&self.sources, name)?,
            None => self.sources.iter().collect(),
        };

        // Re-processing a single source means the caller wants it redone
        // from scratch: treat everything as new and ignore the disabled
        // list for that run.
        let assume_new = entire_source.is_some();
        let mode = RunMode {
            assume_new,
            dry_run,
        };

        let fetches = sources
            .iter()
            .map(|source| self.fetch_source(source, assume_new));
        let episodes: Vec<Episode> = join_all(fetches).await.into_iter().flatten().collect();

        let mut scheduled = Vec::new();
        let mut non_scheduled = Vec::new();
        for episode in episodes {
            match episode {
                Episode::Scheduled(episode) => scheduled.push(episode),
                Episode::NonScheduled(episode) => non_scheduled.push(episode),
            }
        }
        info!("Found {} scheduled episodes", scheduled.len());
        info!("Found {} non-scheduled episodes", non_scheduled.len());

        let today = Local::now().date_naive();
        reconcile_scheduled(&*self.tracker, &scheduled, mode, today).await?;
        reconcile_non_scheduled(
            &*self.tracker,
            &*self.notifier,
            &*self.store,
            &non_scheduled,
            mode,
            today,
        )
        .await?;
        Ok(())
    }

    /// Fetch one source, degrading to an empty episode list when the
    /// source is disabled or its provider fails
    async fn fetch_source(&self, source: &Source, disable_filter: bool) -> Vec<Episode> {
        if !disable_filter && self.disabled_sources.iter().any(|name| name == source.name()) {
            info!("Source {} is disabled", source.name());
            return Vec::new();
        }
        match self.providers.fetch_episodes(source).await {
            Ok(episodes) => {
                debug!("Found {} episodes for {}", episodes.len(), source.name());
                episodes
            }
            Err(err) => {
                error!(error = %err, "Error while processing source {:?}", source.name());
                Vec::new()
            }
        }
    }
}

/// Pass user-facing errors through untouched; log anything else and
/// collapse it into a single-line internal error
fn internalize<T>(outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => Ok(value),
        Err(err) if err.is_user_facing() => Err(err),
        Err(err) => {
            error!(error = %err, "Internal error");
            match err {
                Error::Internal(_) => Err(err),
                other => Err(Error::Internal(other.to_string())),
            }
        }
    }
}

/// Restrict the catalog to one source by name
fn filter_sources<'a>(sources: &'a [Source], entire_source: &str) -> Result<Vec<&'a Source>> {
    let filtered: Vec<&Source> = sources
        .iter()
        .filter(|source| source.name() == entire_source)
        .collect();
    if filtered.is_empty() {
        let source_names = sources
            .iter()
            .map(|source| format!("'{}'", source.name()))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::Config(format!(
            "Invalid source name: '{}'. Valid names are: {}",
            entire_source, source_names
        )));
    }
    Ok(filtered)
}
