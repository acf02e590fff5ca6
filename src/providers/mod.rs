//! Site providers
//!
//! Each provider is a thin adapter over one site: fetch a page, parse it,
//! return the full list of episodes currently visible for the source.
//! Providers never diff against previous runs; deduplication belongs to
//! the reconcilers.

pub mod inmanga;
pub mod spyxfamily;
pub mod thetvdb;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{Episode, Source};

pub use inmanga::InMangaProvider;
pub use spyxfamily::SpyXFamilyProvider;
pub use thetvdb::TheTvDbProvider;

/// One site adapter
#[async_trait]
pub trait EpisodeProvider: Send + Sync {
    async fn fetch_episodes(&self, source: &Source) -> Result<Vec<Episode>>;
}

/// Provider-name to adapter mapping. Dispatch is data-driven so adding a
/// site means adding a registration, not another match arm.
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn EpisodeProvider>>,
}

impl ProviderRegistry {
    /// Registry wired with the three production site adapters
    pub fn new() -> Result<Self> {
        let mut registry = Self {
            providers: HashMap::new(),
        };
        registry.insert("InManga", Arc::new(InMangaProvider::new()?));
        registry.insert("TheTVDB", Arc::new(TheTvDbProvider::new()?));
        registry.insert("SpyXFamily", Arc::new(SpyXFamilyProvider::new()?));
        Ok(registry)
    }

    /// Empty registry; callers register their own adapters
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register or replace the adapter for a provider name
    pub fn insert(&mut self, name: &'static str, provider: Arc<dyn EpisodeProvider>) {
        self.providers.insert(name, provider);
    }

    /// Dispatch a fetch to the adapter registered for the source's provider
    pub async fn fetch_episodes(&self, source: &Source) -> Result<Vec<Episode>> {
        let provider = self.providers.get(source.provider_name()).ok_or_else(|| {
            Error::Internal(format!(
                "No provider registered for {}",
                source.provider_name()
            ))
        })?;
        provider.fetch_episodes(source).await
    }
}
