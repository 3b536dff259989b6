//! Catalog browser — list and detail queries routed through the query cache.
//!
//! SYSTEM CONTEXT
//! ==============
//! The list view asks for a 1-based page, the detail view for an item name.
//! Both go through a `QueryCache` so revisiting a page or item inside the
//! stale window costs no network call, and two views asking for the same
//! key at once share one request.

use std::sync::Arc;

use super::client::CatalogSource;
use super::pagination::Pagination;
use super::types::{CatalogError, CatalogPage, CreatureDetail};
use crate::config::{AppConfig, QueryTimings};
use crate::query::{QueryCache, QueryState};

/// Cache key for a catalog read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    Page { offset: usize },
    Creature { name: String },
}

impl CatalogKey {
    /// Detail keys are case- and whitespace-insensitive.
    #[must_use]
    pub fn creature(name: &str) -> Self {
        Self::Creature { name: normalize_name(name) }
    }
}

pub struct CatalogBrowser {
    source: Arc<dyn CatalogSource>,
    pagination: Pagination,
    pages: QueryCache<CatalogKey, CatalogPage>,
    creatures: QueryCache<CatalogKey, CreatureDetail>,
}

impl CatalogBrowser {
    #[must_use]
    pub fn new(source: Arc<dyn CatalogSource>, pagination: Pagination, timings: QueryTimings) -> Self {
        Self { source, pagination, pages: QueryCache::new(timings), creatures: QueryCache::new(timings) }
    }

    #[must_use]
    pub fn from_config(source: Arc<dyn CatalogSource>, config: &AppConfig) -> Self {
        Self::new(source, Pagination::new(config.catalog_size, config.page_size), config.query)
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    #[must_use]
    pub fn page_key(&self, page: usize) -> CatalogKey {
        CatalogKey::Page { offset: self.pagination.offset(page) }
    }

    /// Fetch one page of the list view.
    ///
    /// # Errors
    ///
    /// Returns `PageOutOfRange` without touching the network when the page
    /// starts past the end of the catalog, otherwise the request's error.
    pub async fn list_page(&self, page: usize) -> Result<Arc<CatalogPage>, CatalogError> {
        let page = page.max(1);
        let Some(window) = self.pagination.window(page) else {
            return Err(CatalogError::PageOutOfRange { page, total_pages: self.pagination.total_pages() });
        };

        let source = Arc::clone(&self.source);
        let count = self.pagination.catalog_size();
        self.pages
            .fetch(CatalogKey::Page { offset: window.offset }, move || async move {
                let mut response = source.fetch_page(window.limit, window.offset).await?;
                response.results.truncate(window.limit);
                Ok(CatalogPage { page, items: response.results, count })
            })
            .await
    }

    #[must_use]
    pub fn page_state(&self, page: usize) -> QueryState<CatalogPage> {
        self.pages.state(&self.page_key(page))
    }

    /// Fetch the detail record for `name`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for blank or unknown names, otherwise the request's error.
    pub async fn creature(&self, name: &str) -> Result<Arc<CreatureDetail>, CatalogError> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(CatalogError::NotFound { name });
        }

        let source = Arc::clone(&self.source);
        let key = CatalogKey::Creature { name: name.clone() };
        self.creatures
            .fetch(key, move || async move { source.fetch_creature(&name).await })
            .await
    }

    #[must_use]
    pub fn creature_state(&self, name: &str) -> QueryState<CreatureDetail> {
        self.creatures.state(&CatalogKey::creature(name))
    }

    /// Evict idle entries from both caches.
    pub fn gc(&self) -> usize {
        self.pages.gc() + self.creatures.gc()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;
