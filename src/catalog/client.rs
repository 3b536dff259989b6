//! HTTP client for the public creature API.
//!
//! Two read-only endpoints:
//! - `GET {base}/pokemon?limit=&offset=`
//! - `GET {base}/pokemon/{name}`

use std::time::Duration;

use reqwest::Url;

use super::types::{CatalogError, CreatureDetail, ListResponse, parse_creature, parse_list};
use crate::config::{AppConfig, HttpTimeouts};

/// Read access to the catalog. The browser only talks to this trait, so
/// tests can substitute an in-memory source.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<ListResponse, CatalogError>;

    async fn fetch_creature(&self, name: &str) -> Result<CreatureDetail, CatalogError>;
}

pub struct CatalogClient {
    http: reqwest::Client,
    base: Url,
    base_url: String,
}

impl CatalogClient {
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP
    /// client fails to build.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, CatalogError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| CatalogError::HttpClientBuild(format!("invalid base url {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(CatalogError::HttpClientBuild(format!("invalid base url {base_url}")));
        }
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| CatalogError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base, base_url })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(&config.base_url, config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base` plus `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_text(&self, url: Url) -> Result<(u16, String), CatalogError> {
        let started = std::time::Instant::now();
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        tracing::debug!(%url, status, elapsed_ms = elapsed_ms(started.elapsed()), "catalog request");
        Ok((status, text))
    }
}

#[async_trait::async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<ListResponse, CatalogError> {
        let mut url = self.endpoint(&["pokemon"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        let (status, text) = self.get_text(url.clone()).await?;
        if !(200..300).contains(&status) {
            tracing::warn!(%url, status, "catalog list request failed");
            return Err(CatalogError::Status { status });
        }
        parse_list(&text)
    }

    async fn fetch_creature(&self, name: &str) -> Result<CreatureDetail, CatalogError> {
        let url = self.endpoint(&["pokemon", name]);
        let (status, text) = self.get_text(url.clone()).await?;
        match status {
            200..=299 => parse_creature(&text),
            404 => Err(CatalogError::NotFound { name: name.to_string() }),
            _ => {
                tracing::warn!(%url, status, "catalog detail request failed");
                Err(CatalogError::Status { status })
            }
        }
    }
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;
