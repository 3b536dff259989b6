//! Application configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Every knob has a typed default so the binary runs with an empty
//! environment. Unparseable numbers fall back to their default; values that
//! would make pagination meaningless (zero sizes) are rejected.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_CATALOG_SIZE: usize = 151;
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_QUERY_STALE_SECS: u64 = 60 * 60 * 24;
pub const DEFAULT_QUERY_GC_SECS: u64 = 60 * 60 * 48;
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FORM_STORE_PATH: &str = ".form-store.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl ConfigError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl HttpTimeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_HTTP_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_HTTP_CONNECT_TIMEOUT_SECS }
    }
}

/// Cache lifetimes for catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTimings {
    /// Age after which cached data is refetched on the next read.
    pub stale_after: Duration,
    /// Idle time after which an unused entry is evicted.
    pub gc_after: Duration,
}

impl Default for QueryTimings {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(DEFAULT_QUERY_STALE_SECS),
            gc_after: Duration::from_secs(DEFAULT_QUERY_GC_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: String,
    pub catalog_size: usize,
    pub page_size: usize,
    pub query: QueryTimings,
    pub timeouts: HttpTimeouts,
    pub form_store_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_POKEAPI_BASE_URL.to_string(),
            catalog_size: DEFAULT_CATALOG_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            query: QueryTimings::default(),
            timeouts: HttpTimeouts::default(),
            form_store_path: PathBuf::from(DEFAULT_FORM_STORE_PATH),
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `POKEAPI_BASE_URL`: default `https://pokeapi.co/api/v2`
    /// - `CATALOG_SIZE`: default 151
    /// - `CATALOG_PAGE_SIZE`: default 20
    /// - `QUERY_STALE_SECS`: default 86400
    /// - `QUERY_GC_SECS`: default 172800
    /// - `HTTP_REQUEST_TIMEOUT_SECS`: default 30
    /// - `HTTP_CONNECT_TIMEOUT_SECS`: default 10
    /// - `FORM_STORE_PATH`: default `.form-store.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog size or page size is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("POKEAPI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_POKEAPI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let catalog_size = non_zero("CATALOG_SIZE", env_parse("CATALOG_SIZE", DEFAULT_CATALOG_SIZE))?;
        let page_size = non_zero("CATALOG_PAGE_SIZE", env_parse("CATALOG_PAGE_SIZE", DEFAULT_PAGE_SIZE))?;

        let query = QueryTimings {
            stale_after: Duration::from_secs(env_parse("QUERY_STALE_SECS", DEFAULT_QUERY_STALE_SECS)),
            gc_after: Duration::from_secs(env_parse("QUERY_GC_SECS", DEFAULT_QUERY_GC_SECS)),
        };
        let timeouts = HttpTimeouts {
            request_secs: env_parse("HTTP_REQUEST_TIMEOUT_SECS", DEFAULT_HTTP_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
        };
        let form_store_path = std::env::var("FORM_STORE_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_FORM_STORE_PATH), PathBuf::from);

        Ok(Self { base_url, catalog_size, page_size, query, timeouts, form_store_path })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn non_zero(key: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid { key, value: value.to_string() });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
