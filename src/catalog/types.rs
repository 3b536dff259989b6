//! Catalog types — wire shapes of the remote API, display records, errors.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by catalog reads.
///
/// Payloads are strings so the error is `Clone`; a single failed request is
/// handed to every caller waiting on the same cache key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("catalog request failed: {0}")]
    Request(String),

    /// The API has no item with this name.
    #[error("catalog item not found: {name}")]
    NotFound { name: String },

    /// The API answered with a non-success status.
    #[error("catalog response error: status {status}")]
    Status { status: u16 },

    /// The response body did not match the expected shape.
    #[error("catalog response parse failed: {0}")]
    Parse(String),

    /// The requested page lies beyond the end of the catalog.
    #[error("page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },
}

impl CatalogError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_CATALOG_REQUEST",
            Self::NotFound { .. } => "E_CATALOG_NOT_FOUND",
            Self::Status { .. } => "E_CATALOG_STATUS",
            Self::Parse(_) => "E_CATALOG_PARSE",
            Self::PageOutOfRange { .. } => "E_PAGE_OUT_OF_RANGE",
        }
    }

    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599 })
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// `{name, url}` reference returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Body of `GET /pokemon?limit=&offset=`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub count: usize,
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpritesWire {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TypeSlotWire {
    #[serde(rename = "type")]
    pub kind: NamedResourceName,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedResourceName {
    pub name: String,
}

/// Body of `GET /pokemon/{name}`, reduced to the fields the detail view shows.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatureWire {
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub sprites: SpritesWire,
    #[serde(default)]
    pub types: Vec<TypeSlotWire>,
}

// =============================================================================
// DISPLAY RECORDS
// =============================================================================

/// One page of the catalog list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogPage {
    /// 1-based page index.
    pub page: usize,
    pub items: Vec<NamedResource>,
    /// Fixed catalog size, not the upstream total.
    pub count: usize,
}

impl CatalogPage {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }
}

/// Display attributes of a single catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatureDetail {
    pub name: String,
    /// Decimetres, as reported upstream.
    pub height: u32,
    /// Hectograms, as reported upstream.
    pub weight: u32,
    pub sprite_url: Option<String>,
    /// Category tags in slot order.
    pub types: Vec<String>,
}

impl CreatureDetail {
    #[must_use]
    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    #[must_use]
    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }

    #[must_use]
    pub fn types_label(&self) -> String {
        self.types.join(", ")
    }
}

impl From<CreatureWire> for CreatureDetail {
    fn from(wire: CreatureWire) -> Self {
        Self {
            name: wire.name,
            height: wire.height,
            weight: wire.weight,
            sprite_url: wire.sprites.front_default,
            types: wire.types.into_iter().map(|slot| slot.kind.name).collect(),
        }
    }
}

/// Parse a detail response body.
pub(crate) fn parse_creature(text: &str) -> Result<CreatureDetail, CatalogError> {
    let wire: CreatureWire = serde_json::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(wire.into())
}

/// Parse a list response body.
pub(crate) fn parse_list(text: &str) -> Result<ListResponse, CatalogError> {
    serde_json::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
