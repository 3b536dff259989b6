//! In-process stand-in for the remote API, used by tests.
//!
//! Serves an upstream catalog larger than the browsable one so clamping is
//! observable, answers unknown names with a plain-text 404, and counts hits.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;

pub const UPSTREAM_COUNT: usize = 1302;

#[derive(Clone, Default)]
pub struct FakeApi {
    pub list_hits: Arc<AtomicUsize>,
    pub detail_hits: Arc<AtomicUsize>,
}

impl FakeApi {
    pub fn list_hits(&self) -> usize {
        self.list_hits.load(Ordering::SeqCst)
    }

    pub fn detail_hits(&self) -> usize {
        self.detail_hits.load(Ordering::SeqCst)
    }
}

#[derive(Deserialize)]
struct ListParams {
    limit: Option<usize>,
    offset: Option<usize>,
}

pub fn creature_name(index: usize) -> String {
    if index == 0 { "bulbasaur".to_string() } else { format!("creature-{}", index + 1) }
}

async fn list(State(api): State<FakeApi>, Query(params): Query<ListParams>) -> Response {
    api.list_hits.fetch_add(1, Ordering::SeqCst);
    let limit = params.limit.unwrap_or(20);
    let offset = params.offset.unwrap_or(0);
    let results: Vec<_> = (offset..(offset + limit).min(UPSTREAM_COUNT))
        .map(|i| {
            serde_json::json!({
                "name": creature_name(i),
                "url": format!("https://pokeapi.test/api/v2/pokemon/{}/", i + 1),
            })
        })
        .collect();
    axum::Json(serde_json::json!({ "count": UPSTREAM_COUNT, "next": null, "previous": null, "results": results }))
        .into_response()
}

async fn detail(State(api): State<FakeApi>, Path(name): Path<String>) -> Response {
    api.detail_hits.fetch_add(1, Ordering::SeqCst);
    if name == "broken" {
        return (StatusCode::OK, "{\"name\": 3").into_response();
    }
    if name == "overloaded" {
        return (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response();
    }
    if name != "bulbasaur" && !name.starts_with("creature-") {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }
    axum::Json(serde_json::json!({
        "name": name,
        "height": 7,
        "weight": 69,
        "sprites": { "front_default": format!("https://img.test/{name}.png") },
        "types": [
            { "slot": 1, "type": { "name": "grass", "url": "" } },
            { "slot": 2, "type": { "name": "poison", "url": "" } }
        ]
    }))
    .into_response()
}

/// Bind on an ephemeral port and serve until the runtime shuts down.
/// Returns the base URL and hit counters.
pub async fn spawn() -> (String, FakeApi) {
    let api = FakeApi::default();
    let app = Router::new()
        .route("/pokemon", get(list))
        .route("/pokemon/{name}", get(detail))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}"), api)
}
