use super::*;
use crate::catalog::fake_api;

async fn client() -> (CatalogClient, fake_api::FakeApi) {
    let (base_url, api) = fake_api::spawn().await;
    let client = CatalogClient::new(&format!("{base_url}/"), HttpTimeouts::default()).unwrap();
    (client, api)
}

#[tokio::test]
async fn new_trims_trailing_slash() {
    let client = CatalogClient::new("https://pokeapi.co/api/v2/", HttpTimeouts::default()).unwrap();
    assert_eq!(client.base_url(), "https://pokeapi.co/api/v2");
}

#[tokio::test]
async fn fetch_page_sends_limit_and_offset() {
    let (client, api) = client().await;
    let page = client.fetch_page(20, 20).await.unwrap();

    assert_eq!(page.count, fake_api::UPSTREAM_COUNT);
    assert_eq!(page.results.len(), 20);
    assert_eq!(page.results[0].name, fake_api::creature_name(20));
    assert_eq!(api.list_hits(), 1);
}

#[tokio::test]
async fn fetch_creature_maps_detail() {
    let (client, _api) = client().await;
    let detail = client.fetch_creature("bulbasaur").await.unwrap();

    assert_eq!(detail.name, "bulbasaur");
    assert_eq!(detail.height, 7);
    assert_eq!(detail.weight, 69);
    assert_eq!(detail.sprite_url.as_deref(), Some("https://img.test/bulbasaur.png"));
    assert_eq!(detail.types, vec!["grass".to_string(), "poison".to_string()]);
}

#[tokio::test]
async fn fetch_creature_unknown_name_is_not_found() {
    let (client, _api) = client().await;
    let err = client.fetch_creature("agumon").await.unwrap_err();
    assert_eq!(err, CatalogError::NotFound { name: "agumon".into() });
}

#[tokio::test]
async fn fetch_creature_escapes_name_as_one_path_segment() {
    let (client, api) = client().await;
    for name in ["bulbasaur?evil=1", "bulbasaur#x", "bulbasaur/x"] {
        let err = client.fetch_creature(name).await.unwrap_err();
        assert_eq!(err, CatalogError::NotFound { name: name.into() });
    }
    assert_eq!(api.detail_hits(), 3);
}

#[test]
fn endpoint_keeps_base_path() {
    let client = CatalogClient::new("https://pokeapi.co/api/v2/", HttpTimeouts::default()).unwrap();
    assert_eq!(client.endpoint(&["pokemon", "mr mime?"]).as_str(), "https://pokeapi.co/api/v2/pokemon/mr%20mime%3F");
}

#[test]
fn new_rejects_relative_base_url() {
    let err = CatalogClient::new("pokeapi.co/api", HttpTimeouts::default()).err().unwrap();
    assert!(matches!(err, CatalogError::HttpClientBuild(_)));
}

#[tokio::test]
async fn fetch_creature_server_error_is_status() {
    let (client, _api) = client().await;
    let err = client.fetch_creature("overloaded").await.unwrap_err();
    assert_eq!(err, CatalogError::Status { status: 503 });
    assert!(err.retryable());
}

#[tokio::test]
async fn fetch_creature_malformed_body_is_parse_error() {
    let (client, _api) = client().await;
    let err = client.fetch_creature("broken").await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[tokio::test]
async fn unreachable_host_is_request_error() {
    // Port 9 (discard) on loopback is closed in test environments.
    let timeouts = HttpTimeouts { request_secs: 2, connect_secs: 1 };
    let client = CatalogClient::new("http://127.0.0.1:9", timeouts).unwrap();
    let err = client.fetch_page(1, 0).await.unwrap_err();
    assert!(matches!(err, CatalogError::Request(_)));
}
