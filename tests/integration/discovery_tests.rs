//! Discovery integration tests.
//!
//! Tests verify:
//! - `/{id}` redirects (303) to the canonical info URL
//! - Unknown identifiers return 404
//! - Malformed paths return 400 with the fixed payload
//! - Health check

use axum::http::StatusCode;

use iiif_media_server::error::MALFORMED_REQUEST_MESSAGE;
use iiif_media_server::{create_router, FileStore, RouterConfig};

use super::test_utils::{body_json, get, header, jpeg_media, MockRepository};

fn remote_store() -> FileStore {
    FileStore::remote(url::Url::parse("https://media.example.org/files/").unwrap())
}

// =============================================================================
// Base URI Redirect
// =============================================================================

#[tokio::test]
async fn test_base_uri_redirects_to_info() {
    let repository = MockRepository::new().with_media(jpeg_media());
    let router = create_router(repository, remote_store(), RouterConfig::new());

    let response = get(&router, "/42", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        header(&response, "location"),
        Some("http://iiif.test/42/info.json")
    );
}

#[tokio::test]
async fn test_base_uri_redirect_uses_public_url() {
    let repository = MockRepository::new().with_media(jpeg_media());
    let config = RouterConfig::new().with_public_url("https://example.org/iiif/");
    let router = create_router(repository, remote_store(), config);

    let response = get(&router, "/42", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        header(&response, "location"),
        Some("https://example.org/iiif/42/info.json")
    );
}

#[tokio::test]
async fn test_base_uri_unknown_media() {
    let repository = MockRepository::new();
    let router = create_router(repository.clone(), remote_store(), RouterConfig::new());

    let response = get(&router, "/999", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(header(&response, "location").is_none());
    assert_eq!(repository.read_count(), 1);

    let error = body_json(response).await;
    assert_eq!(error["error"], "not_found");
    assert_eq!(error["status"], 404);
}

// =============================================================================
// Malformed Requests
// =============================================================================

#[tokio::test]
async fn test_malformed_identifier_rejected_before_lookup() {
    let repository = MockRepository::new().with_media(jpeg_media());
    let router = create_router(repository.clone(), remote_store(), RouterConfig::new());

    for uri in ["/bad%20id", "/42.tar.gz", "/42.", "/.jpg", "/bad%20id/info.json"] {
        let response = get(&router, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);

        let error = body_json(response).await;
        assert_eq!(error["message"], MALFORMED_REQUEST_MESSAGE);
        assert_eq!(error["error"], "malformed_request");
    }

    assert_eq!(repository.read_count(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_malformed() {
    let repository = MockRepository::new().with_media(jpeg_media());
    let router = create_router(repository.clone(), remote_store(), RouterConfig::new());

    for uri in ["/", "/42/full/full/0/default.jpg", "/42/info.xml"] {
        let response = get(&router, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);

        let error = body_json(response).await;
        assert_eq!(error["message"], MALFORMED_REQUEST_MESSAGE);
    }

    assert_eq!(repository.read_count(), 0);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let router = create_router(MockRepository::new(), remote_store(), RouterConfig::new());

    let response = get(&router, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let health = body_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert!(health["version"].is_string());
}
