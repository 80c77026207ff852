//! Fetch integration tests.
//!
//! Tests verify:
//! - Redirect to the original file with media type and CORS headers
//! - Case-insensitive format check against the stored extension
//! - Local pre-flight checks (missing or empty file)
//! - Remote stores are never checked locally
//! - Remote redirects fall back to the store URL for records without one
//! - Direct, streamed serving of local files when enabled

use axum::http::StatusCode;

use iiif_media_server::error::{RESOURCE_MISSING_MESSAGE, UNSUPPORTED_FORMAT_MESSAGE};
use iiif_media_server::{create_router, FileStore, MediaRef, RouterConfig};

use super::test_utils::{
    body_bytes, body_json, create_test_jpeg, get, get_with_headers, header, jpeg_media,
    LocalStoreFixture, MockRepository,
};

/// Media record `42` without a recorded original URL.
fn jpeg_media_without_url() -> MediaRef {
    MediaRef::new("42", "42.jpg", "image/jpeg", "")
}

// =============================================================================
// Successful Fetch
// =============================================================================

#[tokio::test]
async fn test_fetch_redirects_to_original() {
    let fixture = LocalStoreFixture::new().with_file("42.jpg", &create_test_jpeg(8, 8));
    let repository = MockRepository::new().with_media(jpeg_media());
    let router = create_router(repository, fixture.store(), RouterConfig::new());

    let response = get(&router, "/42.jpg", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header(&response, "content-type"), Some("image/jpeg"));
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(
        header(&response, "location"),
        Some("https://media.example.org/files/original/42.jpg")
    );
}

#[tokio::test]
async fn test_fetch_format_is_case_insensitive() {
    let fixture = LocalStoreFixture::new().with_file("42.jpg", b"jpeg bytes");
    let repository = MockRepository::new().with_media(jpeg_media());
    let router = create_router(repository, fixture.store(), RouterConfig::new());

    let response = get(&router, "/42.JPG", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_fetch_remote_store_skips_local_check() {
    // Nothing exists locally; the remote store must not look.
    let store = FileStore::remote(url::Url::parse("https://media.example.org/files/").unwrap());
    let repository = MockRepository::new().with_media(jpeg_media());
    let router = create_router(repository, store, RouterConfig::new());

    let response = get(&router, "/42.jpg", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        header(&response, "location"),
        Some("https://media.example.org/files/original/42.jpg")
    );
}

#[tokio::test]
async fn test_fetch_remote_store_url_when_record_has_none() {
    let store = FileStore::remote(url::Url::parse("https://cdn.example.org/files").unwrap());
    let repository = MockRepository::new().with_media(jpeg_media_without_url());
    let router = create_router(repository, store, RouterConfig::new());

    let response = get(&router, "/42.jpg", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        header(&response, "location"),
        Some("https://cdn.example.org/files/original/42.jpg")
    );
}

#[tokio::test]
async fn test_fetch_local_store_without_url_is_missing() {
    let fixture = LocalStoreFixture::new().with_file("42.jpg", b"jpeg bytes");
    let repository = MockRepository::new().with_media(jpeg_media_without_url());
    let router = create_router(repository, fixture.store(), RouterConfig::new());

    let response = get(&router, "/42.jpg", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(header(&response, "location").is_none());
    let error = body_json(response).await;
    assert_eq!(error["error"], "resource_missing");
}

#[tokio::test]
async fn test_fetch_serves_local_file_when_enabled() {
    let data = create_test_jpeg(16, 16);
    let fixture = LocalStoreFixture::new().with_file("42.jpg", &data);
    let repository = MockRepository::new().with_media(jpeg_media());
    let config = RouterConfig::new()
        .with_serve_local_files(true)
        .with_cache_max_age(60);
    let router = create_router(repository, fixture.store(), config);

    let response = get(&router, "/42.jpg", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), Some("image/jpeg"));
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(header(&response, "cache-control"), Some("public, max-age=60"));
    assert!(header(&response, "location").is_none());
    assert_eq!(body_bytes(response).await, data);
}

#[tokio::test]
async fn test_fetch_serves_byte_range() {
    let data = create_test_jpeg(16, 16);
    let fixture = LocalStoreFixture::new().with_file("42.jpg", &data);
    let repository = MockRepository::new().with_media(jpeg_media_without_url());
    let config = RouterConfig::new().with_serve_local_files(true);
    let router = create_router(repository, fixture.store(), config);

    let response = get_with_headers(&router, "/42.jpg", &[("range", "bytes=0-3")]).await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(header(&response, "content-type"), Some("image/jpeg"));
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(body_bytes(response).await, data[..4].to_vec());
}

// =============================================================================
// Error Cases - Format
// =============================================================================

#[tokio::test]
async fn test_fetch_unsupported_format() {
    let fixture = LocalStoreFixture::new().with_file("42.jpg", b"jpeg bytes");
    let repository = MockRepository::new().with_media(jpeg_media());
    let router = create_router(repository, fixture.store(), RouterConfig::new());

    for uri in ["/42.png", "/42.jpeg", "/42.tif"] {
        let response = get(&router, uri, None).await;

        assert_eq!(
            response.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "uri: {}",
            uri
        );
        assert!(header(&response, "location").is_none());

        let error = body_json(response).await;
        assert_eq!(error["error"], "unsupported_format");
        assert_eq!(error["message"], UNSUPPORTED_FORMAT_MESSAGE);
    }
}

// =============================================================================
// Error Cases - Local Store
// =============================================================================

#[tokio::test]
async fn test_fetch_missing_local_file() {
    let fixture = LocalStoreFixture::new();
    let repository = MockRepository::new().with_media(jpeg_media());
    let router = create_router(repository, fixture.store(), RouterConfig::new());

    let response = get(&router, "/42.jpg", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(header(&response, "location").is_none());

    let error = body_json(response).await;
    assert_eq!(error["error"], "resource_missing");
    assert_eq!(error["message"], RESOURCE_MISSING_MESSAGE);
}

#[tokio::test]
async fn test_fetch_empty_local_file() {
    let fixture = LocalStoreFixture::new().with_file("42.jpg", b"");
    let repository = MockRepository::new().with_media(jpeg_media());
    let router = create_router(repository, fixture.store(), RouterConfig::new());

    let response = get(&router, "/42.jpg", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(response).await;
    assert_eq!(error["message"], RESOURCE_MISSING_MESSAGE);
}

// =============================================================================
// Error Cases - Unknown Media
// =============================================================================

#[tokio::test]
async fn test_fetch_unknown_media_is_404_before_store_check() {
    // The local store is empty, so a store check would answer 500.
    let fixture = LocalStoreFixture::new();
    let repository = MockRepository::new();
    let router = create_router(repository.clone(), fixture.store(), RouterConfig::new());

    for uri in ["/99.jpg", "/99.png", "/99"] {
        let response = get(&router, uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {}", uri);
    }

    assert_eq!(repository.read_count(), 3);
}
