//! Test utilities for integration tests.
//!
//! This module provides a mock media repository, a counting dimension
//! provider, local store fixtures and request helpers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use tempfile::TempDir;
use tower::ServiceExt;

use iiif_media_server::error::RepositoryError;
use iiif_media_server::media::{ImageDimensions, ImageMetadata, MediaRef, MediaRepository};
use iiif_media_server::store::FileStore;

// =============================================================================
// Mock Repository with Request Tracking
// =============================================================================

/// A mock repository that serves pre-configured media records and counts
/// reads.
#[derive(Clone, Default)]
pub struct MockRepository {
    records: HashMap<String, MediaRef>,
    failing: bool,
    read_count: Arc<AtomicUsize>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_media(mut self, media: MediaRef) -> Self {
        self.records.insert(media.id.clone(), media);
        self
    }

    /// Make every read fail with a backend error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaRepository for MockRepository {
    async fn read(&self, id: &str) -> Result<MediaRef, RepositoryError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            return Err(RepositoryError::Backend("connection refused".to_string()));
        }

        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })
    }
}

// =============================================================================
// Mock Dimension Provider
// =============================================================================

/// A dimension provider that answers fixed dimensions and counts lookups.
#[derive(Clone, Default)]
pub struct CountingMetadata {
    dimensions: Option<ImageDimensions>,
    lookups: Arc<AtomicUsize>,
}

impl CountingMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some(ImageDimensions::new(width, height));
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageMetadata for CountingMetadata {
    async fn dimensions(&self, _media: &MediaRef) -> Option<ImageDimensions> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.dimensions
    }
}

// =============================================================================
// Media Fixtures
// =============================================================================

/// Media record `42` stored as `42.jpg`.
pub fn jpeg_media() -> MediaRef {
    MediaRef::new(
        "42",
        "42.jpg",
        "image/jpeg",
        "https://media.example.org/files/original/42.jpg",
    )
}

/// Create a test RGB JPEG image.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, 80);
    encoder.encode_image(&img).unwrap();
    buf
}

/// A temporary local store with an `original/` directory.
pub struct LocalStoreFixture {
    dir: TempDir,
}

impl LocalStoreFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("original")).unwrap();
        Self { dir }
    }

    /// Write `data` as `original/{filename}`.
    pub fn with_file(self, filename: &str, data: &[u8]) -> Self {
        std::fs::write(self.dir.path().join("original").join(filename), data).unwrap();
        self
    }

    pub fn store(&self) -> FileStore {
        FileStore::local(self.dir.path())
    }
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Send a GET request with optional `Accept` header.
pub async fn get(router: &Router, uri: &str, accept: Option<&str>) -> Response<Body> {
    match accept {
        Some(accept) => get_with_headers(router, uri, &[("accept", accept)]).await,
        None => get_with_headers(router, uri, &[]).await,
    }
}

/// Send a GET request with extra headers.
pub async fn get_with_headers(
    router: &Router,
    uri: &str,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().uri(uri).header("host", "iiif.test");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Collect a response body as bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Header value as a string slice.
pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}
