//! Router configuration for the IIIF media server.
//!
//! This module defines the HTTP routes and applies middleware for CORS and
//! request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /health                        - Health check
//! /{identifier}                  - 303 to the info document
//! /{identifier}/info.json        - Info document (2.1 or 3.0)
//! /{identifier}.{format}         - Original file (redirect or direct)
//! *                              - 400 malformed request
//! ```
//!
//! # Example
//!
//! ```ignore
//! use iiif_media_server::media::MediaCatalog;
//! use iiif_media_server::server::{create_router, RouterConfig};
//! use iiif_media_server::store::FileStore;
//!
//! let catalog = MediaCatalog::load("catalog.json").await?;
//! let store = FileStore::local("/srv/files");
//!
//! let config = RouterConfig::new()
//!     .with_public_url("https://example.org/iiif")
//!     .with_cache_max_age(600);
//!
//! let router = create_router(catalog, store, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    bad_request_handler, health_handler, info_handler, media_handler, AppState,
};
use crate::iiif::{ApiVersion, InfoBuilder};
use crate::media::{ImageMetadata, MediaRepository, StoreImageMetadata};
use crate::store::FileStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Canonical public base URL (None = derive from request headers)
    pub public_url: Option<String>,

    /// API version served when the client does not ask for one
    pub default_version: ApiVersion,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds
    pub cache_max_age: u32,

    /// Serve local files with 200 instead of redirecting
    pub serve_local_files: bool,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - The base URL is derived from `Host` / `X-Forwarded-Proto`
    /// - Unspecified requests get API 2.1
    /// - CORS allows any origin
    /// - Cache max-age is 1 hour (3600 seconds)
    /// - Files are redirected to, not served
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            public_url: None,
            default_version: ApiVersion::V2,
            cors_origins: None,
            cache_max_age: 3600,
            serve_local_files: false,
            enable_tracing: true,
        }
    }

    /// Set the canonical public base URL.
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    /// Set the API version served to clients that do not ask for one.
    pub fn with_default_version(mut self, version: ApiVersion) -> Self {
        self.default_version = version;
        self
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Serve local files directly instead of redirecting.
    pub fn with_serve_local_files(mut self, enabled: bool) -> Self {
        self.serve_local_files = enabled;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Pixel dimensions come from [`StoreImageMetadata`] over the same store.
pub fn create_router<R>(repository: R, store: FileStore, config: RouterConfig) -> Router
where
    R: MediaRepository + 'static,
{
    let metadata = Arc::new(StoreImageMetadata::new(store.clone()));
    create_router_with_metadata(repository, store, metadata, config)
}

/// Create the application router with a custom dimension provider.
pub fn create_router_with_metadata<R>(
    repository: R,
    store: FileStore,
    metadata: Arc<dyn ImageMetadata>,
    config: RouterConfig,
) -> Router
where
    R: MediaRepository + 'static,
{
    let app_state = AppState::new(repository, store, metadata)
        .with_info_builder(InfoBuilder::with_default_version(config.default_version))
        .with_public_url(config.public_url.clone())
        .with_cache_max_age(config.cache_max_age)
        .with_serve_local_files(config.serve_local_files)
        .with_any_origin(config.cors_origins.is_none());

    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/{identifier}", get(media_handler::<R>))
        .route("/{identifier}/info.json", get(info_handler::<R>))
        .fallback(bad_request_handler)
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
