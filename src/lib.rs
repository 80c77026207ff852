//! # IIIF Media Server
//!
//! Exposes stored media items through the IIIF Image API.
//!
//! The server sits in front of an existing media repository and file store.
//! It answers discovery (`info.json`) requests in API 2.1 or 3.0, chosen by
//! content negotiation on the `Accept` header, and sends clients to the
//! original file bytes. It never resizes, tiles or transcodes images.
//!
//! ## Features
//!
//! - **Content negotiation**: picks API 3.0 or 2.1 from the JSON-LD context
//!   named in `Accept`, with a configurable fallback
//! - **Info documents**: level 0 capability documents with pixel dimensions
//!   read from the repository or the image header
//! - **Delivery**: redirects to the original file, with a pre-flight
//!   existence check on local stores
//! - **Base URI redirect**: `/{id}` sends clients to the canonical info URL
//!
//! ## Architecture
//!
//! - [`media`] - Media records, the repository trait and the JSON catalog
//! - [`store`] - Local and remote file stores
//! - [`iiif`] - Version negotiation and info document building
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use iiif_media_server::{create_router, FileStore, MediaCatalog, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let catalog = MediaCatalog::load("catalog.json").await.unwrap();
//!     let store = FileStore::local("/srv/files");
//!     let router = create_router(catalog, store, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod iiif;
pub mod media;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{Config, StoreBackend};
pub use error::{CatalogError, ImageServerError, RepositoryError};
pub use iiif::{negotiate, negotiate_headers, ApiVersion, InfoBuilder, InfoDocument};
pub use media::{
    ImageDimensions, ImageMetadata, MediaCatalog, MediaRef, MediaRepository, StoreImageMetadata,
};
pub use server::{
    create_router, create_router_with_metadata, health_handler, info_handler, media_handler,
    AppState, ErrorResponse, HealthResponse, MediaPath, RouterConfig,
};
pub use store::{FileStore, ResolvedLocation, StorageLocator, StoreKind};
