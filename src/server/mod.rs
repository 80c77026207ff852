//! HTTP server layer for the IIIF media server.
//!
//! This module exposes stored media through the IIIF Image API surface.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │     GET /{id}   /{id}/info.json   /{id}.{format}   /health      │
//! │                                                                 │
//! │  ┌─────────────────────────┐  ┌──────────────────────────────┐  │
//! │  │        handlers         │  │           routes             │  │
//! │  │ (dispatch, errors)      │  │  (router config, CORS)       │  │
//! │  └─────────────────────────┘  └──────────────────────────────┘  │
//! └───────┬──────────────────┬──────────────────┬───────────────────┘
//!         ▼                  ▼                  ▼
//!   MediaRepository     iiif (negotiate,     FileStore
//!                        InfoBuilder)
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    bad_request_handler, base_url, health_handler, info_handler, media_handler, service_id,
    validate_format, validate_identifier, AppState, ErrorResponse, HealthResponse, MediaPath,
};
pub use routes::{create_router, create_router_with_metadata, RouterConfig};
