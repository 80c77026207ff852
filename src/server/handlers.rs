//! HTTP request handlers for the IIIF media API.
//!
//! # Endpoints
//!
//! - `GET /{identifier}` - Redirect to the canonical `info.json` URL
//! - `GET /{identifier}/info.json` - Serve the info document
//! - `GET /{identifier}.{format}` - Redirect to (or serve) the original file
//! - `GET /health` - Health check endpoint
//!
//! Anything else is answered with a 400 malformed-request payload.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, error, warn};

use crate::error::ImageServerError;
use crate::iiif::{accepts_json_ld, negotiate_headers, InfoBuilder};
use crate::media::{ImageMetadata, MediaRef, MediaRepository};
use crate::store::{FileStore, ResolvedLocation, StorageLocator, ORIGINAL_PREFIX};

/// Maximum identifier length accepted in a path.
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Maximum format (extension) length accepted in a path.
pub const MAX_FORMAT_LENGTH: usize = 10;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// Everything here is read-only after startup; handlers keep no state
/// between requests.
pub struct AppState<R: MediaRepository> {
    /// Repository resolving identifiers to media records
    pub repository: Arc<R>,

    /// File store holding the original files
    pub store: Arc<FileStore>,

    /// Pixel dimension provider for info documents
    pub metadata: Arc<dyn ImageMetadata>,

    /// Info document builder (carries the fallback API version)
    pub info_builder: InfoBuilder,

    /// Canonical public base URL, without trailing slash
    pub public_url: Option<String>,

    /// Cache-Control max-age in seconds for info documents and served files
    pub cache_max_age: u32,

    /// Serve local files directly instead of redirecting
    pub serve_local_files: bool,

    /// Emit `Access-Control-Allow-Origin: *` from the handlers.
    ///
    /// Cleared when the router restricts origins; the CORS layer then
    /// answers allowed origins on its own.
    pub allow_any_origin: bool,
}

impl<R: MediaRepository> AppState<R> {
    /// Create a new application state with default settings.
    pub fn new(repository: R, store: FileStore, metadata: Arc<dyn ImageMetadata>) -> Self {
        Self {
            repository: Arc::new(repository),
            store: Arc::new(store),
            metadata,
            info_builder: InfoBuilder::new(),
            public_url: None,
            cache_max_age: 3600,
            serve_local_files: false,
            allow_any_origin: true,
        }
    }

    pub fn with_info_builder(mut self, info_builder: InfoBuilder) -> Self {
        self.info_builder = info_builder;
        self
    }

    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url.map(|url| url.trim_end_matches('/').to_string());
        self
    }

    pub fn with_cache_max_age(mut self, cache_max_age: u32) -> Self {
        self.cache_max_age = cache_max_age;
        self
    }

    pub fn with_serve_local_files(mut self, enabled: bool) -> Self {
        self.serve_local_files = enabled;
        self
    }

    pub fn with_any_origin(mut self, enabled: bool) -> Self {
        self.allow_any_origin = enabled;
        self
    }

    fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age)
    }

    fn with_cors(&self, mut response: Response) -> Response {
        if self.allow_any_origin {
            response.headers_mut().insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
        }
        response
    }
}

impl<R: MediaRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            store: Arc::clone(&self.store),
            metadata: Arc::clone(&self.metadata),
            info_builder: self.info_builder,
            public_url: self.public_url.clone(),
            cache_max_age: self.cache_max_age,
            serve_local_files: self.serve_local_files,
            allow_any_origin: self.allow_any_origin,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Parsed `/{segment}` path: a bare identifier or `identifier.format`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPath {
    /// `/{identifier}` - discovery
    Identifier(String),

    /// `/{identifier}.{format}` - fetch
    File { identifier: String, format: String },
}

impl MediaPath {
    /// Parse and validate a single path segment.
    ///
    /// The format is whatever follows the last dot.
    pub fn parse(segment: &str) -> Result<Self, ImageServerError> {
        match segment.rsplit_once('.') {
            Some((identifier, format)) => {
                validate_identifier(identifier)?;
                validate_format(format)?;
                Ok(MediaPath::File {
                    identifier: identifier.to_string(),
                    format: format.to_string(),
                })
            }
            None => {
                validate_identifier(segment)?;
                Ok(MediaPath::Identifier(segment.to_string()))
            }
        }
    }
}

/// Identifiers are 1-255 characters of `[A-Za-z0-9_-]`.
pub fn validate_identifier(identifier: &str) -> Result<(), ImageServerError> {
    let valid = !identifier.is_empty()
        && identifier.len() <= MAX_IDENTIFIER_LENGTH
        && identifier
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

    if valid {
        Ok(())
    } else {
        Err(ImageServerError::MalformedRequest)
    }
}

/// Formats are 1-10 ASCII alphanumerics.
pub fn validate_format(format: &str) -> Result<(), ImageServerError> {
    let valid = !format.is_empty()
        && format.len() <= MAX_FORMAT_LENGTH
        && format.bytes().all(|b| b.is_ascii_alphanumeric());

    if valid {
        Ok(())
    } else {
        Err(ImageServerError::MalformedRequest)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "malformed_request")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ImageServerError to HTTP response.
///
/// - 5xx errors are logged at ERROR level
/// - 404 is logged at DEBUG level (common and expected)
/// - other 4xx errors are logged at WARN level
impl IntoResponse for ImageServerError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ImageServerError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            ImageServerError::MalformedRequest => (StatusCode::BAD_REQUEST, "malformed_request"),
            ImageServerError::UnsupportedFormat { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "unsupported_format")
            }
            ImageServerError::ResourceMissing { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "resource_missing")
            }
            ImageServerError::Repository(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "repository_error")
            }
        };
        let message = self.to_string();

        match &self {
            ImageServerError::UnsupportedFormat { requested, stored } => error!(
                error_type = error_type,
                status = status.as_u16(),
                requested = %requested,
                stored = %stored,
                "Server error: requested format differs from stored file"
            ),
            ImageServerError::ResourceMissing { path } => error!(
                error_type = error_type,
                status = status.as_u16(),
                path = %path,
                "Server error: local file missing or empty"
            ),
            _ if status.is_server_error() => error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            ),
            _ if status == StatusCode::NOT_FOUND => debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            ),
            _ => warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            ),
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle `/{identifier}` and `/{identifier}.{format}` requests.
///
/// A bare identifier is a discovery request; an identifier with an
/// extension is a fetch request.
pub async fn media_handler<R: MediaRepository>(
    State(state): State<AppState<R>>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Result<Response, ImageServerError> {
    let Path(segment) = path.map_err(reject_path)?;

    match MediaPath::parse(&segment)? {
        MediaPath::Identifier(identifier) => redirect_to_info(&state, &identifier, &headers).await,
        MediaPath::File { identifier, format } => {
            fetch_media(&state, &identifier, &format, &headers).await
        }
    }
}

/// Redirect a base URI to its info document.
///
/// # Response
///
/// - `303 See Other` with `Location: <base>/{identifier}/info.json`
/// - `404 Not Found`: Unknown identifier
async fn redirect_to_info<R: MediaRepository>(
    state: &AppState<R>,
    identifier: &str,
    headers: &HeaderMap,
) -> Result<Response, ImageServerError> {
    state.repository.read(identifier).await?;

    let location = format!(
        "{}/info.json",
        service_id(state.public_url.as_deref(), headers, identifier)
    );
    debug!(identifier, location = %location, "Redirecting to info document");

    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response())
}

/// Redirect to, or serve, the original file of a media item.
///
/// # Response
///
/// - `302 Found` to the media's original URL, with the media type and
///   `Access-Control-Allow-Origin: *` unless origins are restricted
/// - `200 OK` (or `206`/`304`) streaming the file when local serving is
///   enabled
/// - `404 Not Found`: Unknown identifier
/// - `500 Internal Server Error`: Format differs from the stored file, the
///   local file is missing or empty, or no URL is known for the original
async fn fetch_media<R: MediaRepository>(
    state: &AppState<R>,
    identifier: &str,
    format: &str,
    headers: &HeaderMap,
) -> Result<Response, ImageServerError> {
    let media = state.repository.read(identifier).await?;

    // No transcoding: only the stored format can be delivered.
    if !media.matches_format(format) {
        return Err(ImageServerError::UnsupportedFormat {
            requested: format.to_string(),
            stored: media.extension().unwrap_or_default().to_string(),
        });
    }

    let locator = state.store.locate(ORIGINAL_PREFIX, &media.filename);
    if state.store.supports_preflight() && !state.store.exists(&locator).await {
        return Err(ImageServerError::ResourceMissing {
            path: locator.storage_path(),
        });
    }

    if state.serve_local_files {
        if let Some(path) = state.store.local_path(&locator) {
            return serve_local_file(state, &media, &locator, path, headers).await;
        }
    }

    let location = redirect_target(state, &media, &locator)?;
    debug!(identifier, location = %location, "Redirecting to original file");
    let response_headers = [
        (header::CONTENT_TYPE, media.media_type),
        (header::LOCATION, location),
    ];
    Ok(state.with_cors((StatusCode::FOUND, response_headers).into_response()))
}

/// Stream a local original with the media's type.
///
/// The client's conditional and `Range` headers are honoured.
async fn serve_local_file<R: MediaRepository>(
    state: &AppState<R>,
    media: &MediaRef,
    locator: &StorageLocator,
    path: std::path::PathBuf,
    headers: &HeaderMap,
) -> Result<Response, ImageServerError> {
    let mut request = Request::new(Body::empty());
    *request.headers_mut() = headers.clone();

    let response = ServeFile::new(&path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        debug!(path = %path.display(), "File vanished before serving");
        return Err(ImageServerError::ResourceMissing {
            path: locator.storage_path(),
        });
    }
    debug!(identifier = %media.id, status = status.as_u16(), "Serving local file");

    let mut response = response.map(Body::new);
    if let Ok(value) = HeaderValue::from_str(&media.media_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&state.cache_control()) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    Ok(state.with_cors(response))
}

/// Where a fetch redirect points.
///
/// The repository's original URL wins. Records without one fall back to
/// the remote store's URL for the located file; a local store has no URL
/// to offer.
fn redirect_target<R: MediaRepository>(
    state: &AppState<R>,
    media: &MediaRef,
    locator: &StorageLocator,
) -> Result<String, ImageServerError> {
    if !media.original_url.is_empty() {
        return Ok(media.original_url.clone());
    }

    let missing = || ImageServerError::ResourceMissing {
        path: locator.storage_path(),
    };
    match state.store.resolve(locator) {
        Ok(ResolvedLocation::Url(url)) => Ok(url.to_string()),
        Ok(ResolvedLocation::Path(path)) => {
            debug!(path = %path.display(), "No public URL for local file");
            Err(missing())
        }
        Err(e) => {
            debug!(path = %locator.storage_path(), "Cannot resolve store URL: {}", e);
            Err(missing())
        }
    }
}

/// Handle info document requests.
///
/// # Endpoint
///
/// `GET /{identifier}/info.json`
///
/// The `Accept` header selects the API version; requests naming neither
/// context get the configured default.
///
/// # Response
///
/// - `200 OK` with the JSON-LD info document
/// - `400 Bad Request`: Malformed identifier
/// - `404 Not Found`: Unknown identifier
///
/// # Headers
///
/// - `Content-Type`: JSON-LD with the version's profile (or plain JSON for 2.1)
/// - `Access-Control-Allow-Origin: *`
/// - `Cache-Control: public, max-age={cache_max_age}`
pub async fn info_handler<R: MediaRepository>(
    State(state): State<AppState<R>>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Result<Response, ImageServerError> {
    let Path(identifier) = path.map_err(reject_path)?;
    validate_identifier(&identifier)?;

    let media = state.repository.read(&identifier).await?;

    let version = state.info_builder.resolve(negotiate_headers(&headers));
    let dimensions = state.metadata.dimensions(&media).await;
    if dimensions.is_none() {
        debug!(identifier = %identifier, "Dimensions unknown, omitting width and height");
    }

    let service_id = service_id(state.public_url.as_deref(), &headers, &identifier);
    let info = state
        .info_builder
        .build(&media, version, &service_id, dimensions);
    debug!(identifier = %identifier, version = %version, "Serving info document");

    let response_headers = [
        (header::CONTENT_TYPE, info.content_type(accepts_json_ld(&headers))),
        (header::CACHE_CONTROL, state.cache_control()),
    ];
    Ok(state.with_cors((StatusCode::OK, response_headers, Json(info)).into_response()))
}

/// Answer any request outside the IIIF surface with a 400.
pub async fn bad_request_handler() -> ImageServerError {
    ImageServerError::MalformedRequest
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn reject_path(rejection: PathRejection) -> ImageServerError {
    debug!("Path rejected: {}", rejection);
    ImageServerError::MalformedRequest
}

/// Absolute base URL of the service.
///
/// The configured public URL wins; otherwise it is derived from the `Host`
/// and `X-Forwarded-Proto` headers.
pub fn base_url(public_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = public_url {
        return url.trim_end_matches('/').to_string();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:3000");

    // Proxy chains append their own scheme; the first one is the client's.
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("http");

    format!("{}://{}", proto, host)
}

/// Canonical image service URI: `<base>/<percent-encoded identifier>`.
pub fn service_id(public_url: Option<&str>, headers: &HeaderMap, identifier: &str) -> String {
    format!(
        "{}/{}",
        base_url(public_url, headers),
        urlencoding::encode(identifier)
    )
}

// =============================================================================
// Tests
// =============================================================================
