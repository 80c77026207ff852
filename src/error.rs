use thiserror::Error;

/// Fixed message for requests whose path or query fails validation.
pub const MALFORMED_REQUEST_MESSAGE: &str =
    "The image server cannot fulfill the request: the arguments are incorrect.";

/// Fixed message when the requested format differs from the stored one.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str = "The image server encountered an unexpected error \
     that prevented it from fulfilling the request: the requested format is not supported.";

/// Fixed message when a local file is absent or empty.
pub const RESOURCE_MISSING_MESSAGE: &str = "The image server encountered an unexpected error \
     that prevented it from fulfilling the request: the resulting file is not found.";

/// Errors reported by a media repository.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The identifier does not resolve to a media record
    #[error("Media not found: {id}")]
    NotFound { id: String },

    /// The backing store of the repository failed
    #[error("Repository error: {0}")]
    Backend(String),
}

/// Errors raised while loading a media catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not a valid JSON array of media records
    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two records share the same identifier
    #[error("Duplicate media id in catalog: {0}")]
    DuplicateId(String),
}

/// Request-level failures of the image server.
///
/// Every variant is terminal for the request and maps to exactly one
/// HTTP status code.
#[derive(Debug, Clone, Error)]
pub enum ImageServerError {
    /// Identifier does not resolve to a media record (HTTP 404)
    #[error("Media not found: {id}")]
    NotFound { id: String },

    /// Path or query parameters failed validation (HTTP 400)
    #[error("{}", MALFORMED_REQUEST_MESSAGE)]
    MalformedRequest,

    /// Requested format differs from the stored extension (HTTP 500)
    #[error("{}", UNSUPPORTED_FORMAT_MESSAGE)]
    UnsupportedFormat { requested: String, stored: String },

    /// Local file is absent or has zero length (HTTP 500)
    #[error("{}", RESOURCE_MISSING_MESSAGE)]
    ResourceMissing { path: String },

    /// Repository backend failure (HTTP 500)
    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for ImageServerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id } => ImageServerError::NotFound { id },
            RepositoryError::Backend(msg) => ImageServerError::Repository(msg),
        }
    }
}
