//! Configuration management for the IIIF media server.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `IIIF_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use iiif_media_server::config::Config;
//!
//! let config = Config::parse();
//! config.validate()?;
//! let store = config.file_store()?;
//! ```
//!
//! # Environment Variables
//!
//! - `IIIF_HOST` - Server bind address (default: 0.0.0.0)
//! - `IIIF_PORT` - Server port (default: 3000)
//! - `IIIF_CATALOG` - JSON catalog of media records (required)
//! - `IIIF_STORE` - Store backend, `local` or `remote` (default: local)
//! - `IIIF_FILES_PATH` - Base path of the local store
//! - `IIIF_FILES_URL` - Base URL of the remote store
//! - `IIIF_PUBLIC_URL` - Canonical public base URL of this server
//! - `IIIF_DEFAULT_VERSION` - API version for unspecified requests (default: 2.1)
//! - `IIIF_SERVE_LOCAL_FILES` - Serve local files instead of redirecting (default: false)
//! - `IIIF_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `IIIF_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

use crate::iiif::ApiVersion;
use crate::store::FileStore;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

/// Default API version for requests without a recognized `Accept` marker.
pub const DEFAULT_API_VERSION: &str = "2.1";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Storage backend holding the original files.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Files on the local filesystem (existence is checked before redirecting)
    Local,
    /// Files in a remote object store (assumed reachable)
    Remote,
}

/// IIIF media server - IIIF Image API discovery and delivery for stored media.
///
/// Answers info.json requests in API 2.1 or 3.0 and redirects clients to the
/// original files. No image is ever transcoded.
#[derive(Parser, Debug, Clone)]
#[command(name = "iiif-media-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "IIIF_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "IIIF_PORT")]
    pub port: u16,

    /// Canonical public base URL used in redirects and info documents.
    ///
    /// If not specified, it is derived from the Host and X-Forwarded-Proto
    /// headers of each request.
    #[arg(long, env = "IIIF_PUBLIC_URL")]
    pub public_url: Option<String>,

    // =========================================================================
    // Media Configuration
    // =========================================================================
    /// JSON file listing the media records.
    #[arg(long, env = "IIIF_CATALOG")]
    pub catalog: PathBuf,

    /// Storage backend holding the original files.
    #[arg(long, value_enum, default_value_t = StoreBackend::Local, env = "IIIF_STORE")]
    pub store: StoreBackend,

    /// Base path of the local store (required with --store=local).
    #[arg(long, env = "IIIF_FILES_PATH")]
    pub files_path: Option<PathBuf>,

    /// Base URL of the remote store (required with --store=remote).
    ///
    /// Fetch redirects use it for records that carry no original URL.
    #[arg(long, env = "IIIF_FILES_URL")]
    pub files_url: Option<String>,

    /// Serve local files with 200 instead of redirecting to their URL.
    #[arg(long, default_value_t = false, env = "IIIF_SERVE_LOCAL_FILES")]
    pub serve_local_files: bool,

    // =========================================================================
    // IIIF Configuration
    // =========================================================================
    /// IIIF Image API version served when the client does not ask for one.
    #[arg(long, default_value = DEFAULT_API_VERSION, value_parser = parse_api_version, env = "IIIF_DEFAULT_VERSION")]
    pub default_version: ApiVersion,

    /// HTTP Cache-Control max-age in seconds.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "IIIF_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "IIIF_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

fn parse_api_version(s: &str) -> Result<ApiVersion, String> {
    s.parse()
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.catalog.as_os_str().is_empty() {
            return Err("Catalog path is required. Set --catalog or IIIF_CATALOG".to_string());
        }

        match self.store {
            StoreBackend::Local => {
                if self.files_path.is_none() {
                    return Err(
                        "Local store needs a base path. Set --files-path or IIIF_FILES_PATH"
                            .to_string(),
                    );
                }
            }
            StoreBackend::Remote => match &self.files_url {
                None => {
                    return Err(
                        "Remote store needs a base URL. Set --files-url or IIIF_FILES_URL"
                            .to_string(),
                    );
                }
                Some(url) => {
                    Url::parse(url).map_err(|e| format!("Invalid files URL '{}': {}", url, e))?;
                }
            },
        }

        if self.serve_local_files && self.store == StoreBackend::Remote {
            return Err("serve_local_files requires the local store".to_string());
        }

        if let Some(ref url) = self.public_url {
            let parsed =
                Url::parse(url).map_err(|e| format!("Invalid public URL '{}': {}", url, e))?;
            if parsed.cannot_be_a_base() {
                return Err(format!("Public URL '{}' cannot be used as a base", url));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the file store described by this configuration.
    pub fn file_store(&self) -> Result<FileStore, String> {
        match self.store {
            StoreBackend::Local => self
                .files_path
                .as_ref()
                .map(FileStore::local)
                .ok_or_else(|| "Local store needs a base path".to_string()),
            StoreBackend::Remote => {
                let url = self
                    .files_url
                    .as_deref()
                    .ok_or_else(|| "Remote store needs a base URL".to_string())?;
                let url = Url::parse(url).map_err(|e| format!("Invalid files URL: {}", e))?;
                Ok(FileStore::remote(url))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
