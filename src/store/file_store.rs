use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use super::StorageLocator;

/// Kind of storage backend behind a [`FileStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Files on a filesystem reachable by this process
    Local,
    /// Files behind a remote object store or CDN
    Remote,
}

impl StoreKind {
    pub fn name(&self) -> &'static str {
        match self {
            StoreKind::Local => "local",
            StoreKind::Remote => "remote",
        }
    }
}

/// Where a [`StorageLocator`] points once resolved against a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocation {
    Path(PathBuf),
    Url(Url),
}

/// File store holding the media bytes.
///
/// Constructed once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub enum FileStore {
    /// Local filesystem rooted at `base_path`
    Local { base_path: PathBuf },

    /// Remote store whose objects live under `base_url`
    Remote { base_url: Url },
}

impl FileStore {
    /// Create a local store rooted at `base_path`.
    pub fn local(base_path: impl Into<PathBuf>) -> Self {
        FileStore::Local {
            base_path: base_path.into(),
        }
    }

    /// Create a remote store rooted at `base_url`.
    ///
    /// A trailing slash is added when missing so that joining a relative
    /// storage path keeps the last segment of the base.
    pub fn remote(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        FileStore::Remote { base_url }
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            FileStore::Local { .. } => StoreKind::Local,
            FileStore::Remote { .. } => StoreKind::Remote,
        }
    }

    /// Whether [`exists`](Self::exists) performs a real check.
    pub fn supports_preflight(&self) -> bool {
        self.kind() == StoreKind::Local
    }

    /// Build the locator of a file variant.
    pub fn locate(&self, variant_prefix: &str, filename: &str) -> StorageLocator {
        StorageLocator::new(variant_prefix, filename, None)
    }

    /// Resolve a locator to a filesystem path or a remote URL.
    pub fn resolve(&self, locator: &StorageLocator) -> Result<ResolvedLocation, url::ParseError> {
        match self {
            FileStore::Local { base_path } => {
                Ok(ResolvedLocation::Path(local_path(base_path, locator)))
            }
            FileStore::Remote { base_url } => {
                Ok(ResolvedLocation::Url(base_url.join(&locator.storage_path())?))
            }
        }
    }

    /// Filesystem path of a locator, for local stores only.
    pub fn local_path(&self, locator: &StorageLocator) -> Option<PathBuf> {
        match self {
            FileStore::Local { base_path } => Some(local_path(base_path, locator)),
            FileStore::Remote { .. } => None,
        }
    }

    /// Check that the located resource exists and is not empty.
    ///
    /// Local stores look at the filesystem. Remote stores never touch the
    /// local filesystem and always report `true`.
    pub async fn exists(&self, locator: &StorageLocator) -> bool {
        match self {
            FileStore::Local { base_path } => {
                let path = local_path(base_path, locator);
                match tokio::fs::metadata(&path).await {
                    Ok(meta) => meta.is_file() && meta.len() > 0,
                    Err(e) => {
                        debug!(path = %path.display(), "Stat failed: {}", e);
                        false
                    }
                }
            }
            FileStore::Remote { .. } => true,
        }
    }
}

fn local_path(base_path: &Path, locator: &StorageLocator) -> PathBuf {
    base_path.join(locator.storage_path())
}
