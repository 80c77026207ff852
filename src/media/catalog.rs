//! JSON-file media catalog.
//!
//! A read-only [`MediaRepository`] loaded once at startup from a JSON array
//! of media records:
//!
//! ```json
//! [
//!   {
//!     "id": "42",
//!     "filename": "a1b2c3.jpg",
//!     "media_type": "image/jpeg",
//!     "original_url": "https://example.org/files/original/a1b2c3.jpg",
//!     "width": 2048,
//!     "height": 1536
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::error::{CatalogError, RepositoryError};

use super::{MediaRef, MediaRepository};

/// In-memory catalog of media records keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MediaCatalog {
    records: HashMap<String, MediaRef>,
}

impl MediaCatalog {
    /// Build a catalog from records, rejecting duplicate identifiers.
    pub fn from_records(
        records: impl IntoIterator<Item = MediaRef>,
    ) -> Result<Self, CatalogError> {
        let mut map = HashMap::new();
        for record in records {
            if map.contains_key(&record.id) {
                return Err(CatalogError::DuplicateId(record.id));
            }
            map.insert(record.id.clone(), record);
        }
        Ok(Self { records: map })
    }

    /// Load a catalog from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let records: Vec<MediaRef> =
            serde_json::from_slice(&data).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl MediaRepository for MediaCatalog {
    async fn read(&self, id: &str) -> Result<MediaRef, RepositoryError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })
    }
}
