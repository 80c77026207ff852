//! Media records and the collaborators that provide them.
//!
//! The server never owns media metadata. It reads a [`MediaRef`] from a
//! [`MediaRepository`] on every request and asks an [`ImageMetadata`]
//! provider for pixel dimensions when building info documents.

mod catalog;
mod metadata;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;

pub use catalog::MediaCatalog;
pub use metadata::{ImageMetadata, StoreImageMetadata};

/// One stored media item, as reported by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Opaque stable identifier
    pub id: String,

    /// Stored file name, including the extension
    pub filename: String,

    /// MIME type of the stored file (e.g. "image/jpeg")
    pub media_type: String,

    /// Absolute URL of the original bytes.
    ///
    /// Empty when the record leaves the URL to the file store.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_url: String,

    /// Width in pixels, when the repository recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Height in pixels, when the repository recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl MediaRef {
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        media_type: impl Into<String>,
        original_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            media_type: media_type.into(),
            original_url: original_url.into(),
            width: None,
            height: None,
        }
    }

    /// Attach recorded pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Extension of the stored file name, without the dot.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
    }

    /// Whether `format` names the stored extension (ASCII case-insensitive).
    pub fn matches_format(&self, format: &str) -> bool {
        self.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(format))
    }

    /// Dimensions recorded by the repository, if both are known and non-zero.
    pub fn recorded_dimensions(&self) -> Option<ImageDimensions> {
        match (self.width, self.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => {
                Some(ImageDimensions { width, height })
            }
            _ => None,
        }
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Read-only access to media records.
///
/// Implementations are shared across concurrent requests.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Read the media record with the given identifier.
    ///
    /// Returns [`RepositoryError::NotFound`] when the identifier does not
    /// resolve.
    async fn read(&self, id: &str) -> Result<MediaRef, RepositoryError>;
}
