use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::ImageReader;
use tracing::{debug, warn};

use crate::store::{FileStore, StorageLocator};

use super::{ImageDimensions, MediaRef};

/// Provider of pixel dimensions for media items.
#[async_trait]
pub trait ImageMetadata: Send + Sync {
    /// Dimensions of the media's original image, or `None` when unknown.
    async fn dimensions(&self, media: &MediaRef) -> Option<ImageDimensions>;
}

/// Dimensions from the repository record, falling back to the image header
/// of the original file when the store is local.
///
/// Only the header is read; pixels are never decoded.
#[derive(Debug, Clone)]
pub struct StoreImageMetadata {
    store: FileStore,
}

impl StoreImageMetadata {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ImageMetadata for StoreImageMetadata {
    async fn dimensions(&self, media: &MediaRef) -> Option<ImageDimensions> {
        if let Some(dimensions) = media.recorded_dimensions() {
            return Some(dimensions);
        }

        let path = self
            .store
            .local_path(&StorageLocator::original(&media.filename))?;

        match tokio::task::spawn_blocking(move || read_header_dimensions(path)).await {
            Ok(dimensions) => dimensions,
            Err(e) => {
                warn!(media_id = %media.id, "Dimension probe task failed: {}", e);
                None
            }
        }
    }
}

fn read_header_dimensions(path: PathBuf) -> Option<ImageDimensions> {
    match probe(&path) {
        Ok((width, height)) => Some(ImageDimensions::new(width, height)),
        Err(e) => {
            debug!(path = %path.display(), "Could not read image header: {}", e);
            None
        }
    }
}

fn probe(path: &Path) -> Result<(u32, u32), image::ImageError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.into_dimensions()
}
