/// Variant prefix under which original uploads are stored.
pub const ORIGINAL_PREFIX: &str = "original";

/// Relative location of one stored file: `(prefix, name, extension)`.
///
/// This is a pure value. It is turned into a filesystem path or a remote URL
/// by [`FileStore::resolve`](super::FileStore::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocator {
    prefix: String,
    name: String,
    extension: Option<String>,
}

impl StorageLocator {
    /// Create a locator.
    ///
    /// When `extension` is `None`, `name` is expected to already carry one.
    pub fn new(
        prefix: impl Into<String>,
        name: impl Into<String>,
        extension: Option<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
            extension: extension.filter(|ext| !ext.is_empty()),
        }
    }

    /// Locator for the original file of a media item.
    pub fn original(filename: impl Into<String>) -> Self {
        Self::new(ORIGINAL_PREFIX, filename, None)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Path relative to the store root, e.g. `original/a1b2.jpg`.
    pub fn storage_path(&self) -> String {
        match &self.extension {
            Some(ext) => format!("{}/{}.{}", self.prefix, self.name, ext),
            None => format!("{}/{}", self.prefix, self.name),
        }
    }
}
