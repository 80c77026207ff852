//! `info.json` capability documents.
//!
//! # Example Output (3.0)
//!
//! ```json
//! {
//!   "@context": "http://iiif.io/api/image/3/context.json",
//!   "id": "https://example.org/iiif/42",
//!   "@id": "https://example.org/iiif/42",
//!   "type": "ImageService3",
//!   "protocol": "http://iiif.io/api/image",
//!   "profile": "level0",
//!   "width": 2048,
//!   "height": 1536,
//!   "preferredFormats": ["jpg"],
//!   "extraFeatures": ["baseUriRedirect", "cors", "jsonldMediaType"]
//! }
//! ```
//!
//! # Example Output (2.1)
//!
//! ```json
//! {
//!   "@context": "http://iiif.io/api/image/2/context.json",
//!   "@id": "https://example.org/iiif/42",
//!   "protocol": "http://iiif.io/api/image",
//!   "width": 2048,
//!   "height": 1536,
//!   "profile": [
//!     "http://iiif.io/api/image/2/level0.json",
//!     {
//!       "formats": ["jpg"],
//!       "qualities": ["default"],
//!       "supports": ["baseUriRedirect", "cors", "jsonldMediaType"]
//!     }
//!   ]
//! }
//! ```
//!
//! Width and height are omitted when the dimensions are unknown.

use serde::Serialize;

use crate::media::{ImageDimensions, MediaRef};

use super::negotiate::{ApiVersion, CONTEXT_V2, CONTEXT_V3};

/// Protocol URI shared by all Image API versions.
pub const IIIF_PROTOCOL: &str = "http://iiif.io/api/image";

/// Compliance level 0 profile of the Image API 2.x.
pub const LEVEL0_PROFILE_V2: &str = "http://iiif.io/api/image/2/level0.json";

/// Features supported on top of level 0.
pub const EXTRA_FEATURES: [&str; 3] = ["baseUriRedirect", "cors", "jsonldMediaType"];

const LEVEL0_PROFILE_V3: &str = "level0";
const SERVICE_TYPE_V3: &str = "ImageService3";
const DEFAULT_QUALITY: &str = "default";

/// Image API 3.0 info document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoDocumentV3 {
    #[serde(rename = "@context")]
    pub context: &'static str,

    pub id: String,

    /// Same value as `id`, for clients reading the 2.x key
    #[serde(rename = "@id")]
    pub legacy_id: String,

    #[serde(rename = "type")]
    pub service_type: &'static str,

    pub protocol: &'static str,

    pub profile: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preferred_formats: Vec<String>,

    pub extra_features: Vec<&'static str>,
}

/// Profile description entry of a 2.1 info document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDescriptionV2 {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<String>,

    pub qualities: Vec<&'static str>,

    pub supports: Vec<&'static str>,
}

/// Image API 2.1 info document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoDocumentV2 {
    #[serde(rename = "@context")]
    pub context: &'static str,

    #[serde(rename = "@id")]
    pub id: String,

    pub protocol: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Compliance level URI followed by the profile description
    pub profile: (&'static str, ProfileDescriptionV2),
}

/// A version-specific info document, serialized as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InfoDocument {
    V2(InfoDocumentV2),
    V3(InfoDocumentV3),
}

impl InfoDocument {
    pub fn version(&self) -> ApiVersion {
        match self {
            InfoDocument::V2(_) => ApiVersion::V2,
            InfoDocument::V3(_) => ApiVersion::V3,
        }
    }

    pub fn context(&self) -> &'static str {
        match self {
            InfoDocument::V2(doc) => doc.context,
            InfoDocument::V3(doc) => doc.context,
        }
    }

    /// Canonical image service URI.
    pub fn id(&self) -> &str {
        match self {
            InfoDocument::V2(doc) => &doc.id,
            InfoDocument::V3(doc) => &doc.id,
        }
    }

    /// Whether width and height are present.
    pub fn has_dimensions(&self) -> bool {
        match self {
            InfoDocument::V2(doc) => doc.width.is_some() && doc.height.is_some(),
            InfoDocument::V3(doc) => doc.width.is_some() && doc.height.is_some(),
        }
    }

    /// Response content type.
    ///
    /// 3.0 is always served as JSON-LD. 2.1 is JSON-LD only when the client
    /// asked for it, plain JSON otherwise.
    pub fn content_type(&self, json_ld_requested: bool) -> String {
        match self {
            InfoDocument::V3(_) => json_ld_content_type(CONTEXT_V3),
            InfoDocument::V2(_) if json_ld_requested => json_ld_content_type(CONTEXT_V2),
            InfoDocument::V2(_) => "application/json".to_string(),
        }
    }
}

fn json_ld_content_type(context: &str) -> String {
    format!("application/ld+json;profile=\"{}\"", context)
}

/// Builds info documents for media records.
#[derive(Debug, Clone, Copy)]
pub struct InfoBuilder {
    default_version: ApiVersion,
}

impl Default for InfoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InfoBuilder {
    /// Builder falling back to 2.1 for unspecified requests.
    pub fn new() -> Self {
        Self {
            default_version: ApiVersion::V2,
        }
    }

    /// Builder falling back to `version` for unspecified requests.
    ///
    /// Passing [`ApiVersion::Unspecified`] keeps the 2.1 fallback.
    pub fn with_default_version(version: ApiVersion) -> Self {
        Self {
            default_version: version.or(ApiVersion::V2),
        }
    }

    pub fn default_version(&self) -> ApiVersion {
        self.default_version
    }

    /// Concrete version served for a negotiated one.
    pub fn resolve(&self, requested: ApiVersion) -> ApiVersion {
        requested.or(self.default_version)
    }

    /// Build the info document of `media`.
    ///
    /// `service_id` is the canonical base URI of the image (the info URL
    /// without `/info.json`). Width and height are set only when
    /// `dimensions` is known.
    pub fn build(
        &self,
        media: &MediaRef,
        version: ApiVersion,
        service_id: &str,
        dimensions: Option<ImageDimensions>,
    ) -> InfoDocument {
        let formats: Vec<String> = media
            .extension()
            .map(|ext| vec![ext.to_ascii_lowercase()])
            .unwrap_or_default();
        let width = dimensions.map(|d| d.width);
        let height = dimensions.map(|d| d.height);

        match self.resolve(version) {
            ApiVersion::V3 => InfoDocument::V3(InfoDocumentV3 {
                context: CONTEXT_V3,
                id: service_id.to_string(),
                legacy_id: service_id.to_string(),
                service_type: SERVICE_TYPE_V3,
                protocol: IIIF_PROTOCOL,
                profile: LEVEL0_PROFILE_V3,
                width,
                height,
                preferred_formats: formats,
                extra_features: EXTRA_FEATURES.to_vec(),
            }),
            _ => InfoDocument::V2(InfoDocumentV2 {
                context: CONTEXT_V2,
                id: service_id.to_string(),
                protocol: IIIF_PROTOCOL,
                width,
                height,
                profile: (
                    LEVEL0_PROFILE_V2,
                    ProfileDescriptionV2 {
                        formats,
                        qualities: vec![DEFAULT_QUALITY],
                        supports: EXTRA_FEATURES.to_vec(),
                    },
                ),
            }),
        }
    }
}
