use std::fmt;
use std::str::FromStr;

use http::header::ACCEPT;
use http::HeaderMap;

/// JSON-LD context of the IIIF Image API 3.0.
pub const CONTEXT_V3: &str = "http://iiif.io/api/image/3/context.json";

/// JSON-LD context of the IIIF Image API 2.x.
pub const CONTEXT_V2: &str = "http://iiif.io/api/image/2/context.json";

/// Markers searched in the `Accept` header, in precedence order.
///
/// Version 3 is checked first: a header naming both contexts selects 3.0.
const VERSION_MARKERS: [(&str, ApiVersion); 2] = [
    ("iiif.io/api/image/3/context.json", ApiVersion::V3),
    ("iiif.io/api/image/2/context.json", ApiVersion::V2),
];

/// IIIF Image API version requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    /// Image API 2.1
    V2,
    /// Image API 3.0
    V3,
    /// No recognized marker in the request
    #[default]
    Unspecified,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "2.1",
            ApiVersion::V3 => "3.0",
            ApiVersion::Unspecified => "unspecified",
        }
    }

    /// This version, or `default` when unspecified.
    pub fn or(self, default: ApiVersion) -> ApiVersion {
        match self {
            ApiVersion::Unspecified => default,
            version => version,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    /// Parses a concrete version; `unspecified` is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2" | "2.0" | "2.1" => Ok(ApiVersion::V2),
            "3" | "3.0" => Ok(ApiVersion::V3),
            other => Err(format!(
                "Unknown IIIF Image API version '{}' (expected 2.1 or 3.0)",
                other
            )),
        }
    }
}

/// Determine the requested API version from an `Accept` header value.
///
/// This is a case-sensitive substring match on the context URIs, not a
/// media-type parse. No match yields [`ApiVersion::Unspecified`].
pub fn negotiate(accept: &str) -> ApiVersion {
    VERSION_MARKERS
        .iter()
        .find(|(marker, _)| accept.contains(marker))
        .map(|(_, version)| *version)
        .unwrap_or(ApiVersion::Unspecified)
}

/// Determine the requested API version from all `Accept` headers.
pub fn negotiate_headers(headers: &HeaderMap) -> ApiVersion {
    negotiate(&accept_values(headers))
}

/// Whether the client explicitly asked for a JSON-LD response.
pub fn accepts_json_ld(headers: &HeaderMap) -> bool {
    accept_values(headers).contains("application/ld+json")
}

fn accept_values(headers: &HeaderMap) -> String {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join(",")
}
