//! IIIF Image API protocol layer.
//!
//! - [`negotiate`] picks the API version a client asked for from its
//!   `Accept` header.
//! - [`InfoBuilder`] turns a media record into a version-correct
//!   `info.json` capability document.
//!
//! Both versions 2.1 and 3.0 are supported. The server never transforms
//! pixels, so the advertised compliance level is always level 0.

mod info;
mod negotiate;

pub use info::{
    InfoBuilder, InfoDocument, InfoDocumentV2, InfoDocumentV3, ProfileDescriptionV2,
    EXTRA_FEATURES, IIIF_PROTOCOL, LEVEL0_PROFILE_V2,
};
pub use negotiate::{
    accepts_json_ld, negotiate, negotiate_headers, ApiVersion, CONTEXT_V2, CONTEXT_V3,
};
