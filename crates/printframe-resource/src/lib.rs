//! External print resources: where they live and what they are.
//!
//! # Scope
//!
//! This crate provides:
//! - **Normalization** - [`normalize_url`] rewrites file-hosting share links
//!   (Google Drive, Dropbox, OneDrive) into directly fetchable URLs
//! - **Classification** - [`classify_url`] infers whether a URL points at an
//!   image, a PDF, or something unknown
//! - **Probing** - [`ImageProbe`] performs one image load the way an `<img>`
//!   element would, including the cross-origin check, for headless hosts

pub mod classify;
pub mod normalize;
pub mod probe;

pub use classify::{classify_url, classify_with_hint};
pub use normalize::normalize_url;
pub use probe::{ImageProbe, ProbeError, ProbedImage};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// What a print URL resolves to, as far as the surface builder cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    /// A raster or vector image, printed through an `<img>` element.
    Image,
    /// A PDF document, printed through the host's embedded viewer.
    Pdf,
    /// Nothing recognizable; the surface gets no media element.
    Unknown,
}

/// A caller-declared resource type, taking precedence over inference.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    /// Treat the resource as an image.
    Image,
    /// Treat the resource as a PDF.
    Pdf,
    /// Infer the type from the URL.
    #[default]
    Auto,
}

/// [§ 2.5.4 CORS settings attributes](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#cors-settings-attributes)
///
/// The `crossorigin` state of an image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum CorsMode {
    /// `crossorigin="anonymous"`: the response must opt in with
    /// `Access-Control-Allow-Origin`.
    Anonymous,
    /// No `crossorigin` attribute: a plain no-cors request.
    NoCors,
}
