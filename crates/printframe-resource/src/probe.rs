//! Image probing: fetch, cross-origin check, and format sniffing.
//!
//! [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
//!
//! A headless host has no rendering engine to fire `load`/`error` on an
//! `<img>`, so [`ImageProbe`] reproduces the observable outcome of one load
//! attempt:
//!
//! 1. **Fetch** - HTTP or `data:` URL, with an `Origin` header in
//!    [`CorsMode::Anonymous`].
//! 2. **CORS check** - an anonymous request fails unless the response opts
//!    in with `Access-Control-Allow-Origin`.
//! 3. **Detect/Decode** - [`detect_format`] decides SVG vs raster; raster
//!    bytes must yield dimensions through the `image` crate.

use crate::CorsMode;
use printframe_common::net::{self, FetchError};
use std::io::Cursor;

/// Detected image format.
///
/// Only two variants are needed: the `image` crate handles raster sub-format
/// detection (PNG/JPEG/GIF/WebP/…) internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// SVG vector image.
    Svg,
    /// Raster image (PNG, JPEG, GIF, WebP, etc.).
    Raster,
}

/// The outcome of a successful probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedImage {
    /// Detected format.
    pub format: ImageFormat,
    /// Intrinsic `(width, height)` for raster images. SVG sizes depend on
    /// layout and are not computed.
    pub dimensions: Option<(u32, u32)>,
}

/// Why a single image load attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The request itself failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// An anonymous request got no matching `Access-Control-Allow-Origin`.
    #[error("cross-origin response from {url} not allowed for origin {origin}")]
    CorsBlocked {
        /// Requested URL.
        url: String,
        /// Origin the request was made from.
        origin: String,
    },
    /// The bytes are not a decodable image.
    #[error("could not decode image: {0}")]
    Decode(String),
}

/// Detect whether `bytes` represent an SVG or a raster image.
///
/// Uses a three-step strategy:
///
/// 1. **Extension check** - fast path for `.svg` in `url`.
/// 2. **Data URL MIME check** - `data:image/svg` prefix in `url`.
/// 3. **Magic-byte sniffing** - trims leading whitespace and checks the
///    first 256 bytes for `<?xml` or `<svg` prefixes.
/// 4. **Default** - [`ImageFormat::Raster`].
#[must_use]
pub fn detect_format(url: &str, bytes: &[u8]) -> ImageFormat {
    // 1. Extension check (.svg fast path)
    let path = printframe_common::url::strip_url_decorations(url);
    if std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    {
        return ImageFormat::Svg;
    }

    // 2. Data URL MIME check
    if url.starts_with("data:image/svg") {
        return ImageFormat::Svg;
    }

    // 3. Magic-byte sniffing - trim leading whitespace, inspect first 256 bytes
    let trimmed = bytes
        .iter()
        .skip_while(|&&b| b == b' ' || b == b'\t' || b == b'\n' || b == b'\r')
        .take(256)
        .copied()
        .collect::<Vec<u8>>();

    if trimmed.starts_with(b"<?xml") || trimmed.starts_with(b"<svg") {
        return ImageFormat::Svg;
    }

    // 4. Default
    ImageFormat::Raster
}

/// Performs single image load attempts on behalf of a headless host.
#[derive(Debug, Clone)]
pub struct ImageProbe {
    client: reqwest::Client,
    /// Origin of the document the image would be loaded into.
    document_origin: String,
}

impl ImageProbe {
    /// Create a probe for images loaded into a document at `document_origin`
    /// (e.g. `https://app.example.com`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(document_origin: &str) -> Result<Self, ProbeError> {
        Ok(Self {
            client: net::client()?,
            document_origin: document_origin.to_string(),
        })
    }

    /// Attempt one load of `url` in the given cross-origin mode.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the fetch fails, the cross-origin check
    /// rejects the response, or the bytes do not decode as an image.
    pub async fn probe(&self, url: &str, mode: CorsMode) -> Result<ProbedImage, ProbeError> {
        let origin = match mode {
            CorsMode::Anonymous => Some(self.document_origin.as_str()),
            CorsMode::NoCors => None,
        };
        let fetched = net::fetch(&self.client, url, origin).await?;

        if let Some(origin) = origin {
            let allowed = fetched
                .allow_origin
                .as_deref()
                .is_some_and(|allow| allow == "*" || allow.eq_ignore_ascii_case(origin));
            if !allowed && !printframe_common::url::same_origin(url, origin) {
                return Err(ProbeError::CorsBlocked {
                    url: url.to_string(),
                    origin: origin.to_string(),
                });
            }
        }

        match detect_format(url, &fetched.body) {
            ImageFormat::Svg => Ok(ProbedImage {
                format: ImageFormat::Svg,
                dimensions: None,
            }),
            ImageFormat::Raster => {
                let dimensions = image::ImageReader::new(Cursor::new(&fetched.body))
                    .with_guessed_format()
                    .map_err(|e| ProbeError::Decode(e.to_string()))?
                    .into_dimensions()
                    .map_err(|e| ProbeError::Decode(e.to_string()))?;
                tracing::debug!(url, width = dimensions.0, height = dimensions.1, "image probed");
                Ok(ProbedImage {
                    format: ImageFormat::Raster,
                    dimensions: Some(dimensions),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_detected_by_extension_mime_or_bytes() {
        assert_eq!(detect_format("https://a.com/logo.SVG?v=1", b""), ImageFormat::Svg);
        assert_eq!(detect_format("data:image/svg+xml;base64,AAAA", b""), ImageFormat::Svg);
        assert_eq!(
            detect_format("https://a.com/logo", b"\n  <svg xmlns='http://www.w3.org/2000/svg'/>"),
            ImageFormat::Svg
        );
        assert_eq!(
            detect_format("https://a.com/photo", &[0x89, b'P', b'N', b'G']),
            ImageFormat::Raster
        );
    }
}
