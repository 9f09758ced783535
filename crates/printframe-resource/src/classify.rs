//! Resource type inference from URL shape.

use crate::{ResourceKind, TypeHint};
use printframe_common::url::{host, path};

/// File extensions printed as images.
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "tiff", "tif",
];

/// CDN and object-storage hosts. URLs on these default to image intent.
const CDN_HOSTS: &[&str] = &[
    "cloudinary.com",
    "imgix.net",
    "cloudfront.net",
    "s3.amazonaws.com",
    "storage.googleapis.com",
    "blob.core.windows.net",
];

/// Substrings suggesting an image-hosting URL.
const IMAGE_HINTS: &[&str] = &["image", "img", "photo"];

/// Infer what a normalized URL points at.
///
/// Decision order, first match wins:
/// 1. path extension is an image extension → [`ResourceKind::Image`]
/// 2. path extension is `pdf` → [`ResourceKind::Pdf`]
/// 3. CDN/object-storage host → `Pdf` if the URL mentions "pdf", else `Image`
/// 4. URL mentions "image", "img" or "photo" → `Image`
/// 5. Google Drive direct-download link → `Image`
/// 6. otherwise [`ResourceKind::Unknown`]
#[must_use]
pub fn classify_url(url: &str) -> ResourceKind {
    let lower = url.to_ascii_lowercase();

    match extension(&path(&lower)) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => return ResourceKind::Image,
        Some("pdf") => return ResourceKind::Pdf,
        _ => {}
    }

    let host = host(&lower).unwrap_or_default();
    if is_cdn_host(&host) {
        return if lower.contains("pdf") {
            ResourceKind::Pdf
        } else {
            ResourceKind::Image
        };
    }

    if IMAGE_HINTS.iter().any(|hint| lower.contains(hint)) {
        return ResourceKind::Image;
    }

    if host == "drive.google.com" && lower.contains("uc?") {
        return ResourceKind::Image;
    }

    ResourceKind::Unknown
}

/// Resolve the resource kind, honoring an explicit caller hint ahead of
/// inference. [`TypeHint::Auto`] defers to [`classify_url`].
#[must_use]
pub fn classify_with_hint(url: &str, hint: TypeHint) -> ResourceKind {
    match hint {
        TypeHint::Image => ResourceKind::Image,
        TypeHint::Pdf => ResourceKind::Pdf,
        TypeHint::Auto => classify_url(url),
    }
}

/// Final path segment's extension, without the dot.
fn extension(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

fn is_cdn_host(host: &str) -> bool {
    CDN_HOSTS
        .iter()
        .any(|cdn| host == *cdn || host.ends_with(&format!(".{cdn}")))
        || (host.starts_with("s3") && host.ends_with(".amazonaws.com"))
}
