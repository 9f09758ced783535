//! Share-link normalization.
//!
//! File-hosting services hand out "share" links that render a viewer page
//! instead of the file itself. Printing needs the bytes, so known share
//! links are rewritten to the host's direct-content form. Anything not
//! recognized is returned byte-identical.

use url::Url;

/// Google Drive direct-download endpoint.
const DRIVE_DOWNLOAD: &str = "https://drive.google.com/uc?export=download&id=";

/// Dropbox's direct-content-serving domain.
const DROPBOX_CONTENT_HOST: &str = "dl.dropboxusercontent.com";

/// Hosts that already serve file bytes directly.
const PASS_THROUGH_HOSTS: &[&str] = &["s3.amazonaws.com", "cloudinary.com", "imgix.net"];

/// Rewrite a share link into a URL suitable for direct embedding.
///
/// Rules, first match wins:
/// 1. Google Drive links with a `/d/<id>` path segment become
///    `https://drive.google.com/uc?export=download&id=<id>`.
/// 2. Dropbox links move to `dl.dropboxusercontent.com` and lose their
///    `dl=0` / `dl=1` share flags; other query parameters are kept.
/// 3. OneDrive links without an `embed` marker get `embed=1` appended.
/// 4. Everything else passes through unchanged.
///
/// Normalizing an already-normalized URL is a no-op.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let Some(host) = parsed.host_str().map(str::to_ascii_lowercase) else {
        return url.to_string();
    };

    if host_matches(&host, "drive.google.com") {
        if let Some(id) = drive_file_id(parsed.path()) {
            return format!("{DRIVE_DOWNLOAD}{id}");
        }
        return url.to_string();
    }

    if host_matches(&host, "dropbox.com") || host == DROPBOX_CONTENT_HOST {
        return normalize_dropbox(parsed, &host, url);
    }

    if host_matches(&host, "1drv.ms") || host_matches(&host, "onedrive.live.com") {
        if url.contains("embed") {
            return url.to_string();
        }
        let mut embedded = parsed;
        let _ = embedded.query_pairs_mut().append_pair("embed", "1");
        return embedded.into();
    }

    if PASS_THROUGH_HOSTS.iter().any(|h| host_matches(&host, h)) || host.starts_with("s3-") {
        tracing::trace!(%host, "direct-content host, leaving URL as is");
    }

    url.to_string()
}

/// `host` is `domain` or one of its subdomains.
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Extract `<id>` from a `/d/<id>` path segment. The id is the run of
/// `[A-Za-z0-9_-]` characters after `/d/`.
fn drive_file_id(path: &str) -> Option<&str> {
    let start = path.find("/d/")? + "/d/".len();
    let rest = &path[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

fn normalize_dropbox(mut parsed: Url, host: &str, url: &str) -> String {
    let has_share_flag = parsed.query_pairs().any(|(k, v)| is_share_flag(&k, &v));
    if host == DROPBOX_CONTENT_HOST && !has_share_flag {
        return url.to_string();
    }

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, v)| !is_share_flag(k, v))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if parsed.set_host(Some(DROPBOX_CONTENT_HOST)).is_err() {
        return url.to_string();
    }
    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        let _ = parsed.query_pairs_mut().clear().extend_pairs(&kept);
    }
    parsed.into()
}

fn is_share_flag(key: &str, value: &str) -> bool {
    key == "dl" && (value == "0" || value == "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_share_link_becomes_download_link() {
        assert_eq!(
            normalize_url("https://drive.google.com/file/d/ABC123/view"),
            "https://drive.google.com/uc?export=download&id=ABC123"
        );
        assert_eq!(
            normalize_url("https://drive.google.com/file/d/a_b-9/view?usp=sharing"),
            "https://drive.google.com/uc?export=download&id=a_b-9"
        );
    }

    #[test]
    fn drive_link_without_file_id_is_untouched() {
        let url = "https://drive.google.com/drive/folders/xyz";
        assert_eq!(normalize_url(url), url);
    }

    #[test]
    fn dropbox_share_link_becomes_content_link() {
        assert_eq!(
            normalize_url("https://www.dropbox.com/s/xyz/file.png?dl=0"),
            "https://dl.dropboxusercontent.com/s/xyz/file.png"
        );
        assert_eq!(
            normalize_url("https://www.dropbox.com/scl/fi/abc/doc.pdf?rlkey=k1&dl=1"),
            "https://dl.dropboxusercontent.com/scl/fi/abc/doc.pdf?rlkey=k1"
        );
    }

    #[test]
    fn dropbox_keeps_valueless_parameters() {
        assert_eq!(
            normalize_url("https://www.dropbox.com/s/x/f.png?raw=&dl=0#top"),
            "https://dl.dropboxusercontent.com/s/x/f.png?raw=#top"
        );
    }

    #[test]
    fn onedrive_gets_embed_marker() {
        assert_eq!(
            normalize_url("https://1drv.ms/i/s!AbCd"),
            "https://1drv.ms/i/s!AbCd?embed=1"
        );
        assert_eq!(
            normalize_url("https://onedrive.live.com/redir?resid=1"),
            "https://onedrive.live.com/redir?resid=1&embed=1"
        );
        let embedded = "https://onedrive.live.com/embed?resid=1";
        assert_eq!(normalize_url(embedded), embedded);
    }

    #[test]
    fn unrelated_urls_pass_through_byte_identical() {
        for url in [
            "https://res.cloudinary.com/demo/image/upload/sample.jpg",
            "https://bucket.s3.amazonaws.com/report.pdf?X-Amz-Signature=abc",
            "https://example.com/notdropbox.com/x.png",
            "relative/path.png",
            "",
        ] {
            assert_eq!(normalize_url(url), url);
        }
    }

    #[test]
    fn lookalike_hosts_are_not_rewritten() {
        let url = "https://evildropbox.com/s/xyz/file.png?dl=0";
        assert_eq!(normalize_url(url), url);
    }
}
