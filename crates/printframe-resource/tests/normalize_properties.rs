//! Property tests for share-link normalization.

use printframe_resource::{ResourceKind, classify_url, normalize_url};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

/// A URL assembled from the shapes normalization cares about.
#[derive(Debug, Clone)]
struct ShareLink(String);

impl Arbitrary for ShareLink {
    fn arbitrary(g: &mut Gen) -> Self {
        let hosts = [
            "drive.google.com",
            "www.dropbox.com",
            "dropbox.com",
            "dl.dropboxusercontent.com",
            "1drv.ms",
            "onedrive.live.com",
            "res.cloudinary.com",
            "bucket.s3.amazonaws.com",
            "example.com",
        ];
        let segments = ["file", "d", "s", "view", "ABC123", "x_y-z", "report.pdf", "cat.png", "embed"];
        let queries = ["", "dl=0", "dl=1", "usp=sharing", "rlkey=k&dl=0", "resid=9", "w=100"];

        let host = *g.choose(&hosts).unwrap_or(&"example.com");
        let depth = usize::arbitrary(g) % 5;
        let mut url = format!("https://{host}");
        for _ in 0..depth {
            url.push('/');
            url.push_str(g.choose(&segments).unwrap_or(&"x"));
        }
        let query = *g.choose(&queries).unwrap_or(&"");
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        Self(url)
    }
}

#[quickcheck]
fn normalization_is_idempotent(link: ShareLink) -> bool {
    let once = normalize_url(&link.0);
    normalize_url(&once) == once
}

#[quickcheck]
fn normalized_links_never_keep_dropbox_share_flags(link: ShareLink) -> bool {
    let normalized = normalize_url(&link.0);
    !(normalized.contains("dropbox") && (normalized.contains("dl=0") || normalized.contains("dl=1")))
}

#[quickcheck]
fn arbitrary_strings_without_known_hosts_pass_through(s: String) -> bool {
    let lower = s.to_ascii_lowercase();
    if ["drive.google.com", "dropbox", "1drv.ms", "onedrive.live.com"]
        .iter()
        .any(|h| lower.contains(h))
    {
        return true;
    }
    normalize_url(&s) == s
}

#[test]
fn test_normalize_then_classify_share_links() {
    let drive = normalize_url("https://drive.google.com/file/d/ABC123/view");
    assert_eq!(classify_url(&drive), ResourceKind::Image);

    let dropbox = normalize_url("https://www.dropbox.com/s/xyz/file.png?dl=0");
    assert_eq!(dropbox, "https://dl.dropboxusercontent.com/s/xyz/file.png");
    assert_eq!(classify_url(&dropbox), ResourceKind::Image);

    let pdf = normalize_url("https://www.dropbox.com/s/xyz/minutes.pdf?dl=1");
    assert_eq!(classify_url(&pdf), ResourceKind::Pdf);
}
