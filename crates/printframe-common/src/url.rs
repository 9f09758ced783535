//! URL utilities.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! Print sources arrive as arbitrary user strings (share links, CDN links,
//! relative paths), so nothing here rejects input: a string that does not
//! parse as an absolute URL simply yields `None` or is passed through.

use url::Url;

/// [URL Standard § 4.1](https://url.spec.whatwg.org/#concept-url-host)
///
/// The host of an absolute URL, ASCII-lowercased.
#[must_use]
pub fn host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_ascii_lowercase)
}

/// [HTML § 7.1.1 Origins](https://html.spec.whatwg.org/multipage/browsers.html#origin)
///
/// "A tuple origin consists of a scheme, a host, a port..."
///
/// Serialized as `scheme://host[:port]`. Opaque origins yield `None`.
#[must_use]
pub fn origin(url: &str) -> Option<String> {
    let origin = Url::parse(url).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Whether two URLs share a tuple origin. Relative URLs never match.
#[must_use]
pub fn same_origin(a: &str, b: &str) -> bool {
    match (origin(a), origin(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// [URL Standard § 4.1](https://url.spec.whatwg.org/#concept-url-path)
///
/// Strip query string (`?…`) and fragment identifier (`#…`) from a URL so
/// that the remaining path can be checked for a file extension.
#[must_use]
pub fn strip_url_decorations(url: &str) -> &str {
    let without_fragment = url.split_once('#').map_or(url, |(b, _)| b);
    without_fragment
        .split_once('?')
        .map_or(without_fragment, |(b, _)| b)
}

/// The path component of `url`, without query or fragment.
///
/// Strings that do not parse as absolute URLs are treated as a bare path.
#[must_use]
pub fn path(url: &str) -> String {
    Url::parse(url).map_or_else(
        |_| strip_url_decorations(url).to_string(),
        |parsed| parsed.path().to_string(),
    )
}

/// Append `key=value` to the query string. A fragment stays at the end.
///
/// Relative URLs are extended textually.
#[must_use]
pub fn append_query_param(url: &str, key: &str, value: &str) -> String {
    if let Ok(mut parsed) = Url::parse(url) {
        let _ = parsed.query_pairs_mut().append_pair(key, value);
        return parsed.into();
    }
    let (base, fragment) = url
        .split_once('#')
        .map_or((url, None), |(b, f)| (b, Some(f)));
    let separator = if base.contains('?') { '&' } else { '?' };
    let mut out = format!("{base}{separator}{key}={value}");
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// [§ 4.2.3 The base element](https://html.spec.whatwg.org/multipage/semantics.html#the-base-element)
/// [URL Standard](https://url.spec.whatwg.org/)
///
/// Resolve a potentially relative URL against a base URL.
///
/// # Algorithm
///
/// [§ 2.5 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
///
/// STEP 1: "If url is an absolute URL, return url."
///
/// STEP 2: "Otherwise, resolve url relative to base."
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1: Absolute hrefs are returned as written.
    if Url::parse(href).is_ok() {
        return href.to_string();
    }

    // STEP 2: Resolve relative URL against base.
    base_url
        .and_then(|base| Url::parse(base).ok())
        .and_then(|base| base.join(href).ok())
        .map_or_else(|| href.to_string(), Into::into)
}
