//! HTTP fetch utilities for headless print hosts.
//!
//! Provides thin async GET wrappers used by the stylesheet reader and the
//! image probe, plus `data:` URL decoding so inline images load the same
//! way remote ones do.
//!
//! [Fetch Standard](https://fetch.spec.whatwg.org/) CORS handling is reduced
//! to what a print surface observes: whether a request carried an `Origin`
//! header and what `Access-Control-Allow-Origin` came back.
use base64::Engine;
use std::time::Duration;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// Errors produced while fetching a resource.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be built or the request failed in transit.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
    /// A `data:` URL could not be decoded.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
}

/// A fetched response body with the headers print hosts care about.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    /// Raw response body.
    pub body: Vec<u8>,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// `Access-Control-Allow-Origin` header, if any.
    pub allow_origin: Option<String>,
}

/// A parsed `data:` URL that can be decoded into raw bytes.
///
/// [RFC 2397](https://www.rfc-editor.org/rfc/rfc2397)
pub struct DataUrl<'a> {
    /// The full raw `data:` URL string (e.g. `data:image/png;base64,...`).
    raw: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Wrap a raw data URL string.
    #[must_use]
    pub const fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// The declared media type, defaulting to `text/plain` per RFC 2397.
    #[must_use]
    pub fn media_type(&self) -> &'a str {
        let body = self.raw.trim_start_matches("data:");
        let metadata = body.split_once(',').map_or(body, |(m, _)| m);
        let media = metadata.split(';').next().unwrap_or_default();
        if media.is_empty() { "text/plain" } else { media }
    }

    /// Decode the data URL payload into raw bytes.
    ///
    /// Supports base64 and percent-encoded payloads.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if the URL has no payload separator or
    /// the payload is malformed.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        let body = self.raw.trim_start_matches("data:");
        let Some((metadata, data)) = body.split_once(',') else {
            return Err(FetchError::DataUrl("missing comma".to_string()));
        };

        if metadata.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            percent_decode(data)
        }
    }
}

/// [URL Standard § 1.3](https://url.spec.whatwg.org/#percent-decode)
fn percent_decode(input: &str) -> Result<Vec<u8>, FetchError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| FetchError::DataUrl(format!("bad percent escape at {i}")))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Build the shared HTTP client used by headless hosts.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn client() -> Result<reqwest::Client, FetchError> {
    Ok(reqwest::Client::builder()
        .timeout(TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Fetch `url`. When `origin` is given the request is sent in CORS mode
/// with an `Origin` header; otherwise it is a bare no-cors request.
///
/// # Errors
///
/// Returns an error if the request fails, the response has a non-success
/// status, or the body cannot be read.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    origin: Option<&str>,
) -> Result<Fetched, FetchError> {
    if url.starts_with("data:") {
        let data_url = DataUrl::new(url);
        return Ok(Fetched {
            body: data_url.decode()?,
            content_type: Some(data_url.media_type().to_string()),
            // Data URLs are same-origin with everything.
            allow_origin: Some("*".to_string()),
        });
    }

    let mut request = client.get(url);
    if let Some(origin) = origin {
        request = request.header(reqwest::header::ORIGIN, origin);
    }
    let response = request.send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let header = |name: reqwest::header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header(reqwest::header::CONTENT_TYPE);
    let allow_origin = header(reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN);

    let body = response.bytes().await?.to_vec();
    Ok(Fetched {
        body,
        content_type,
        allow_origin,
    })
}

/// Fetch a URL and return its body as text.
///
/// # Errors
///
/// Same as [`fetch`].
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let fetched = fetch(client, url, None).await?;
    Ok(String::from_utf8_lossy(&fetched.body).into_owned())
}
