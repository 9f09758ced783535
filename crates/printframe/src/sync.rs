//! Load synchronization.
//!
//! Every wait here is raced against a timer, because the events it waits
//! for may never be delivered. Losing futures are dropped, so a late event
//! after a timer fired has nothing left to resolve.

use crate::config::ResolvedOptions;
use crate::host::{ImageRequest, PrintHost};
use crate::PrintError;
use printframe_common::url::append_query_param;
use printframe_dom::{DomTree, NodeId};
use printframe_resource::CorsMode;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use strum_macros::Display;

/// Query parameter carrying the retry number on cache-busted reloads.
pub const RETRY_PARAM: &str = "_retry";

/// How the surface load wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FrameLoad {
    /// The frame's `load` event fired.
    Loaded,
    /// The fallback delay elapsed first.
    Fallback,
}

/// How an image load wait ended without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    /// The image fired `load` after `retries` reloads.
    Loaded {
        /// Reloads needed; zero when the first attempt loaded.
        retries: u32,
    },
    /// The load ceiling elapsed first. Printing proceeds regardless.
    TimedOut,
}

/// Retry and timeout policy for an external image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPolicy {
    /// Hard ceiling on the whole wait, retries included.
    pub timeout: Duration,
    /// Reloads after the initial attempt.
    pub retry_attempts: u32,
    /// Append [`RETRY_PARAM`] to reloaded URLs.
    pub cache_bust: bool,
}

impl From<&ResolvedOptions> for LoadPolicy {
    fn from(options: &ResolvedOptions) -> Self {
        Self {
            timeout: options.load_timeout,
            retry_attempts: options.retry_attempts,
            cache_bust: options.cache_bust_retries,
        }
    }
}

/// The `<img>` being loaded, inside a surface document.
#[derive(Debug, Clone)]
pub struct ImageTarget<'a> {
    /// The surface document holding the element.
    pub document: &'a Rc<RefCell<DomTree>>,
    /// The `<img>` element.
    pub element: NodeId,
    /// The resource URL before any cache busting.
    pub url: &'a str,
}

/// Wait for the frame's `load` event, or `fallback`, whichever comes first.
pub async fn wait_for_frame_load<H: PrintHost>(
    host: &H,
    frame: NodeId,
    fallback: Duration,
) -> FrameLoad {
    tokio::select! {
        () = host.frame_loaded(frame) => FrameLoad::Loaded,
        () = tokio::time::sleep(fallback) => FrameLoad::Fallback,
    }
}

/// Fixed delay for content that does not signal readiness.
pub async fn settle(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// [§ 4.8.4.3 Updating the image data](https://html.spec.whatwg.org/multipage/images.html#updating-the-image-data)
///
/// Load `target`, reloading it on `error` up to `policy.retry_attempts`
/// times. The first reload drops the `crossorigin` attribute, since some
/// hosts reject the CORS request but serve the plain one. With cache
/// busting on, reload `n` requests the URL with `_retry=n` appended.
///
/// The whole wait is bounded by `policy.timeout`. Reaching it resolves with
/// [`ImageLoad::TimedOut`] instead of failing.
///
/// # Errors
///
/// [`PrintError::ImageLoad`] when every attempt failed before the timeout.
pub async fn wait_for_image<H: PrintHost>(
    host: &H,
    target: &ImageTarget<'_>,
    policy: &LoadPolicy,
) -> Result<ImageLoad, PrintError> {
    tokio::select! {
        result = load_with_retries(host, target, policy) => result,
        () = tokio::time::sleep(policy.timeout) => {
            tracing::warn!(
                url = target.url,
                timeout_ms = u64::try_from(policy.timeout.as_millis()).unwrap_or(u64::MAX),
                "image load timed out, printing anyway"
            );
            Ok(ImageLoad::TimedOut)
        }
    }
}

async fn load_with_retries<H: PrintHost>(
    host: &H,
    target: &ImageTarget<'_>,
    policy: &LoadPolicy,
) -> Result<ImageLoad, PrintError> {
    let mut request = ImageRequest {
        url: target.url.to_string(),
        cors: CorsMode::Anonymous,
        attempt: 0,
    };

    loop {
        let err = match host.load_image(&request).await {
            Ok(()) => {
                tracing::debug!(url = %request.url, retries = request.attempt, "image loaded");
                return Ok(ImageLoad::Loaded {
                    retries: request.attempt,
                });
            }
            Err(err) => err,
        };

        if request.attempt >= policy.retry_attempts {
            return Err(PrintError::ImageLoad {
                url: request.url,
                attempts: request.attempt + 1,
                reason: format!("{err:#}"),
            });
        }

        request.attempt += 1;
        tracing::warn!(
            url = %request.url,
            retry = request.attempt,
            max = policy.retry_attempts,
            error = %err,
            "image failed to load, retrying"
        );
        if request.attempt == 1 {
            request.cors = CorsMode::NoCors;
        }
        request.url = if policy.cache_bust {
            append_query_param(target.url, RETRY_PARAM, &request.attempt.to_string())
        } else {
            target.url.to_string()
        };

        {
            let mut document = target.document.borrow_mut();
            if let Some(img) = document.as_element_mut(target.element) {
                let _ = img.attrs.remove("crossorigin");
            }
            let _ = document.set_attribute(target.element, "src", &request.url);
        }
    }
}
