//! The environment a print session runs in.
//!
//! A print pipeline never touches a real browser or print spooler
//! directly. Everything it needs from the outside (the live document,
//! embedded documents, stylesheet reads, image loads, the native print
//! action and its after-print signal) goes through [`PrintHost`].

use printframe_dom::{DomTree, NodeId};
use printframe_resource::CorsMode;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Why a linked stylesheet's rules could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StylesheetError {
    /// [§ 6.4.2 The CSSStyleSheet interface](https://drafts.csswg.org/cssom/#the-cssstylesheet-interface)
    ///
    /// "If the origin-clean flag is unset, throw a SecurityError exception."
    #[error("cross-origin stylesheet rules are not readable")]
    CrossOrigin,
    /// The stylesheet could not be fetched or is otherwise unavailable.
    #[error("stylesheet unavailable: {0}")]
    Unavailable(String),
}

/// One attempt at loading an image into a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// The URL requested, cache-busting parameter included.
    pub url: String,
    /// The `crossorigin` state of the `<img>` for this attempt.
    pub cors: CorsMode,
    /// Zero for the initial load, then the retry number.
    pub attempt: u32,
}

/// The runtime a print session is embedded in.
///
/// All futures are awaited on a single-threaded executor. Futures that
/// model events ([`frame_loaded`](Self::frame_loaded),
/// [`after_print`](Self::after_print)) may never resolve; the pipeline
/// always races them against a timer.
#[allow(async_fn_in_trait)]
pub trait PrintHost {
    /// The live document.
    fn document(&self) -> Rc<RefCell<DomTree>>;

    /// The live document's base URL, for resolving relative stylesheet
    /// links.
    fn base_url(&self) -> Option<String>;

    /// [§ 4.8.5 The iframe element](https://html.spec.whatwg.org/multipage/iframe-embed-object.html#the-iframe-element)
    ///
    /// "When an iframe element element is inserted into a document whose
    /// browsing context is non-null, the user agent must run these steps:
    /// Create a new child navigable for element."
    ///
    /// Return the content document of the `<iframe>` just attached at
    /// `frame`, or `None` if it is not accessible.
    fn open_frame(&self, frame: NodeId) -> Option<Rc<RefCell<DomTree>>>;

    /// Release whatever the host holds for a removed frame.
    fn close_frame(&self, frame: NodeId);

    /// Read the rule text of the linked stylesheet at the absolute URL
    /// `href`.
    ///
    /// # Errors
    ///
    /// [`StylesheetError::CrossOrigin`] when the rules are not readable from
    /// the live document's origin.
    async fn stylesheet_text(&self, href: &str) -> Result<String, StylesheetError>;

    /// Resolve when the frame's `load` event fires.
    async fn frame_loaded(&self, frame: NodeId);

    /// Perform one image load. `Ok` models the `load` event.
    ///
    /// # Errors
    ///
    /// Any error models the image's `error` event.
    async fn load_image(&self, request: &ImageRequest) -> anyhow::Result<()>;

    /// Focus the frame and run the native print action on `document`.
    ///
    /// # Errors
    ///
    /// Returns an error when the print action cannot be started.
    fn print(&self, frame: NodeId, document: &DomTree) -> anyhow::Result<()>;

    /// Resolve when the frame's `afterprint` event fires.
    async fn after_print(&self, frame: NodeId);
}
