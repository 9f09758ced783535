//! A DOM-backed host with no display and no printer.
//!
//! [`HeadlessHost`] runs the full pipeline against an in-memory document:
//! - **Frames** - each surface gets its own [`DomTree`]
//! - **Stylesheets** - same-origin sheets are fetched over HTTP, others are
//!   reported as cross-origin
//! - **Images** - each load attempt is fetched and decoded by an
//!   [`ImageProbe`], with `crossorigin="anonymous"` enforced
//! - **Printing** - the serialized surface document is appended to a spool
//!
//! Load and after-print signals fire immediately.

use crate::host::{ImageRequest, PrintHost, StylesheetError};
use printframe_common::net::{self, FetchError};
use printframe_common::url::{origin, same_origin};
use printframe_dom::{DomTree, NodeId};
use printframe_resource::{ImageProbe, ProbeError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One spooled print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintedDocument {
    /// The surface frame that was printed.
    pub frame: NodeId,
    /// The surface document's title.
    pub title: Option<String>,
    /// The surface document serialized as HTML.
    pub html: String,
}

/// Error type for headless host construction.
#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    /// The base URL has no tuple origin.
    #[error("base URL '{0}' has no origin")]
    OpaqueOrigin(String),
    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] FetchError),
    /// The image probe could not be built.
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// An in-memory [`PrintHost`].
pub struct HeadlessHost {
    document: Rc<RefCell<DomTree>>,
    base_url: String,
    client: reqwest::Client,
    probe: ImageProbe,
    frames: RefCell<HashMap<NodeId, Rc<RefCell<DomTree>>>>,
    image_requests: RefCell<Vec<ImageRequest>>,
    spool: RefCell<Vec<PrintedDocument>>,
}

impl HeadlessHost {
    /// Host `document` as if it was loaded from `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` is not an absolute URL with a host,
    /// or the HTTP client cannot be created.
    pub fn new(document: DomTree, base_url: &str) -> Result<Self, HeadlessError> {
        let document_origin =
            origin(base_url).ok_or_else(|| HeadlessError::OpaqueOrigin(base_url.to_string()))?;
        let probe = ImageProbe::new(&document_origin)?;
        Ok(Self {
            document: Rc::new(RefCell::new(document)),
            base_url: base_url.to_string(),
            client: net::client()?,
            probe,
            frames: RefCell::new(HashMap::new()),
            image_requests: RefCell::new(Vec::new()),
            spool: RefCell::new(Vec::new()),
        })
    }

    /// Every print job so far, oldest first.
    #[must_use]
    pub fn printed(&self) -> Vec<PrintedDocument> {
        self.spool.borrow().clone()
    }

    /// Every image load attempt so far, oldest first.
    #[must_use]
    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests.borrow().clone()
    }

    /// Number of frames opened and not yet closed.
    #[must_use]
    pub fn open_frames(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl PrintHost for HeadlessHost {
    fn document(&self) -> Rc<RefCell<DomTree>> {
        Rc::clone(&self.document)
    }

    fn base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }

    fn open_frame(&self, frame: NodeId) -> Option<Rc<RefCell<DomTree>>> {
        let content = Rc::new(RefCell::new(DomTree::new()));
        let _ = self
            .frames
            .borrow_mut()
            .insert(frame, Rc::clone(&content));
        Some(content)
    }

    fn close_frame(&self, frame: NodeId) {
        let _ = self.frames.borrow_mut().remove(&frame);
    }

    async fn stylesheet_text(&self, href: &str) -> Result<String, StylesheetError> {
        if !same_origin(href, &self.base_url) {
            return Err(StylesheetError::CrossOrigin);
        }
        net::fetch_text(&self.client, href)
            .await
            .map_err(|e| StylesheetError::Unavailable(e.to_string()))
    }

    async fn frame_loaded(&self, _frame: NodeId) {}

    async fn load_image(&self, request: &ImageRequest) -> anyhow::Result<()> {
        self.image_requests.borrow_mut().push(request.clone());
        let _ = self.probe.probe(&request.url, request.cors).await?;
        Ok(())
    }

    fn print(&self, frame: NodeId, document: &DomTree) -> anyhow::Result<()> {
        let job = PrintedDocument {
            frame,
            title: document.title(),
            html: document.to_html(NodeId::ROOT),
        };
        tracing::info!(frame = frame.0, title = ?job.title, bytes = job.html.len(), "document spooled");
        self.spool.borrow_mut().push(job);
        Ok(())
    }

    async fn after_print(&self, _frame: NodeId) {}
}
