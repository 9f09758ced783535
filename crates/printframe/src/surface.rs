//! The isolated print surface.
//!
//! A surface is a zero-size, off-screen `<iframe>` attached to the live
//! document. Its content document is the print target; it never becomes
//! visible and does not take part in layout.

use crate::PrintError;
use crate::host::PrintHost;
use printframe_dom::{DomTree, NodeId};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Inline style collapsing the frame and moving it off-screen.
pub const FRAME_STYLE: &str =
    "position: absolute; width: 0; height: 0; border: none; left: -9999px; top: -9999px";

/// A live print surface.
///
/// [`destroy`](Self::destroy) removes the frame from the live document. Only
/// the first call has an effect, so competing cleanup triggers are harmless.
/// A surface created with `remove_on_drop` is also destroyed when dropped,
/// which covers every early-return path of a session.
pub struct Surface<'h, H: PrintHost> {
    host: &'h H,
    frame: NodeId,
    document: Rc<RefCell<DomTree>>,
    remove_on_drop: bool,
    destroyed: Cell<bool>,
}

impl<'h, H: PrintHost> Surface<'h, H> {
    /// Attach a new surface to the host's live document.
    ///
    /// The frame goes into `<body>`, or the document element when there is
    /// no body. Its content document is reset to an empty HTML skeleton with
    /// a UTF-8 `<meta charset>`.
    ///
    /// # Errors
    ///
    /// [`PrintError::SurfaceUnavailable`] when the host cannot provide the
    /// frame's content document. The frame is removed again before
    /// returning.
    pub fn create(host: &'h H, remove_on_drop: bool) -> Result<Self, PrintError> {
        let live = host.document();
        let frame = {
            let mut doc = live.borrow_mut();
            let frame = doc.create_element("iframe");
            let _ = doc.set_attribute(frame, "style", FRAME_STYLE);
            let _ = doc.set_attribute(frame, "aria-hidden", "true");
            let _ = doc.set_attribute(frame, "tabindex", "-1");
            let parent = doc
                .body()
                .or_else(|| doc.document_element())
                .unwrap_or(NodeId::ROOT);
            doc.append_child(parent, frame);
            frame
        };

        let Some(document) = host.open_frame(frame) else {
            remove_frame(host, frame);
            return Err(PrintError::SurfaceUnavailable);
        };

        {
            let mut content = document.borrow_mut();
            *content = DomTree::new_html_document(None);
            if let Some(head) = content.head() {
                let meta = content.create_element("meta");
                let _ = content.set_attribute(meta, "charset", "utf-8");
                content.append_child(head, meta);
            }
        }

        tracing::debug!(frame = frame.0, "print surface attached");
        Ok(Self {
            host,
            frame,
            document,
            remove_on_drop,
            destroyed: Cell::new(false),
        })
    }

    /// The `<iframe>` element in the live document.
    #[must_use]
    pub const fn frame(&self) -> NodeId {
        self.frame
    }

    /// The frame's content document.
    #[must_use]
    pub const fn document(&self) -> &Rc<RefCell<DomTree>> {
        &self.document
    }

    /// Whether [`destroy`](Self::destroy) already ran.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Remove the frame from the live document and release it in the host.
    ///
    /// Returns `false` when the surface was already destroyed.
    pub fn destroy(&self) -> bool {
        if self.destroyed.replace(true) {
            return false;
        }
        remove_frame(self.host, self.frame);
        tracing::debug!(frame = self.frame.0, "print surface removed");
        true
    }
}

impl<H: PrintHost> Drop for Surface<'_, H> {
    fn drop(&mut self) {
        if self.remove_on_drop {
            let _ = self.destroy();
        }
    }
}

fn remove_frame<H: PrintHost>(host: &H, frame: NodeId) {
    {
        let live = host.document();
        let mut doc = live.borrow_mut();
        if let Some(parent) = doc.parent(frame) {
            let _ = doc.remove_child(parent, frame);
        }
    }
    host.close_frame(frame);
}
