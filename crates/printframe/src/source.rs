//! What gets printed.

use printframe_dom::{DomTree, NodeId};
use printframe_resource::TypeHint;
use std::cell::Cell;
use std::rc::Rc;

/// A caller-owned reference to a live element.
///
/// Clones share the same slot, so the caller can attach, move or clear the
/// reference after the print handle was created. The reference only counts
/// as resolved while the node is connected to the live document.
#[derive(Debug, Clone, Default)]
pub struct ElementRef(Rc<Cell<Option<NodeId>>>);

impl ElementRef {
    /// An empty reference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A reference pointing at `node`.
    #[must_use]
    pub fn attached_to(node: NodeId) -> Self {
        Self(Rc::new(Cell::new(Some(node))))
    }

    /// Point the reference at `node`, or clear it with `None`.
    pub fn set(&self, node: Option<NodeId>) {
        self.0.set(node);
    }

    /// The node currently referenced, attached or not.
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.0.get()
    }

    /// The referenced node if it is an element connected to `document`.
    #[must_use]
    pub fn resolve(&self, document: &DomTree) -> Option<NodeId> {
        self.current().filter(|&id| {
            id != NodeId::ROOT && document.as_element(id).is_some() && document.is_connected(id)
        })
    }
}

/// The content of a print request.
#[derive(Debug, Clone)]
pub enum PrintSource {
    /// Clone a live element subtree.
    Element(ElementRef),
    /// Print an external image or PDF.
    Url {
        /// The resource URL, possibly a share link.
        url: String,
        /// Caller-declared resource type.
        hint: TypeHint,
    },
}

impl PrintSource {
    /// An external resource whose type is inferred from the URL.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url {
            url: url.into(),
            hint: TypeHint::Auto,
        }
    }

    /// An external resource of a declared type.
    #[must_use]
    pub fn url_with_hint(url: impl Into<String>, hint: TypeHint) -> Self {
        Self::Url {
            url: url.into(),
            hint,
        }
    }
}

impl From<ElementRef> for PrintSource {
    fn from(element: ElementRef) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for PrintSource {
    fn from(url: &str) -> Self {
        Self::url(url)
    }
}

impl From<String> for PrintSource {
    fn from(url: String) -> Self {
        Self::url(url)
    }
}
