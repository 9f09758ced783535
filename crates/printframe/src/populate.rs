//! Content stages: what goes into a surface and how to wait for it.
//!
//! A print session runs the same pipeline for every source. The parts that
//! differ between a cloned element and an external resource live behind
//! [`ContentStage`].

use crate::PrintError;
use crate::host::PrintHost;
use crate::session::PrintSession;
use crate::sync::{self, ImageLoad, ImageTarget, LoadPolicy};
use printframe_dom::{DomTree, NodeId};
use printframe_resource::{ResourceKind, TypeHint, classify_with_hint, normalize_url};
use std::time::Duration;

/// Longest wait for the surface `load` event of cloned content.
pub(crate) const ELEMENT_LOAD_FALLBACK: Duration = Duration::from_millis(100);

/// Teardown fallback after printing cloned content.
pub(crate) const ELEMENT_TEARDOWN_FALLBACK: Duration = Duration::from_millis(1000);

/// Render delay between an external resource loading and printing.
pub(crate) const RESOURCE_SETTLE: Duration = Duration::from_millis(200);

/// Teardown fallback after printing an external resource.
pub(crate) const RESOURCE_TEARDOWN_FALLBACK: Duration = Duration::from_millis(100);

/// Inline style of a printed image.
const IMAGE_STYLE: &str = "max-width: 100%; height: auto; display: block; margin: 0 auto";

/// Print rules added to image surfaces.
const IMAGE_PRINT_RULES: &str =
    "@media print { img { page-break-inside: avoid; max-width: 100%; height: auto; } }";

/// Inline style of an embedded PDF viewer.
const PDF_STYLE: &str = "width: 100%; height: 100vh";

/// The source-specific part of a print session.
pub(crate) trait ContentStage {
    /// Whether the live document's styles apply to this content.
    fn copies_ambient_styles(&self) -> bool;

    /// Rules appended after the caller's print styles.
    fn style_rules(&self) -> Vec<String> {
        Vec::new()
    }

    /// Fill `body` of the surface document. Returns the element the
    /// synchronizer should wait on, if any.
    fn populate<H: PrintHost>(&self, host: &H, document: &mut DomTree, body: NodeId)
    -> Option<NodeId>;

    /// Wait until the populated surface is ready to print.
    async fn synchronize<H: PrintHost>(
        &self,
        host: &H,
        session: &mut PrintSession<'_, H>,
    ) -> Result<(), PrintError>;

    /// How long to wait for `afterprint` before tearing down anyway.
    fn teardown_fallback(&self) -> Duration;
}

/// A live element subtree, deep-copied into the surface.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ElementContent {
    pub(crate) node: NodeId,
}

impl ContentStage for ElementContent {
    fn copies_ambient_styles(&self) -> bool {
        true
    }

    fn populate<H: PrintHost>(
        &self,
        host: &H,
        document: &mut DomTree,
        body: NodeId,
    ) -> Option<NodeId> {
        let live = host.document();
        if let Some(copy) = live.borrow().clone_subtree_into(self.node, document) {
            document.append_child(body, copy);
        }
        None
    }

    async fn synchronize<H: PrintHost>(
        &self,
        host: &H,
        session: &mut PrintSession<'_, H>,
    ) -> Result<(), PrintError> {
        let load =
            sync::wait_for_frame_load(host, session.surface.frame(), ELEMENT_LOAD_FALLBACK).await;
        tracing::debug!(%load, "surface ready");
        Ok(())
    }

    fn teardown_fallback(&self) -> Duration {
        ELEMENT_TEARDOWN_FALLBACK
    }
}

/// An external image or PDF, embedded into a minimal document.
#[derive(Debug, Clone)]
pub(crate) struct ResourceContent {
    pub(crate) url: String,
    pub(crate) kind: ResourceKind,
    pub(crate) policy: LoadPolicy,
}

impl ResourceContent {
    /// Normalize `url` and settle its kind, `hint` first.
    pub(crate) fn new(url: &str, hint: TypeHint, policy: LoadPolicy) -> Self {
        let normalized = normalize_url(url);
        let kind = classify_with_hint(&normalized, hint);
        if normalized != url {
            tracing::debug!(from = url, to = %normalized, "share link normalized");
        }
        tracing::debug!(url = %normalized, %kind, %hint, "resource classified");
        Self {
            url: normalized,
            kind,
            policy,
        }
    }
}

impl ContentStage for ResourceContent {
    fn copies_ambient_styles(&self) -> bool {
        false
    }

    fn style_rules(&self) -> Vec<String> {
        match self.kind {
            ResourceKind::Image => vec![IMAGE_PRINT_RULES.to_string()],
            ResourceKind::Pdf | ResourceKind::Unknown => Vec::new(),
        }
    }

    fn populate<H: PrintHost>(
        &self,
        _host: &H,
        document: &mut DomTree,
        body: NodeId,
    ) -> Option<NodeId> {
        match self.kind {
            ResourceKind::Pdf => {
                // [§ 4.8.6 The embed element](https://html.spec.whatwg.org/multipage/iframe-embed-object.html#the-embed-element)
                let embed = document.create_element("embed");
                let _ = document.set_attribute(embed, "src", &self.url);
                let _ = document.set_attribute(embed, "type", "application/pdf");
                let _ = document.set_attribute(embed, "style", PDF_STYLE);
                document.append_child(body, embed);
                None
            }
            ResourceKind::Image => {
                let img = document.create_element("img");
                let _ = document.set_attribute(img, "crossorigin", "anonymous");
                let _ = document.set_attribute(img, "src", &self.url);
                let _ = document.set_attribute(img, "style", IMAGE_STYLE);
                document.append_child(body, img);
                Some(img)
            }
            ResourceKind::Unknown => {
                tracing::warn!(url = %self.url, "unrecognized resource type, printing without media");
                None
            }
        }
    }

    async fn synchronize<H: PrintHost>(
        &self,
        host: &H,
        session: &mut PrintSession<'_, H>,
    ) -> Result<(), PrintError> {
        if let Some(element) = session.media {
            let target = ImageTarget {
                document: session.surface.document(),
                element,
                url: &self.url,
            };
            if let ImageLoad::Loaded { retries } =
                sync::wait_for_image(host, &target, &self.policy).await?
            {
                session.retries = retries;
            }
        }
        sync::settle(RESOURCE_SETTLE).await;
        Ok(())
    }

    fn teardown_fallback(&self) -> Duration {
        RESOURCE_TEARDOWN_FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LoadPolicy {
        LoadPolicy {
            timeout: Duration::from_millis(5000),
            retry_attempts: 2,
            cache_bust: true,
        }
    }

    #[test]
    fn resource_content_normalizes_then_classifies() {
        let content = ResourceContent::new(
            "https://www.dropbox.com/s/xyz/file.png?dl=0",
            TypeHint::Auto,
            policy(),
        );
        assert_eq!(content.url, "https://dl.dropboxusercontent.com/s/xyz/file.png");
        assert_eq!(content.kind, ResourceKind::Image);
        assert_eq!(content.style_rules(), vec![IMAGE_PRINT_RULES.to_string()]);
    }

    #[test]
    fn hint_overrides_inferred_kind() {
        let content =
            ResourceContent::new("https://example.com/download?id=7", TypeHint::Pdf, policy());
        assert_eq!(content.kind, ResourceKind::Pdf);
        assert!(content.style_rules().is_empty());
        assert!(!content.copies_ambient_styles());
    }
}
