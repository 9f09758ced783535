//! Style projection into a print surface.
//!
//! The surface head receives, in order:
//! 1. the live document's style sources in document order (when copying),
//! 2. the caller's print styles wrapped in `@media print`,
//! 3. rules contributed by the content stage,
//! 4. the baseline page rules.

use crate::host::{PrintHost, StylesheetError};
use printframe_common::url::resolve_url;
use printframe_common::warning::warn_once;
use printframe_dom::{DomTree, ElementData, NodeId, NodeType};

/// Appended last to every surface: no body margin, normalized page margin.
pub const BASELINE_STYLES: &str =
    "@media print { body { margin: 0; padding: 0; } @page { margin: 0.5cm; } }";

/// A style source found in the live document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// A `<style>` element and its text.
    Inline {
        /// The element's text content.
        css: String,
    },
    /// A `<link rel="stylesheet">` element.
    Linked {
        /// The `href` attribute, unresolved.
        href: String,
    },
}

/// [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
/// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Extract every style source from the tree, in document order.
#[must_use]
pub fn collect_style_sources(tree: &DomTree) -> Vec<StyleSource> {
    let mut sources = Vec::new();
    collect_recursive(tree, tree.root(), &mut sources);
    sources
}

fn collect_recursive(tree: &DomTree, id: NodeId, sources: &mut Vec<StyleSource>) {
    let Some(node) = tree.get(id) else { return };

    if let NodeType::Element(data) = &node.node_type {
        if data.is("link") && is_stylesheet_link(data) {
            // "The href attribute gives the address (a valid non-empty URL
            // potentially surrounded by spaces) of the linked resource."
            if let Some(href) = data.attrs.get("href") {
                let href = href.trim();
                if !href.is_empty() {
                    sources.push(StyleSource::Linked {
                        href: href.to_string(),
                    });
                }
            }
        } else if data.is("style") {
            sources.push(StyleSource::Inline {
                css: tree.text_content(id),
            });
        }
    }

    for &child in tree.children(id) {
        collect_recursive(tree, child, sources);
    }
}

/// "If the rel attribute's value contains the token stylesheet, then the
/// link is a stylesheet link." Tokens compare ASCII case-insensitively.
fn is_stylesheet_link(data: &ElementData) -> bool {
    data.attrs.get("rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}

/// Wrap `css` so it only applies under print media.
#[must_use]
pub fn print_media(css: &str) -> String {
    format!("@media print {{ {} }}", css.trim())
}

/// Which style blocks to build for a surface.
#[derive(Debug, Clone, Default)]
pub struct StylePlan {
    /// Project the live document's style sources.
    pub copy_ambient: bool,
    /// Caller print styles, unwrapped.
    pub print_styles: String,
    /// Content-stage rules, appended as they are.
    pub extra_rules: Vec<String>,
}

/// Read the live document's style sources and resolve linked sheets
/// through the host.
///
/// Unreadable sheets (cross-origin or unavailable) are skipped with a
/// warning, once per session; the remaining sheets keep their relative order.
pub async fn ambient_styles<H: PrintHost>(host: &H) -> Vec<String> {
    let sources = collect_style_sources(&host.document().borrow());
    let base_url = host.base_url();
    let mut blocks = Vec::with_capacity(sources.len());

    for source in sources {
        match source {
            StyleSource::Inline { css } => blocks.push(css),
            StyleSource::Linked { href } => {
                let url = resolve_url(&href, base_url.as_deref());
                match host.stylesheet_text(&url).await {
                    Ok(css) => blocks.push(css),
                    Err(StylesheetError::CrossOrigin) => {
                        let _ = warn_once(
                            "printframe styles",
                            &format!("skipping cross-origin stylesheet '{url}'"),
                        );
                    }
                    Err(err) => {
                        let _ = warn_once(
                            "printframe styles",
                            &format!("skipping stylesheet '{url}': {err}"),
                        );
                    }
                }
            }
        }
    }
    blocks
}

/// Build the surface's style blocks in projection order.
pub async fn build_style_blocks<H: PrintHost>(host: &H, plan: &StylePlan) -> Vec<String> {
    let mut blocks = if plan.copy_ambient {
        ambient_styles(host).await
    } else {
        Vec::new()
    };
    if !plan.print_styles.trim().is_empty() {
        blocks.push(print_media(&plan.print_styles));
    }
    blocks.extend(plan.extra_rules.iter().cloned());
    blocks.push(BASELINE_STYLES.to_string());
    blocks
}

/// Append one `<style>` element per block to the document head.
pub fn write_style_blocks(document: &mut DomTree, blocks: &[String]) {
    let Some(head) = document.head() else {
        tracing::debug!("surface document has no head, styles dropped");
        return;
    };
    for css in blocks {
        let style = document.create_element("style");
        let text = document.create_text(css);
        document.append_child(style, text);
        document.append_child(head, style);
    }
}
