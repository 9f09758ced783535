//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Markup output for a [`DomTree`]. Print hosts hand the serialized surface
//! document to the native print facility, and tests compare against it.

use crate::{DomTree, NodeId, NodeType};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements can't have any contents."
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element ... then append the value of current node's
/// data IDL attribute literally."
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

impl DomTree {
    /// Serialize `id` and its descendants (the node's outer HTML).
    ///
    /// For the document node this is the whole document, prefixed with the
    /// HTML doctype. Attributes are written in name order so output is
    /// stable.
    #[must_use]
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if id == NodeId::ROOT {
            out.push_str("<!DOCTYPE html>");
        }
        self.serialize_node(id, false, &mut out);
        out
    }

    /// Serialize only the children of `id` (the node's inner HTML).
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let raw = self
            .as_element(id)
            .is_some_and(|e| RAW_TEXT_ELEMENTS.iter().any(|t| e.is(t)));
        let mut out = String::new();
        for &child in self.children(id) {
            self.serialize_node(child, raw, &mut out);
        }
        out
    }

    fn serialize_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.node_type {
            NodeType::Document => {
                for &child in &node.children {
                    self.serialize_node(child, false, out);
                }
            }
            NodeType::Element(data) => {
                out.push('<');
                out.push_str(&data.tag_name);
                let mut names: Vec<&String> = data.attrs.keys().collect();
                names.sort();
                for name in names {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(&data.attrs[name], true, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.iter().any(|t| data.is(t)) {
                    return;
                }

                let raw = RAW_TEXT_ELEMENTS.iter().any(|t| data.is(t));
                for &child in &node.children {
                    self.serialize_node(child, raw, out);
                }
                out.push_str("</");
                out.push_str(&data.tag_name);
                out.push('>');
            }
            NodeType::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    escape_into(text, false, out);
                }
            }
            NodeType::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrence of the "&" character by the string "&amp;".
/// Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
/// string "&nbsp;". If the algorithm was invoked in the attribute mode,
/// replace any occurrences of the """ character by the string "&quot;".
/// If the algorithm was not invoked in the attribute mode, replace any
/// occurrences of the "<" character by the string "&lt;", and any
/// occurrences of the ">" character by the string "&gt;"."
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
