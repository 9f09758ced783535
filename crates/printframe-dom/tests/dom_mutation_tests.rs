//! Tests for DOM tree mutation and cross-tree cloning.

use printframe_dom::{DomTree, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.create_element(tag)
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    assert_eq!(tree.children(parent).len(), 1);

    assert!(tree.remove_child(parent, child));

    assert_eq!(tree.children(parent).len(), 0);
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    assert!(tree.remove_child(parent, b));

    // a and c are siblings now
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_twice_is_noop() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "body");
    tree.append_child(NodeId::ROOT, parent);
    let frame = alloc_element(&mut tree, "iframe");
    tree.append_child(parent, frame);

    assert!(tree.remove_child(parent, frame));
    assert!(!tree.remove_child(parent, frame));
    assert!(tree.children(parent).is_empty());
}

#[test]
fn test_remove_child_of_wrong_parent_is_rejected() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "div");
    let b = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(NodeId::ROOT, b);
    let child = alloc_element(&mut tree, "span");
    tree.append_child(a, child);

    assert!(!tree.remove_child(b, child));
    assert_eq!(tree.parent(child), Some(a));
}

// ========== connectivity ==========

#[test]
fn test_detached_subtree_is_not_connected() {
    let mut tree = DomTree::new_html_document(None);
    let body = tree.body().unwrap();
    let section = alloc_element(&mut tree, "section");
    let inner = alloc_element(&mut tree, "p");
    tree.append_child(section, inner);

    assert!(!tree.is_connected(inner));
    tree.append_child(body, section);
    assert!(tree.is_connected(inner));
    tree.detach(section);
    assert!(!tree.is_connected(inner));
}

// ========== clone_subtree_into ==========

#[test]
fn test_clone_subtree_copies_attributes_and_text() {
    let mut live = DomTree::new_html_document(Some("App"));
    let body = live.body().unwrap();
    let card = alloc_element(&mut live, "div");
    let _ = live.set_attribute(card, "class", "card invoice");
    live.append_child(body, card);
    let heading = alloc_element(&mut live, "h1");
    live.append_child(card, heading);
    live.set_text_content(heading, "Total");
    let comment = live.alloc(NodeType::Comment("note".to_string()));
    live.append_child(card, comment);

    let mut surface = DomTree::new_html_document(None);
    let copy = live.clone_subtree_into(card, &mut surface).unwrap();
    let surface_body = surface.body().unwrap();
    surface.append_child(surface_body, copy);

    assert_eq!(
        surface.inner_html(surface_body),
        "<div class=\"card invoice\"><h1>Total</h1><!--note--></div>"
    );
    // The source stays untouched.
    assert_eq!(live.parent(card), Some(body));
    assert_eq!(live.text_content(card), "Total");
}

#[test]
fn test_title_roundtrip() {
    let mut doc = DomTree::new_html_document(None);
    assert_eq!(doc.title(), None);
    doc.set_title("  Quarterly   report ");
    assert_eq!(doc.title().as_deref(), Some("Quarterly report"));
    doc.set_title("Other");
    assert_eq!(doc.elements_by_tag_name(NodeId::ROOT, "title").len(), 1);
}
