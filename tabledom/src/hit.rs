use crate::document::{Document, NodeId};
use crate::event::EventKind;
use crate::layout::LayoutResult;

/// Find the deepest element listening for clicks at the given coordinates.
/// Returns None if no clickable element contains the point.
pub fn hit_test(
    layout: &LayoutResult,
    doc: &Document,
    root: NodeId,
    x: u16,
    y: u16,
) -> Option<NodeId> {
    hit_test_element(layout, doc, root, x, y, true)
}

/// Find any painted element at the given coordinates.
/// Returns the deepest element containing the point.
pub fn hit_test_any(
    layout: &LayoutResult,
    doc: &Document,
    root: NodeId,
    x: u16,
    y: u16,
) -> Option<NodeId> {
    hit_test_element(layout, doc, root, x, y, false)
}

fn hit_test_element(
    layout: &LayoutResult,
    doc: &Document,
    node: NodeId,
    x: u16,
    y: u16,
    clickable_only: bool,
) -> Option<NodeId> {
    let element = doc.get(node)?;

    // Containers like thead/tbody are not painted themselves; only skip
    // the subtree when the element has a rect that misses the point.
    if let Some(rect) = layout.get(node) {
        if !rect.contains(x, y) {
            return None;
        }
    }

    // Check children in reverse order (last painted = on top)
    for child in element.children().iter().rev() {
        if let Some(found) = hit_test_element(layout, doc, *child, x, y, clickable_only) {
            return Some(found);
        }
    }

    let painted_here = layout.get(node).is_some();
    if painted_here && (!clickable_only || element.listens_to(EventKind::Click)) {
        Some(node)
    } else {
        None
    }
}
