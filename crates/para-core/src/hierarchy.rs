//! Element tree reconstruction from a flat parent-pointer table
//!
//! Nothing here caches a tree. Callers fetch the full element list of a type
//! for every expansion and derive one level at a time, so a changed store is
//! picked up on the next expansion.

use serde::Serialize;

use crate::models::{DpElement, ElId, ROOT_PARENT};

/// An element as one level of the tree, with derived expandability
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementNode<'a> {
    pub element: &'a DpElement,
    /// Struct/reference tag or at least one child in the snapshot
    pub expandable: bool,
}

/// The synthetic root element of a type (the one whose parent is the sentinel)
pub fn root_element(elements: &[DpElement]) -> Option<&DpElement> {
    elements.iter().find(|e| e.is_root())
}

/// Direct children of `parent_el_id`, in input order
///
/// Asking for [`ROOT_PARENT`] skips the synthetic root and yields its
/// children. Rows that name themselves as parent never appear as their own
/// child.
pub fn children(elements: &[DpElement], parent_el_id: ElId) -> Vec<ElementNode<'_>> {
    if parent_el_id == ROOT_PARENT {
        if let Some(root) = root_element(elements) {
            return children(elements, root.el_id);
        }
    }

    elements
        .iter()
        .filter(|e| e.parent_el_id == parent_el_id && e.el_id != parent_el_id)
        .map(|e| ElementNode {
            element: e,
            expandable: is_expandable(elements, e),
        })
        .collect()
}

/// Whether an element can be expanded further
pub fn is_expandable(elements: &[DpElement], element: &DpElement) -> bool {
    element.datatype.is_container() || has_child(elements, element.el_id)
}

fn has_child(elements: &[DpElement], el_id: ElId) -> bool {
    elements
        .iter()
        .any(|e| e.parent_el_id == el_id && e.el_id != el_id)
}

/// True if anything hangs below the synthetic root
pub fn has_children(elements: &[DpElement]) -> bool {
    !children(elements, ROOT_PARENT).is_empty()
}

/// Dotted element path below the root, e.g. `state.value`
///
/// The root itself maps to an empty path. Returns `None` for unknown ids and
/// for broken or cyclic parent chains.
pub fn element_path(elements: &[DpElement], el_id: ElId) -> Option<String> {
    let mut segments = Vec::new();
    let mut current = elements.iter().find(|e| e.el_id == el_id)?;

    for _ in 0..=elements.len() {
        if current.is_root() {
            segments.reverse();
            return Some(segments.join("."));
        }
        segments.push(current.canonical_name.as_str());
        current = elements
            .iter()
            .find(|e| e.el_id == current.parent_el_id && e.el_id != current.el_id)?;
    }

    None
}

/// Resolve a dotted element path below the root; empty path yields the root
pub fn find_by_path<'a>(elements: &'a [DpElement], path: &str) -> Option<&'a DpElement> {
    if path.is_empty() {
        return root_element(elements);
    }

    let mut parent = ROOT_PARENT;
    let mut found = None;
    for segment in path.split('.') {
        let node = children(elements, parent)
            .into_iter()
            .find(|n| n.element.canonical_name == segment)?;
        parent = node.element.el_id;
        found = Some(node.element);
    }
    found
}
