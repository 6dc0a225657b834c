use std::collections::BTreeMap;

use crate::geometry::rect::Rect;

use super::scan_model::{Element, ElementId};
use super::source_tree::{NodeId, SourceTree};

/// Pixel tolerance at device resolution.
pub const DEFAULT_TOLERANCE: f64 = 15.0;

/// First element (in collection order) whose bounds agree with `target`:
/// both center offsets strictly below `tolerance`, both size differences
/// strictly below `2 * tolerance`. Deleted or bounds-less candidates are
/// skipped. `None` means the target has no interactive counterpart.
pub fn match_element(target: &Rect, candidates: &[Element], tolerance: f64) -> Option<ElementId> {
    let (tx, ty) = target.center();

    candidates
        .iter()
        .filter(|el| !el.deleted)
        .find(|el| match &el.bounds {
            Some(b) => {
                let (cx, cy) = b.center();
                (cx - tx).abs() < tolerance
                    && (cy - ty).abs() < tolerance
                    && (b.w - target.w).abs() < 2.0 * tolerance
                    && (b.h - target.h).abs() < 2.0 * tolerance
            }
            None => false,
        })
        .map(|el| el.id)
}

/// Source-node to element correlation for a whole tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub by_node: BTreeMap<NodeId, ElementId>,
    /// First node (document order) matched to each element.
    pub by_element: BTreeMap<ElementId, NodeId>,
}

impl Reconciliation {
    pub fn element_for(&self, node: NodeId) -> Option<ElementId> {
        self.by_node.get(&node).copied()
    }

    pub fn node_for(&self, element: ElementId) -> Option<NodeId> {
        self.by_element.get(&element).copied()
    }

    pub fn matched_count(&self) -> usize {
        self.by_node.len()
    }
}

/// Run `match_element` for every bounded node in the tree.
pub fn reconcile(tree: &SourceTree, elements: &[Element], tolerance: f64) -> Reconciliation {
    let mut result = Reconciliation::default();

    for (node_id, node) in tree.iter() {
        let Some(bounds) = &node.bounds else {
            continue;
        };
        if let Some(element_id) = match_element(bounds, elements, tolerance) {
            result.by_node.insert(node_id, element_id);
            result.by_element.entry(element_id).or_insert(node_id);
        }
    }

    result
}
