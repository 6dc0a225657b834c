use crate::error::ViewError;
use crate::scan::matcher::{reconcile, Reconciliation, DEFAULT_TOLERANCE};
use crate::scan::scan_model::{Element, ElementId};
use crate::scan::source_tree::{NodeId, SourceNode, SourceTree};

use super::renderer::ViewRenderer;

pub const GLYPH_OPEN: char = '▼';
pub const GLYPH_COLLAPSED: char = '►';

const MAX_ATTRIBUTE_LEN: usize = 100;

/// One row of the source tree panel, indexed by its node id.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub node: NodeId,
    pub depth: usize,
    /// `<tag attr="value">`, or `<tag ... />` for leaves.
    pub label: String,
    /// `</tag>` for nodes with children.
    pub closing_label: Option<String>,
    pub element_id: Option<ElementId>,
    pub expanded: bool,
    /// `None` for leaves.
    pub glyph: Option<char>,
    pub active: bool,
}

/// Hierarchical source panel with expand/collapse.
#[derive(Debug)]
pub struct TreeRenderer {
    tree: SourceTree,
    rows: Vec<TreeRow>,
    reconciliation: Reconciliation,
    tolerance: f64,
    visible: bool,
    active: Option<NodeId>,
    scrolled_to: Option<NodeId>,
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl TreeRenderer {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tree: SourceTree::empty(),
            rows: Vec::new(),
            reconciliation: Reconciliation::default(),
            tolerance,
            visible: false,
            active: None,
            scrolled_to: None,
        }
    }

    /// Replace the source document. Rows are rebuilt on the next `render`.
    pub fn load_source(&mut self, tree: SourceTree) {
        self.tree = tree;
        self.rows.clear();
        self.reconciliation = Reconciliation::default();
        self.active = None;
        self.scrolled_to = None;
    }

    pub fn source(&self) -> &SourceTree {
        &self.tree
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn row(&self, node: NodeId) -> Option<&TreeRow> {
        self.rows.get(node.0)
    }

    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn active_node(&self) -> Option<NodeId> {
        self.active
    }

    pub fn scrolled_to(&self) -> Option<NodeId> {
        self.scrolled_to
    }

    /// Element matched to a row, used when a row is clicked.
    pub fn element_at(&self, node: NodeId) -> Option<ElementId> {
        self.row(node).and_then(|r| r.element_id)
    }

    /// Flip a container row. Returns the new expanded state, or `None` for
    /// leaves and unknown nodes.
    pub fn toggle(&mut self, node: NodeId) -> Option<bool> {
        let row = self.rows.get_mut(node.0)?;
        row.glyph?;
        let expanded = !row.expanded;
        set_expanded(row, expanded);
        Some(row.expanded)
    }

    /// A row is shown when every ancestor is expanded.
    pub fn is_row_shown(&self, node: NodeId) -> bool {
        self.tree
            .ancestors(node)
            .iter()
            .all(|a| self.rows.get(a.0).is_some_and(|r| r.expanded))
    }

    /// Open every collapsed ancestor of `node` up to the root. Already-open
    /// ancestors are left as they are.
    fn expand_ancestors(&mut self, node: NodeId) {
        for ancestor in self.tree.ancestors(node) {
            if let Some(row) = self.rows.get_mut(ancestor.0) {
                if !row.expanded {
                    set_expanded(row, true);
                }
            }
        }
    }
}

fn set_expanded(row: &mut TreeRow, expanded: bool) {
    row.expanded = expanded;
    row.glyph = Some(if expanded { GLYPH_OPEN } else { GLYPH_COLLAPSED });
}

fn row_label(node: &SourceNode) -> (String, Option<String>) {
    let mut label = format!("<{}", node.tag);
    for (key, value) in &node.attributes {
        let shown = if value.chars().count() > MAX_ATTRIBUTE_LEN {
            let cut: String = value.chars().take(MAX_ATTRIBUTE_LEN).collect();
            format!("{}...", cut)
        } else {
            value.clone()
        };
        label.push_str(&format!(" {}=\"{}\"", key, shown));
    }

    if node.has_children() {
        label.push('>');
        (label, Some(format!("</{}>", node.tag)))
    } else {
        label.push_str(" />");
        (label, None)
    }
}

impl ViewRenderer for TreeRenderer {
    fn name(&self) -> &'static str {
        "tree"
    }

    /// Re-run reconciliation against `elements`. Expand/collapse state
    /// survives when the rows already describe the loaded document.
    fn render(&mut self, elements: &[Element]) -> Result<(), ViewError> {
        self.reconciliation = reconcile(&self.tree, elements, self.tolerance);

        if self.rows.len() != self.tree.len() {
            self.rows = self
                .tree
                .iter()
                .map(|(id, node)| {
                    let (label, closing_label) = row_label(node);
                    TreeRow {
                        node: id,
                        depth: node.depth,
                        label,
                        closing_label,
                        element_id: None,
                        expanded: true,
                        glyph: node.has_children().then_some(GLYPH_OPEN),
                        active: false,
                    }
                })
                .collect();
            self.active = None;
        }

        for row in &mut self.rows {
            row.element_id = self.reconciliation.element_for(row.node);
        }

        if let Some(node) = self.active {
            if self.element_at(node).is_none() {
                if let Some(row) = self.rows.get_mut(node.0) {
                    row.active = false;
                }
                self.active = None;
            }
        }
        Ok(())
    }

    fn on_selection_changed(
        &mut self,
        new: Option<ElementId>,
        _old: Option<ElementId>,
    ) -> Result<(), ViewError> {
        if let Some(node) = self.active.take() {
            if let Some(row) = self.rows.get_mut(node.0) {
                row.active = false;
            }
        }

        let Some(id) = new else {
            return Ok(());
        };
        // Elements without a matching source node have no row to reveal.
        let Some(node) = self.reconciliation.node_for(id) else {
            return Ok(());
        };

        self.expand_ancestors(node);
        if let Some(row) = self.rows.get_mut(node.0) {
            row.active = true;
            self.active = Some(node);
            if self.visible {
                self.scrolled_to = Some(node);
            }
        }
        Ok(())
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active.and_then(|node| self.element_at(node))
    }

    fn clear(&mut self) {
        self.load_source(SourceTree::empty());
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
