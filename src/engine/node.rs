//! Bound nodes - the units that tie document elements to model variables.
//!
//! Every bound node targets one element, reads one variable (plus an
//! optional sequence index), and carries one of a small set of kinds. Kind
//! behavior lives in the sibling modules; this module holds the shared shape,
//! the attribute-keyed constructors, and the capability dispatch
//! (`draw` / `update` / `update_style`).

use crate::doc::{attr, class, NodeId, Tree};
use crate::engine::{adjustable, display, plot, table};
use crate::engine::adjustable::{AdjustState, Bounds};
use crate::engine::plot::PlotState;
use crate::engine::table::TableState;
use crate::model::Model;
use crate::state::InteractionState;
use crate::types::NodeFlags;

// =============================================================================
// Node kinds
// =============================================================================

/// Behavior variant of a bound node.
#[derive(Debug)]
pub enum NodeKind {
    /// Passive value display.
    Display,
    /// Drag-adjustable value display.
    Adjustable(AdjustState),
    /// Sequence variable rendered one row per element; grows child nodes.
    Table(TableState),
    /// Grouped bar plot over a category axis and one or more series.
    Plot(PlotState),
}

// =============================================================================
// BoundNode
// =============================================================================

/// One binding between a document element and a model variable.
#[derive(Debug)]
pub struct BoundNode {
    pub el: NodeId,
    pub variable: String,
    pub idx: Option<usize>,
    pub format: Option<String>,
    pub flags: NodeFlags,
    pub kind: NodeKind,
}

impl BoundNode {
    /// Shared attribute parse for `data-id` bindings.
    fn common(tree: &Tree, el: NodeId) -> Option<(String, Option<usize>, Option<String>)> {
        let variable = tree.data(el, attr::ID)?.to_string();
        let idx = tree.data(el, attr::IDX).and_then(|v| v.parse().ok());
        let format = tree.data(el, attr::FORMAT).map(str::to_string);
        Some((variable, idx, format))
    }

    /// Construct a passive display node from its element attributes.
    pub fn new_display(tree: &Tree, el: NodeId) -> Option<BoundNode> {
        let (variable, idx, format) = Self::common(tree, el)?;
        Some(BoundNode {
            el,
            variable,
            idx,
            format,
            flags: NodeFlags::NONE,
            kind: NodeKind::Display,
        })
    }

    /// Construct a drag-adjustable node. Requires `data-min`/`max`/`step`;
    /// an adjustable marker without bounds is a contract violation and falls
    /// back to a passive display.
    pub fn new_adjustable(tree: &Tree, el: NodeId) -> Option<BoundNode> {
        let (variable, idx, format) = Self::common(tree, el)?;
        let Some(bounds) = Bounds::from_attrs(tree, el) else {
            debug_assert!(false, "adjustable element without data-min/max/step");
            return Self::new_display(tree, el);
        };
        Some(BoundNode {
            el,
            variable,
            idx,
            format,
            flags: NodeFlags::ADJUSTABLE,
            kind: NodeKind::Adjustable(AdjustState::new(bounds)),
        })
    }

    /// Every variable this node depends on. Plots depend on their axis and
    /// all series; other kinds on their single bound variable.
    pub fn variables(&self) -> Vec<String> {
        match &self.kind {
            NodeKind::Plot(st) => {
                let mut vars = vec![self.variable.clone()];
                vars.extend(st.series.iter().cloned());
                vars
            }
            _ => vec![self.variable.clone()],
        }
    }

    /// Whether this node currently claims the shared highlight: its own drag,
    /// or its own hover while nothing anywhere is dragging.
    pub fn is_active(&self, interaction: &InteractionState) -> bool {
        let hover_active = self.flags.contains(NodeFlags::HOVERING) && !interaction.is_dragging();
        match self.kind {
            NodeKind::Adjustable(_) => self.flags.contains(NodeFlags::DRAGGING) || hover_active,
            _ => hover_active,
        }
    }

    /// Full re-render. Idempotent; one-time setup runs exactly once.
    ///
    /// Table nodes are grown by the registry, which owns the arena their
    /// child nodes register into.
    pub fn draw(&mut self, model: &Model, tree: &mut Tree) {
        match &self.kind {
            NodeKind::Display | NodeKind::Adjustable(_) => display::draw(self, model, tree),
            NodeKind::Plot(_) => plot::draw(self, model, tree),
            NodeKind::Table(_) => {}
        }
    }

    /// Incremental re-render assuming structure already exists.
    pub fn update(&mut self, model: &Model, tree: &mut Tree) {
        match &self.kind {
            NodeKind::Display | NodeKind::Adjustable(_) => display::draw(self, model, tree),
            NodeKind::Plot(_) => plot::update(self, model, tree),
            // Incremental updates are delegated entirely to the per-cell
            // child nodes already registered.
            NodeKind::Table(_) => {}
        }
    }

    /// Visual highlight toggle for a (variable, idx) hover/drag change.
    pub fn update_style(
        &self,
        active: bool,
        variable: &str,
        idx: Option<usize>,
        tree: &mut Tree,
        interaction: &InteractionState,
    ) {
        match &self.kind {
            NodeKind::Display => display::update_style(self, active, tree),
            NodeKind::Adjustable(_) => adjustable::update_style(self, tree, interaction),
            NodeKind::Plot(_) => plot::update_style(self, active, variable, idx, tree),
            NodeKind::Table(_) => {}
        }
    }
}

/// Classify a `data-id` element into the right node kind.
///
/// Elements nested under a `table` ancestor become table nodes; otherwise the
/// adjustable marker class decides between display and adjustable.
pub fn classify(tree: &Tree, el: NodeId) -> Option<BoundNode> {
    if tree.ancestor_by_tag(el, "table").is_some() {
        table::new_node(tree, el)
    } else if tree.has_class(el, class::ADJUSTABLE) {
        BoundNode::new_adjustable(tree, el)
    } else {
        BoundNode::new_display(tree, el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    #[test]
    fn test_display_from_attrs() {
        let mut tree = Tree::new();
        let el = tree.create_element("span");
        tree.append_child(tree.root(), el);
        tree.set_data(el, attr::ID, "unit_cost");
        tree.set_data(el, attr::IDX, "2");
        tree.set_data(el, attr::FORMAT, "%d");

        let node = classify(&tree, el).unwrap();
        assert_eq!(node.variable, "unit_cost");
        assert_eq!(node.idx, Some(2));
        assert_eq!(node.format.as_deref(), Some("%d"));
        assert!(matches!(node.kind, NodeKind::Display));
        assert!(!node.flags.contains(NodeFlags::ADJUSTABLE));
    }

    #[test]
    fn test_adjustable_from_attrs() {
        let mut tree = Tree::new();
        let el = tree.create_element("var");
        tree.append_child(tree.root(), el);
        tree.set_data(el, attr::ID, "unit_cost");
        tree.set_data(el, attr::IDX, "0");
        tree.add_class(el, class::ADJUSTABLE);
        tree.set_data(el, attr::MIN, "0");
        tree.set_data(el, attr::MAX, "10");
        tree.set_data(el, attr::STEP, "2");

        let node = classify(&tree, el).unwrap();
        assert!(node.flags.contains(NodeFlags::ADJUSTABLE));
        assert!(matches!(node.kind, NodeKind::Adjustable(_)));
    }

    #[test]
    fn test_table_classification() {
        let mut tree = Tree::new();
        let table = tree.create_element("table");
        let row = tree.create_element("tr");
        let tbody = tree.create_element("tbody");
        let el = tree.create_element("var");
        tree.append_child(tree.root(), table);
        tree.append_child(table, row);
        tree.append_child(table, tbody);
        tree.append_child(row, el);
        tree.set_data(el, attr::ID, "unit_cost");

        let node = classify(&tree, el).unwrap();
        assert!(matches!(node.kind, NodeKind::Table(_)));
    }

    #[test]
    fn test_missing_id_yields_none() {
        let mut tree = Tree::new();
        let el = tree.create_element("span");
        tree.append_child(tree.root(), el);
        tree.set_rect(el, Rect::new(0.0, 0.0, 10.0, 10.0));

        assert!(classify(&tree, el).is_none());
    }
}
