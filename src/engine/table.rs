//! Table nodes - a sequence variable rendered one row per element.
//!
//! A table node is declared by a bound element inside a `table`; the
//! element's position among its siblings picks the column it owns. Drawing
//! grows the table body to one row per sequence element (never shrinking)
//! and fills this node's column with freshly created display or adjustable
//! cell nodes, each bound to the same variable at that row's index.
//!
//! Growth is planned against a snapshot of the node's configuration before
//! any tree mutation, and the created cells register into the shared
//! registry so they receive variable-keyed fan-out like any other node.

use crate::doc::{attr, class, NodeId, Tree};
use crate::engine::adjustable::{AdjustState, Bounds};
use crate::engine::node::{BoundNode, NodeKind};
use crate::model::Model;
use crate::types::NodeFlags;

// =============================================================================
// TableState
// =============================================================================

#[derive(Debug)]
pub struct TableState {
    /// Column this node owns: the element's position among its siblings.
    pub col: usize,
    /// The table body rows grow into.
    pub body: NodeId,
    /// Present when grown cells should be drag-adjustable.
    pub bounds: Option<Bounds>,
}

/// Construct a table node from a bound element nested in a table.
pub(crate) fn new_node(tree: &Tree, el: NodeId) -> Option<BoundNode> {
    let variable = tree.data(el, attr::ID)?.to_string();
    let format = tree.data(el, attr::FORMAT).map(str::to_string);

    let table = tree.ancestor_by_tag(el, "table")?;
    let body = tree.children_by_tag(table, "tbody").first().copied()?;
    let col = tree.element_index(el);

    let adjustable = tree.has_class(el, class::ADJUSTABLE);
    let bounds = if adjustable {
        let bounds = Bounds::from_attrs(tree, el);
        debug_assert!(bounds.is_some(), "adjustable table column without data-min/max/step");
        bounds
    } else {
        None
    };

    let mut flags = NodeFlags::NONE;
    if bounds.is_some() {
        flags.insert(NodeFlags::ADJUSTABLE);
    }

    Some(BoundNode {
        el,
        variable,
        idx: None,
        format,
        flags,
        kind: NodeKind::Table(TableState { col, body, bounds }),
    })
}

// =============================================================================
// Growth
// =============================================================================

/// Everything needed to grow a table, captured before the tree mutates.
#[derive(Debug, Clone)]
pub(crate) struct GrowthPlan {
    pub rows: usize,
    pub col: usize,
    pub body: NodeId,
    pub variable: String,
    pub format: Option<String>,
    pub bounds: Option<Bounds>,
}

/// Snapshot the growth work for a table node, or `None` when the variable is
/// absent.
pub(crate) fn plan_growth(node: &BoundNode, model: &Model) -> Option<GrowthPlan> {
    let NodeKind::Table(st) = &node.kind else { return None };
    let rows = model.get(&node.variable)?.len();
    Some(GrowthPlan {
        rows,
        col: st.col,
        body: st.body,
        variable: node.variable.clone(),
        format: node.format.clone(),
        bounds: st.bounds,
    })
}

/// Row `row` of the plan's body, appending rows as needed.
pub(crate) fn ensure_row(tree: &mut Tree, body: NodeId, row: usize) -> NodeId {
    let mut rows = tree.children_by_tag(body, "tr");
    while rows.len() <= row {
        let tr = tree.create_element("tr");
        tree.append_child(body, tr);
        rows.push(tr);
    }
    rows[row]
}

/// Cell `col` of a row, appending cells as needed.
pub(crate) fn ensure_cell(tree: &mut Tree, row: NodeId, col: usize) -> NodeId {
    let mut cells = tree.children_by_tag(row, "td");
    while cells.len() <= col {
        let td = tree.create_element("td");
        tree.append_child(row, td);
        cells.push(td);
    }
    cells[col]
}

/// Create the bound element for one grown cell and its node.
pub(crate) fn make_cell(tree: &mut Tree, plan: &GrowthPlan, row: usize) -> (NodeId, BoundNode) {
    let el = tree.create_element("var");
    tree.set_data(el, attr::ID, &plan.variable);
    tree.set_data(el, attr::IDX, &row.to_string());
    if let Some(format) = &plan.format {
        tree.set_data(el, attr::FORMAT, format);
    }

    let node = match plan.bounds {
        Some(bounds) => {
            tree.add_class(el, class::ADJUSTABLE);
            BoundNode {
                el,
                variable: plan.variable.clone(),
                idx: Some(row),
                format: plan.format.clone(),
                flags: NodeFlags::ADJUSTABLE,
                kind: NodeKind::Adjustable(AdjustState::new(bounds)),
            }
        }
        None => BoundNode {
            el,
            variable: plan.variable.clone(),
            idx: Some(row),
            format: plan.format.clone(),
            flags: NodeFlags::NONE,
            kind: NodeKind::Display,
        },
    };
    (el, node)
}
