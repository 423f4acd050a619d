//! Adjustable nodes - drag-editing a value in place.
//!
//! State machine: idle -> (pointer-down) dragging -> (pointer-up) idle.
//! Pointer-down records the value and pointer x at press time; each move
//! derives a candidate value from the horizontal delta, snaps it to the
//! configured step, and clamps it into the configured range. The write-back
//! into the model and the global update pass are driven by the registry's
//! pointer dispatch.

use crate::doc::{attr, class, NodeId, Tree};
use crate::engine::node::{BoundNode, NodeKind};
use crate::model::{Model, Value};
use crate::state::InteractionState;
use crate::types::NodeFlags;

/// Pointer travel (in document units) per step increment.
const PIXELS_PER_STEP: f64 = 5.0;

// =============================================================================
// Bounds
// =============================================================================

/// Drag range configuration, read once from the element at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Bounds {
    pub fn from_attrs(tree: &Tree, el: NodeId) -> Option<Bounds> {
        let read = |name: &str| tree.data(el, name).and_then(|v| v.parse::<f64>().ok());
        Some(Bounds {
            min: read(attr::MIN)?,
            max: read(attr::MAX)?,
            step: read(attr::STEP)?,
        })
    }
}

// =============================================================================
// AdjustState
// =============================================================================

/// Drag bookkeeping for one adjustable node.
#[derive(Debug)]
pub struct AdjustState {
    pub bounds: Bounds,
    value_at_press: f64,
    x_at_press: f64,
}

impl AdjustState {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds, value_at_press: 0.0, x_at_press: 0.0 }
    }
}

// =============================================================================
// Drag operations
// =============================================================================

/// The value this node currently edits: the indexed element of a sequence
/// variable, or the scalar itself when no index is set.
pub(crate) fn current_value(node: &BoundNode, model: &Model) -> Option<f64> {
    match (model.get(&node.variable)?, node.idx) {
        (Value::Series(v), Some(i)) => v.get(i).copied(),
        (Value::Number(n), None) => Some(n),
        _ => None,
    }
}

pub(crate) fn begin_drag(node: &mut BoundNode, value: f64, x: f64) {
    let NodeKind::Adjustable(st) = &mut node.kind else {
        debug_assert!(false, "begin_drag on a non-adjustable node");
        return;
    };
    st.value_at_press = value;
    st.x_at_press = x;
    node.flags.insert(NodeFlags::DRAGGING);
}

/// The value implied by the pointer now being at `x`: press value plus the
/// scaled horizontal delta, snapped to the step, clamped into range.
pub(crate) fn drag_value(node: &BoundNode, x: f64) -> f64 {
    let NodeKind::Adjustable(st) = &node.kind else {
        debug_assert!(false, "drag_value on a non-adjustable node");
        return 0.0;
    };
    let Bounds { min, max, step } = st.bounds;
    let dx = x - st.x_at_press;
    let unclipped = st.value_at_press + dx / PIXELS_PER_STEP * step;
    ((unclipped / step).round() * step).clamp(min, max)
}

pub(crate) fn end_drag(node: &mut BoundNode) {
    node.flags.remove(NodeFlags::DRAGGING);
}

/// Adjustable highlight follows the node's own drag state, not the fan-out
/// argument: the dragging marker on the element, and the horizontal-drag
/// cursor marker on the root while the node is active.
pub(crate) fn update_style(node: &BoundNode, tree: &mut Tree, interaction: &InteractionState) {
    if node.flags.contains(NodeFlags::DRAGGING) {
        tree.add_class(node.el, class::DRAGGING);
    } else {
        tree.remove_class(node.el, class::DRAGGING);
    }

    let root = tree.root();
    if node.is_active(interaction) {
        tree.add_class(root, class::DRAG_CURSOR);
    } else {
        tree.remove_class(root, class::DRAG_CURSOR);
    }
}
