//! Display rendering - resolved values as element text.
//!
//! Shared by passive display nodes and adjustable nodes (which differ only
//! in interaction, not in how a value becomes text). An indexed node renders
//! one sequence element; an unindexed node bound to a sequence renders a
//! comma-joined list. An absent variable leaves the element untouched.

use crate::doc::{class, Tree};
use crate::engine::node::BoundNode;
use crate::format::{sprintf, Arg};
use crate::model::{Model, Value};
use crate::types::NodeFlags;

pub(crate) fn draw(node: &mut BoundNode, model: &Model, tree: &mut Tree) {
    if !node.flags.contains(NodeFlags::DRAWN) {
        // Passive outputs get the outlet marker; adjustable ones shed it.
        if node.flags.contains(NodeFlags::ADJUSTABLE) {
            tree.remove_class(node.el, class::OUTLET);
        } else {
            tree.add_class(node.el, class::OUTLET);
        }
        node.flags.insert(NodeFlags::DRAWN);
    }

    if let Some(value) = model.get(&node.variable) {
        if let Some(text) = rendered_text(node, &value) {
            tree.set_text(node.el, &text);
        }
    }
}

pub(crate) fn update_style(node: &BoundNode, active: bool, tree: &mut Tree) {
    if active {
        tree.add_class(node.el, class::HOVERING);
    } else {
        tree.remove_class(node.el, class::HOVERING);
    }
}

/// Resolve the value through the node's index and format spec.
pub(crate) fn rendered_text(node: &BoundNode, value: &Value) -> Option<String> {
    let fmt_num = |n: f64| match &node.format {
        Some(spec) => sprintf(spec, Arg::Num(n)),
        None => format!("{n}"),
    };
    let fmt_str = |s: &str| match &node.format {
        Some(spec) => sprintf(spec, Arg::Str(s)),
        None => s.to_string(),
    };

    match value {
        Value::Number(n) => Some(fmt_num(*n)),
        Value::Text(s) => Some(fmt_str(s)),
        Value::Series(v) => match node.idx {
            Some(i) => v.get(i).map(|n| fmt_num(*n)),
            None => Some(
                v.iter()
                    .map(|n| format!("{n}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        },
        Value::Labels(v) => match node.idx {
            Some(i) => v.get(i).map(|s| fmt_str(s)),
            None => Some(v.join(", ")),
        },
    }
}
