//! Selection nodes - mutually exclusive options installing formulae.
//!
//! Each child of a `data-role="select"` element is one option. An option's
//! value text is assembled from its direct text content, any `var` child
//! carrying `data-name`, and any `input` child's value, then parsed as a
//! `variable = expression` assignment. Selecting an option installs that
//! assignment as a formula on the model; the registry then runs the global
//! update pass. The option pre-marked `selected` installs at scan time
//! without a propagated redraw.

use crate::doc::{attr, class, NodeId, Tree};
use crate::model::Model;

#[derive(Debug)]
pub struct SelectionNode {
    pub el: NodeId,
    pub options: Vec<NodeId>,
    pub selected: Option<usize>,
}

impl SelectionNode {
    pub fn new(tree: &Tree, el: NodeId) -> Self {
        let options = tree.children(el).to_vec();
        let selected = options.iter().position(|&o| tree.has_class(o, class::SELECTED));
        Self { el, options, selected }
    }

    /// Install the currently selected option's assignment on the model.
    pub fn install(&self, tree: &Tree, model: &mut Model) {
        let Some(idx) = self.selected else { return };
        let Some(&option) = self.options.get(idx) else { return };
        let value = read_value(tree, option);
        if let Some((variable, expression)) = parse_assignment(&value) {
            model.set_formula(variable, expression);
        }
    }

    /// Select an option: restyle the `selected` markers and install its
    /// assignment. Returns true when an assignment was installed, so the
    /// caller knows to run the global update pass.
    pub fn select(&mut self, tree: &mut Tree, model: &mut Model, idx: usize) -> bool {
        if idx >= self.options.len() {
            return false;
        }
        self.selected = Some(idx);
        for (i, &option) in self.options.iter().enumerate() {
            if i == idx {
                tree.add_class(option, class::SELECTED);
            } else {
                tree.remove_class(option, class::SELECTED);
            }
        }
        self.install(tree, model);
        true
    }
}

/// Composite option text: direct text, token names, input values.
fn read_value(tree: &Tree, option: NodeId) -> String {
    let mut value = tree.text(option).to_string();
    for &child in tree.children(option) {
        match tree.tag(child) {
            "var" => {
                if let Some(name) = tree.data(child, attr::NAME) {
                    value.push_str(name);
                }
            }
            "input" => {
                if let Some(v) = tree.attr(child, "value") {
                    value.push_str(v);
                }
            }
            _ => {}
        }
    }
    value
}

/// Split `variable = expression`; both sides must be non-empty.
fn parse_assignment(value: &str) -> Option<(String, String)> {
    let (variable, expression) = value.split_once('=')?;
    let variable = variable.trim();
    let expression = expression.trim();
    if variable.is_empty() || expression.is_empty() {
        return None;
    }
    Some((variable.to_string(), expression.to_string()))
}
