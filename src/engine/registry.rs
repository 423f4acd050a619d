//! Node registry - scanning, variable-keyed fan-out, pointer routing.
//!
//! The registry owns every bound node, indexed by the variables they depend
//! on. A single scan pass classifies attribute-bearing elements into tokens,
//! selection nodes, and bound nodes; the element list is snapshotted before
//! any node is instantiated, so nodes that grow the tree (tables) cannot
//! perturb the scan.
//!
//! `draw` and `update` are the only global re-render entry points: they walk
//! every registered variable in insertion order and invoke the matching
//! method on each node bound to it. Both are idempotent and safe to call
//! repeatedly; a node that cannot resolve its variable simply skips itself.
//!
//! `set_variable_hovering` is the single highlight fan-out point, and the
//! pointer dispatch methods drive the drag/hover/click state machine from
//! logical pointer events.

use std::collections::HashMap;

use crate::doc::{attr, class, NodeId, Tree};
use crate::engine::node::{self, BoundNode, NodeKind};
use crate::engine::selection::SelectionNode;
use crate::engine::{adjustable, plot, table};
use crate::model::{Model, Value};
use crate::state::{HitMap, HitTarget, InteractionState, PointerAction, PointerEvent};
use crate::types::NodeFlags;

// =============================================================================
// Registry
// =============================================================================

#[derive(Default)]
pub struct Registry {
    nodes: Vec<BoundNode>,
    /// Registration order of variables; draw/update iterate in this order.
    variables: Vec<String>,
    /// Variable name -> indices of nodes depending on it.
    outlets: HashMap<String, Vec<usize>>,
    /// Variable name -> token elements highlighted with it.
    tokens: HashMap<String, Vec<NodeId>>,
    selections: Vec<SelectionNode>,
    hit: HitMap,
    interaction: InteractionState,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared interaction state; clone to hand the embedder a handle.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn nodes(&self) -> &[BoundNode] {
        &self.nodes
    }

    /// Indices of the nodes registered under a variable, in scan order.
    pub fn outlets(&self, variable: &str) -> &[usize] {
        self.outlets.get(variable).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Token elements registered under a variable name.
    pub fn tokens(&self, variable: &str) -> &[NodeId] {
        self.tokens.get(variable).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selections(&self) -> &[SelectionNode] {
        &self.selections
    }

    // -------------------------------------------------------------------------
    // Scan
    // -------------------------------------------------------------------------

    /// Single-pass scan of the subtree under `root`.
    ///
    /// Classifies every element carrying binding attributes and registers
    /// the resulting nodes. Pre-selected options install their formulae here
    /// without triggering a redraw.
    pub fn scan(&mut self, tree: &mut Tree, model: &mut Model, root: NodeId) {
        let elements = tree.descendants(root);

        for el in elements {
            let options = tree.data_options(el);
            if options.is_empty() {
                continue;
            }
            let get = |key: &str| {
                options
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.as_str())
            };

            if let Some(name) = get(attr::NAME) {
                if tree.tag(el) == "var" {
                    let name = name.to_string();
                    tree.set_text(el, &name);
                    tree.add_class(el, class::TOKEN);
                    self.tokens.entry(name).or_default().push(el);
                }
            }

            if get(attr::ROLE) == Some("select") {
                let selection = SelectionNode::new(tree, el);
                selection.install(tree, model);
                self.selections.push(selection);
            }

            if get(attr::ID).is_some() {
                if let Some(bound) = node::classify(tree, el) {
                    self.register_node(bound);
                }
            }

            if get(attr::PLOT).is_some() {
                if let Some(bound) = plot::new_node(tree, el) {
                    self.register_node(bound);
                }
            }
        }
    }

    /// Add a node to the arena and index it under every variable it depends
    /// on. Table growth uses this for the cell nodes it creates.
    pub fn register_node(&mut self, bound: BoundNode) -> usize {
        let variables = bound.variables();
        let idx = self.nodes.len();
        self.nodes.push(bound);
        for variable in variables {
            if !self.outlets.contains_key(&variable) {
                self.variables.push(variable.clone());
            }
            self.outlets.entry(variable).or_default().push(idx);
        }
        idx
    }

    // -------------------------------------------------------------------------
    // Draw / update fan-out
    // -------------------------------------------------------------------------

    /// Full re-render of every registered node.
    pub fn draw(&mut self, model: &Model, tree: &mut Tree) {
        let variables = self.variables.clone();
        for variable in variables {
            let list = self.outlets.get(&variable).cloned().unwrap_or_default();
            for i in list {
                self.draw_node(i, model, tree);
            }
        }
    }

    /// Incremental re-render of every registered node.
    pub fn update(&mut self, model: &Model, tree: &mut Tree) {
        let variables = self.variables.clone();
        for variable in variables {
            let list = self.outlets.get(&variable).cloned().unwrap_or_default();
            for i in list {
                self.nodes[i].update(model, tree);
            }
        }
    }

    fn draw_node(&mut self, i: usize, model: &Model, tree: &mut Tree) {
        if matches!(self.nodes[i].kind, NodeKind::Table(_)) {
            self.draw_table(i, model, tree);
        } else {
            self.nodes[i].draw(model, tree);
        }
    }

    /// Grow a table to fit its sequence variable, creating and registering a
    /// cell node for each row that does not have one yet. Never shrinks.
    fn draw_table(&mut self, i: usize, model: &Model, tree: &mut Tree) {
        let Some(plan) = table::plan_growth(&self.nodes[i], model) else { return };

        for row in 0..plan.rows {
            let row_el = table::ensure_row(tree, plan.body, row);
            let cell = table::ensure_cell(tree, row_el, plan.col);
            if !tree.children_by_tag(cell, "var").is_empty() {
                continue;
            }
            let (el, cell_node) = table::make_cell(tree, &plan, row);
            let child = self.register_node(cell_node);
            self.nodes[child].draw(model, tree);
            tree.append_child(cell, el);
        }

        self.nodes[i].flags.insert(NodeFlags::DRAWN);
    }

    // -------------------------------------------------------------------------
    // Highlight fan-out
    // -------------------------------------------------------------------------

    /// Notify every node and token depending on `variable` of a highlight
    /// change. Nodes with an index only react when it matches; tokens react
    /// regardless of index.
    pub fn set_variable_hovering(
        &self,
        tree: &mut Tree,
        variable: &str,
        idx: Option<usize>,
        active: bool,
    ) {
        if let Some(list) = self.outlets.get(variable) {
            for &i in list {
                let bound = &self.nodes[i];
                if let (Some(a), Some(b)) = (idx, bound.idx) {
                    if a != b {
                        continue;
                    }
                }
                bound.update_style(active, variable, idx, tree, &self.interaction);
            }
        }
        if let Some(tokens) = self.tokens.get(variable) {
            for &token in tokens {
                if active {
                    tree.add_class(token, class::HOVERING);
                } else {
                    tree.remove_class(token, class::HOVERING);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Pointer dispatch
    // -------------------------------------------------------------------------

    /// Rebuild hit regions from current element geometry. Call after the
    /// embedder lays out the tree (and again whenever geometry changes).
    pub fn refresh_hit_regions(&mut self, tree: &Tree) {
        self.hit.clear();
        for (i, bound) in self.nodes.iter().enumerate() {
            if matches!(bound.kind, NodeKind::Display | NodeKind::Adjustable(_)) {
                self.hit.push(tree.rect(bound.el), HitTarget::Outlet(i));
            }
        }
        for (s, selection) in self.selections.iter().enumerate() {
            for (o, &el) in selection.options.iter().enumerate() {
                self.hit
                    .push(tree.rect(el), HitTarget::Option { selection: s, option: o });
            }
        }
    }

    /// Route a logical pointer event. Cancel behaves exactly like up.
    pub fn dispatch_pointer(&mut self, tree: &mut Tree, model: &mut Model, event: PointerEvent) {
        match event.action {
            PointerAction::Down => self.pointer_down(tree, model, event.x, event.y),
            PointerAction::Move => self.pointer_move(tree, model, event.x, event.y),
            PointerAction::Up | PointerAction::Cancel => {
                self.pointer_up(tree, model, event.x, event.y)
            }
        }
    }

    fn pointer_down(&mut self, tree: &mut Tree, model: &mut Model, x: f64, y: f64) {
        if self.interaction.is_dragging() {
            return;
        }
        match self.hit.hit_test(x, y) {
            Some(HitTarget::Outlet(i)) => {
                if !self.nodes[i].flags.contains(NodeFlags::ADJUSTABLE) {
                    return;
                }
                let Some(value) = adjustable::current_value(&self.nodes[i], model) else {
                    debug_assert!(false, "drag started on a node with no editable value");
                    return;
                };
                adjustable::begin_drag(&mut self.nodes[i], value, x);
                self.interaction.begin_drag(i);

                // Hover highlight elsewhere is suppressed for the duration.
                if let Some(HitTarget::Outlet(h)) = self.interaction.hovered() {
                    if h != i {
                        let (variable, idx) =
                            (self.nodes[h].variable.clone(), self.nodes[h].idx);
                        self.set_variable_hovering(tree, &variable, idx, false);
                    }
                }

                let (variable, idx) = (self.nodes[i].variable.clone(), self.nodes[i].idx);
                self.nodes[i].update_style(true, &variable, idx, tree, &self.interaction);
            }
            Some(HitTarget::Option { selection, option }) => {
                self.interaction.set_pressed_option(Some((selection, option)));
            }
            None => {}
        }
    }

    fn pointer_move(&mut self, tree: &mut Tree, model: &mut Model, x: f64, y: f64) {
        if let Some(i) = self.interaction.drag_target() {
            let value = adjustable::drag_value(&self.nodes[i], x);
            let (variable, idx) = (self.nodes[i].variable.clone(), self.nodes[i].idx);
            match idx {
                Some(k) => model.set_element(&variable, k, value),
                None => model.set_value(variable, Value::Number(value)),
            }
            self.update(model, tree);
            return;
        }
        self.refresh_hover(tree, x, y, false);
    }

    fn pointer_up(&mut self, tree: &mut Tree, model: &mut Model, x: f64, y: f64) {
        if let Some(i) = self.interaction.drag_target() {
            adjustable::end_drag(&mut self.nodes[i]);
            self.interaction.end_drag();

            let (variable, idx) = (self.nodes[i].variable.clone(), self.nodes[i].idx);
            self.nodes[i].update_style(false, &variable, idx, tree, &self.interaction);

            // Hover highlight suppressed by the drag comes back for whatever
            // is under the pointer now.
            self.refresh_hover(tree, x, y, true);
        }

        if let Some((s, o)) = self.interaction.pressed_option() {
            self.interaction.set_pressed_option(None);
            let on_target =
                self.hit.hit_test(x, y) == Some(HitTarget::Option { selection: s, option: o });
            if on_target {
                let installed = self.selections[s].select(tree, model, o);
                if installed {
                    self.update(model, tree);
                }
            }
        }
    }

    /// Re-derive the hovered target from the pointer position, firing
    /// leave/enter fan-out on change. `force` re-asserts the current
    /// target's highlight even when unchanged (used when a drag ends).
    fn refresh_hover(&mut self, tree: &mut Tree, x: f64, y: f64, force: bool) {
        let target = self.hit.hit_test(x, y);
        let previous = self.interaction.hovered();
        if !force && target == previous {
            return;
        }

        if previous != target {
            match previous {
                Some(HitTarget::Outlet(i)) => {
                    self.nodes[i].flags.remove(NodeFlags::HOVERING);
                    let (variable, idx) = (self.nodes[i].variable.clone(), self.nodes[i].idx);
                    self.set_variable_hovering(tree, &variable, idx, false);
                }
                Some(HitTarget::Option { selection, option }) => {
                    if let Some(&el) = self
                        .selections
                        .get(selection)
                        .and_then(|s| s.options.get(option))
                    {
                        tree.remove_class(el, class::HOVERING);
                    }
                }
                None => {}
            }
        }

        match target {
            Some(HitTarget::Outlet(i)) => {
                self.nodes[i].flags.insert(NodeFlags::HOVERING);
                let active = self.nodes[i].is_active(&self.interaction);
                let (variable, idx) = (self.nodes[i].variable.clone(), self.nodes[i].idx);
                self.set_variable_hovering(tree, &variable, idx, active);
            }
            Some(HitTarget::Option { selection, option }) => {
                if let Some(&el) = self
                    .selections
                    .get(selection)
                    .and_then(|s| s.options.get(option))
                {
                    tree.add_class(el, class::HOVERING);
                }
            }
            None => {}
        }

        self.interaction.set_hovered(target);
    }
}
