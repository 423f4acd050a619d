//! Document tree - the presentational structure the engine binds against.
//!
//! A lightweight element arena standing in for whatever surface ultimately
//! displays the document. Elements carry a tag, attributes, classes, direct
//! text content, and a layout rect written by the embedder. The engine scans
//! this tree for binding attributes, then renders by mutating text, classes,
//! and child structure; the embedder reads the mutated tree back out.
//!
//! Indices are reused through a free pool, so a plot clearing its bars on
//! every redraw does not grow the arena without bound.

use crate::types::Rect;

/// Index of an element in the tree arena.
pub type NodeId = usize;

// =============================================================================
// Attribute schema
// =============================================================================

/// Prefix every binding attribute carries.
pub const DATA_PREFIX: &str = "data-";

/// Recognized `data-` attribute suffixes.
pub mod attr {
    /// Variable a bound output reads.
    pub const ID: &str = "id";
    /// Index into a sequence variable.
    pub const IDX: &str = "idx";
    /// Printf-style format spec.
    pub const FORMAT: &str = "format";
    /// Named token placeholder.
    pub const NAME: &str = "name";
    /// Element role; `select` marks an option group.
    pub const ROLE: &str = "role";
    /// Plot spec: `x_variable,series1|series2|...`.
    pub const PLOT: &str = "plot";
    /// Axis caption override for plots.
    pub const YLABEL: &str = "ylabel";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const STEP: &str = "step";
}

/// Class markers: some are authored in the document, some stamped by the
/// engine.
pub mod class {
    /// Authored: this bound output is drag-adjustable.
    pub const ADJUSTABLE: &str = "adjustable";
    /// Authored: the initially selected option of an option group.
    pub const SELECTED: &str = "selected";
    /// Stamped on passive bound outputs.
    pub const OUTLET: &str = "outlet";
    /// Stamped on named token placeholders.
    pub const TOKEN: &str = "token";
    /// Toggled while the pointer highlights an element.
    pub const HOVERING: &str = "hovering";
    /// Toggled on the node that owns the active drag.
    pub const DRAGGING: &str = "dragging";
    /// Stamped on generated plot bars.
    pub const BAR: &str = "bar";
    /// Stamped on generated category captions.
    pub const CAPTION: &str = "caption";
    /// Stamped on the generated (rotated) axis label.
    pub const AXIS_LABEL: &str = "axis-label";
    /// Toggled on the tree root while a horizontal drag is available.
    pub const DRAG_CURSOR: &str = "drag-cursor-h";
}

// =============================================================================
// Element
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    rect: Rect,
    alive: bool,
}

// =============================================================================
// Tree
// =============================================================================

/// Element arena with a fixed root.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Element>,
    free: Vec<NodeId>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only the root element.
    pub fn new() -> Self {
        let root = Element {
            tag: "root".to_string(),
            alive: true,
            ..Element::default()
        };
        Self { nodes: vec![root], free: Vec::new() }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    /// Create a detached element; attach it with [`Tree::append_child`].
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let el = Element {
            tag: tag.to_string(),
            alive: true,
            ..Element::default()
        };
        if let Some(id) = self.free.pop() {
            self.nodes[id] = el;
            id
        } else {
            self.nodes.push(el);
            self.nodes.len() - 1
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child].parent.is_none(), "element already attached");
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Detach and free an element and its whole subtree.
    pub fn release(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent {
            self.nodes[parent].children.retain(|&c| c != id);
        }
        self.release_subtree(id);
    }

    /// Detach and free every child of an element, keeping the element itself.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.release_subtree(child);
        }
    }

    fn release_subtree(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.release_subtree(child);
        }
        self.nodes[id] = Element::default();
        self.free.push(id);
    }

    // -------------------------------------------------------------------------
    // Structure queries
    // -------------------------------------------------------------------------

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id].tag
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Children filtered by tag, in document order.
    pub fn children_by_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .filter(|&c| self.nodes[c].tag == tag)
            .collect()
    }

    /// Nearest ancestor with the given tag.
    pub fn ancestor_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cur = self.nodes[id].parent;
        while let Some(el) = cur {
            if self.nodes[el].tag == tag {
                return Some(el);
            }
            cur = self.nodes[el].parent;
        }
        None
    }

    /// Position of an element among its parent's children.
    pub fn element_index(&self, id: NodeId) -> usize {
        match self.nodes[id].parent {
            Some(parent) => self.nodes[parent]
                .children
                .iter()
                .position(|&c| c == id)
                .unwrap_or(0),
            None => 0,
        }
    }

    /// Every element under `root` in document order, excluding `root` itself.
    ///
    /// The returned list is a snapshot: callers may mutate the tree while
    /// walking it without perturbing the iteration.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        out
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[id].attrs;
        if let Some(entry) = attrs.iter_mut().find(|(k, _)| k == name) {
            entry.1 = value.to_string();
        } else {
            attrs.push((name.to_string(), value.to_string()));
        }
    }

    /// Binding attribute shorthand: `data(id, "idx")` reads `data-idx`.
    pub fn data(&self, id: NodeId, suffix: &str) -> Option<&str> {
        self.attr(id, &format!("{DATA_PREFIX}{suffix}"))
    }

    /// Binding attribute shorthand: `set_data(id, "id", "unit_cost")` writes
    /// `data-id="unit_cost"`.
    pub fn set_data(&mut self, id: NodeId, suffix: &str, value: &str) {
        self.set_attr(id, &format!("{DATA_PREFIX}{suffix}"), value);
    }

    /// All binding attributes of an element, prefix stripped, in authored
    /// order. Empty for elements with no `data-` attributes.
    pub fn data_options(&self, id: NodeId) -> Vec<(String, String)> {
        self.nodes[id]
            .attrs
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(DATA_PREFIX)
                    .map(|suffix| (suffix.to_string(), v.clone()))
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes[id].classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            self.nodes[id].classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.nodes[id].classes.retain(|c| c != class);
    }

    // -------------------------------------------------------------------------
    // Content and geometry
    // -------------------------------------------------------------------------

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id].text
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id].text = text.to_string();
    }

    pub fn rect(&self, id: NodeId) -> Rect {
        self.nodes[id].rect
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.nodes[id].rect = rect;
    }

    /// True when the id refers to a live element.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|el| el.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut t = Tree::new();
        let table = t.create_element("table");
        let tbody = t.create_element("tbody");
        let row = t.create_element("tr");
        t.append_child(t.root(), table);
        t.append_child(table, tbody);
        t.append_child(tbody, row);
        (t, table, tbody, row)
    }

    #[test]
    fn test_structure_queries() {
        let (t, table, tbody, row) = sample();

        assert_eq!(t.parent(row), Some(tbody));
        assert_eq!(t.children(table), &[tbody]);
        assert_eq!(t.children_by_tag(table, "tbody"), vec![tbody]);
        assert_eq!(t.children_by_tag(table, "thead"), Vec::<NodeId>::new());
        assert_eq!(t.ancestor_by_tag(row, "table"), Some(table));
        assert_eq!(t.ancestor_by_tag(table, "table"), None);
    }

    #[test]
    fn test_element_index() {
        let mut t = Tree::new();
        let row = t.create_element("tr");
        t.append_child(t.root(), row);
        let a = t.create_element("var");
        let b = t.create_element("var");
        t.append_child(row, a);
        t.append_child(row, b);

        assert_eq!(t.element_index(a), 0);
        assert_eq!(t.element_index(b), 1);
    }

    #[test]
    fn test_descendants_document_order() {
        let (t, table, tbody, row) = sample();
        assert_eq!(t.descendants(t.root()), vec![table, tbody, row]);
        assert_eq!(t.descendants(table), vec![tbody, row]);
    }

    #[test]
    fn test_attrs_and_data() {
        let (mut t, table, ..) = sample();
        t.set_attr(table, "data-id", "unit_cost");
        t.set_attr(table, "data-idx", "2");
        t.set_attr(table, "lang", "en");

        assert_eq!(t.data(table, attr::ID), Some("unit_cost"));
        assert_eq!(t.data(table, attr::IDX), Some("2"));
        assert_eq!(t.data(table, "missing"), None);

        let options = t.data_options(table);
        assert_eq!(
            options,
            vec![
                ("id".to_string(), "unit_cost".to_string()),
                ("idx".to_string(), "2".to_string()),
            ]
        );

        t.set_attr(table, "data-idx", "3");
        assert_eq!(t.data(table, attr::IDX), Some("3"));
    }

    #[test]
    fn test_classes() {
        let (mut t, table, ..) = sample();
        assert!(!t.has_class(table, class::HOVERING));

        t.add_class(table, class::HOVERING);
        t.add_class(table, class::HOVERING);
        assert!(t.has_class(table, class::HOVERING));

        t.remove_class(table, class::HOVERING);
        assert!(!t.has_class(table, class::HOVERING));
    }

    #[test]
    fn test_release_recycles_indices() {
        let (mut t, _, tbody, row) = sample();
        let cell = t.create_element("td");
        t.append_child(row, cell);

        t.clear_children(tbody);
        assert!(t.children(tbody).is_empty());
        assert!(!t.is_alive(row));
        assert!(!t.is_alive(cell));

        // Freed ids are reused.
        let a = t.create_element("div");
        let b = t.create_element("div");
        assert!(a == row || a == cell);
        assert!(b == row || b == cell);
    }
}
