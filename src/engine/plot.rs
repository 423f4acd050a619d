//! Plot nodes - grouped bars over a category axis and one or more series.
//!
//! The plot spec `data-plot="x_variable,series_a|series_b"` names a label
//! sequence for the category axis and any number of value series. A series
//! name that is not a defined variable is evaluated as an inline formula
//! expression, so a document can plot `damage_total / costs_by_unit` without
//! naming it first.
//!
//! `draw` rebuilds the bar/caption structure from scratch; `update` rewrites
//! only bar extents against a freshly computed shared maximum. Highlighting
//! maps a (variable, index) pair onto the one bar at
//! `idx * series_count + series_idx` and swaps its fill tone within the
//! series palette pair.

use tracing::warn;
use unicode_width::UnicodeWidthStr;

use crate::doc::{attr, class, NodeId, Tree};
use crate::engine::node::{BoundNode, NodeKind};
use crate::model::{Model, Value};
use crate::types::{Fill, NodeFlags, Rect};

/// Space between bars and bar groups.
const GAP: f64 = 10.0;
/// Band reserved for category captions (bottom) and the axis label (left).
const CAPTION_BAND: f64 = 20.0;
/// Approximate advance width of one character cell, for caption extents.
const CHAR_WIDTH: f64 = 8.0;
/// Caption line height.
const LINE_HEIGHT: f64 = 16.0;

// =============================================================================
// PlotState
// =============================================================================

#[derive(Debug)]
pub struct PlotState {
    /// Value series, in spec order. The category axis variable lives in the
    /// node's `variable` field.
    pub series: Vec<String>,
    pub y_label: String,
    /// Generated bar elements in (category, series) order.
    pub bars: Vec<NodeId>,
}

/// Construct a plot node from its `data-plot` spec.
pub(crate) fn new_node(tree: &Tree, el: NodeId) -> Option<BoundNode> {
    let spec = tree.data(el, attr::PLOT)?;
    let (x, rest) = spec.split_once(',')?;
    let series: Vec<String> = rest.split('|').map(str::to_string).collect();
    if x.is_empty() || series.iter().any(String::is_empty) {
        return None;
    }

    let y_label = match tree.data(el, attr::YLABEL) {
        Some(label) => label.to_string(),
        None => series.join(", "),
    };

    Some(BoundNode {
        el,
        variable: x.to_string(),
        idx: None,
        format: None,
        flags: NodeFlags::NONE,
        kind: NodeKind::Plot(PlotState { series, y_label, bars: Vec::new() }),
    })
}

// =============================================================================
// Value resolution
// =============================================================================

/// Category labels from the axis variable; numbers stringify.
fn category_labels(model: &Model, variable: &str) -> Option<Vec<String>> {
    match model.get(variable)? {
        Value::Labels(v) => Some(v),
        Value::Series(v) => Some(v.iter().map(|n| format!("{n}")).collect()),
        Value::Number(_) | Value::Text(_) => None,
    }
}

/// One series' values: a defined numeric variable, else the name evaluated
/// as an inline formula. An unresolvable series is skipped with a warning.
fn resolve_series(model: &Model, name: &str) -> Option<Vec<f64>> {
    if let Some(value) = model.get(name) {
        if let Some(vector) = value.as_vector() {
            return Some(vector.into_seq());
        }
    }
    match model.compute(name) {
        Ok(vector) => Some(vector.into_seq()),
        Err(err) => {
            warn!(series = name, %err, "unable to compute plot series");
            None
        }
    }
}

/// Shared scale: the maximum finite value across every series, per category.
fn max_across(values: &[Option<Vec<f64>>], categories: usize) -> f64 {
    let mut max = 0.0f64;
    for series in values.iter().flatten() {
        for i in 0..categories {
            if let Some(&v) = series.get(i) {
                if v.is_finite() && v > max {
                    max = v;
                }
            }
        }
    }
    max
}

fn bar_height(value: f64, max: f64, plot_height: f64) -> f64 {
    if max > 0.0 && value.is_finite() && value > 0.0 {
        value / max * plot_height
    } else {
        0.0
    }
}

// =============================================================================
// Draw / update
// =============================================================================

pub(crate) fn draw(node: &mut BoundNode, model: &Model, tree: &mut Tree) {
    let el = node.el;
    let variable = node.variable.clone();
    let NodeKind::Plot(st) = &mut node.kind else { return };

    let Some(labels) = category_labels(model, &variable) else { return };
    let values: Vec<Option<Vec<f64>>> =
        st.series.iter().map(|s| resolve_series(model, s)).collect();

    tree.clear_children(el);
    st.bars.clear();

    let Rect { width, height, .. } = tree.rect(el);
    let plot_height = height - CAPTION_BAND;
    let max = max_across(&values, labels.len());

    // Rotated axis label, vertically centered against the plot area.
    let axis = tree.create_element("div");
    tree.add_class(axis, class::AXIS_LABEL);
    tree.set_text(axis, &st.y_label);
    let axis_width = st.y_label.width() as f64 * CHAR_WIDTH;
    tree.set_rect(
        axis,
        Rect::new(
            -axis_width / 2.0 + (CAPTION_BAND - 4.0) / 2.0,
            plot_height / 2.0 - LINE_HEIGHT / 2.0,
            axis_width,
            LINE_HEIGHT,
        ),
    );
    tree.append_child(el, axis);

    let series_count = st.series.len();
    let bar_count = labels.len() * series_count;
    if bar_count == 0 {
        node.flags.insert(NodeFlags::DRAWN);
        return;
    }
    let item_width =
        ((width - CAPTION_BAND - GAP * (bar_count as f64 - 1.0)) / bar_count as f64).floor();
    let section_width =
        item_width * series_count as f64 + GAP * (series_count as f64 - 1.0);

    for (i, label) in labels.iter().enumerate() {
        let section_x = i as f64 * section_width + i as f64 * GAP + CAPTION_BAND;

        let caption = tree.create_element("div");
        tree.add_class(caption, class::CAPTION);
        tree.set_text(caption, label);
        let caption_width = label.width() as f64 * CHAR_WIDTH;
        tree.set_rect(
            caption,
            Rect::new(
                section_x + section_width / 2.0 - caption_width / 2.0,
                height - CAPTION_BAND + 4.0,
                caption_width,
                LINE_HEIGHT,
            ),
        );
        tree.append_child(el, caption);

        for j in 0..series_count {
            let x0 = i as f64 * section_width
                + j as f64 * item_width
                + (i + j) as f64 * GAP
                + CAPTION_BAND;
            let value = values[j]
                .as_ref()
                .and_then(|v| v.get(i).copied())
                .unwrap_or(0.0);
            let h = bar_height(value, max, plot_height);

            let bar = tree.create_element("div");
            tree.add_class(bar, class::BAR);
            tree.set_attr(bar, "fill", Fill::for_series(j).as_str());
            tree.set_rect(bar, Rect::new(x0, plot_height - h, item_width, h));
            tree.append_child(el, bar);
            st.bars.push(bar);
        }
    }

    node.flags.insert(NodeFlags::DRAWN);
}

pub(crate) fn update(node: &mut BoundNode, model: &Model, tree: &mut Tree) {
    let el = node.el;
    let variable = node.variable.clone();

    let (labels, values, bar_len) = {
        let NodeKind::Plot(st) = &node.kind else { return };
        let Some(labels) = category_labels(model, &variable) else { return };
        let values: Vec<Option<Vec<f64>>> =
            st.series.iter().map(|s| resolve_series(model, s)).collect();
        (labels, values, st.bars.len())
    };

    // Category or series count changed under us: rebuild.
    if bar_len != labels.len() * values.len() {
        draw(node, model, tree);
        return;
    }

    let height = tree.rect(el).height;
    let plot_height = height - CAPTION_BAND;
    let max = max_across(&values, labels.len());

    let NodeKind::Plot(st) = &node.kind else { return };
    for i in 0..labels.len() {
        for (j, series) in values.iter().enumerate() {
            let bar = st.bars[i * values.len() + j];
            let value = series.as_ref().and_then(|v| v.get(i).copied()).unwrap_or(0.0);
            let h = bar_height(value, max, plot_height);

            let mut rect = tree.rect(bar);
            rect.y = plot_height - h;
            rect.height = h;
            tree.set_rect(bar, rect);
        }
    }
}

/// Map a (variable, index) highlight onto the one bar it addresses.
pub(crate) fn update_style(
    node: &BoundNode,
    active: bool,
    variable: &str,
    idx: Option<usize>,
    tree: &mut Tree,
) {
    let NodeKind::Plot(st) = &node.kind else { return };
    let Some(series_idx) = st.series.iter().position(|s| s == variable) else { return };
    let Some(idx) = idx else { return };

    let Some(&bar) = st.bars.get(idx * st.series.len() + series_idx) else { return };
    let Some(fill) = tree.attr(bar, "fill").and_then(Fill::parse) else { return };
    let next = if active { fill.highlighted() } else { fill.base() };
    tree.set_attr(bar, "fill", next.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot_doc() -> (Tree, Model, BoundNode) {
        let mut tree = Tree::new();
        let el = tree.create_element("div");
        let root = tree.root();
        tree.append_child(root, el);
        tree.set_data(el, attr::PLOT, "unit_names,costs_by_unit|kills_by_unit");
        tree.set_data(el, attr::YLABEL, "per unit");
        tree.set_rect(el, Rect::new(0.0, 0.0, 320.0, 120.0));

        let mut model = Model::new();
        model.set_value(
            "unit_names",
            Value::Labels(vec!["ant".into(), "bee".into()]),
        );
        model.set_value("costs_by_unit", Value::Series(vec![2.0, 4.0]));
        model.set_value("kills_by_unit", Value::Series(vec![10.0, 20.0]));

        let node = new_node(&tree, el).unwrap();
        (tree, model, node)
    }

    fn bar_rects(tree: &Tree, node: &BoundNode) -> Vec<Rect> {
        let NodeKind::Plot(st) = &node.kind else { panic!("expected plot") };
        st.bars.iter().map(|&b| tree.rect(b)).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_spec_parsing() {
        let (_, _, node) = plot_doc();
        assert_eq!(node.variable, "unit_names");
        let NodeKind::Plot(st) = &node.kind else { panic!("expected plot") };
        assert_eq!(st.series, vec!["costs_by_unit", "kills_by_unit"]);
        assert_eq!(st.y_label, "per unit");
        assert_eq!(
            node.variables(),
            vec!["unit_names", "costs_by_unit", "kills_by_unit"]
        );
    }

    #[test]
    fn test_ylabel_defaults_to_series() {
        let mut tree = Tree::new();
        let el = tree.create_element("div");
        let root = tree.root();
        tree.append_child(root, el);
        tree.set_data(el, attr::PLOT, "unit_names,costs_by_unit|kills_by_unit");

        let node = new_node(&tree, el).unwrap();
        let NodeKind::Plot(st) = &node.kind else { panic!("expected plot") };
        assert_eq!(st.y_label, "costs_by_unit, kills_by_unit");
    }

    #[test]
    fn test_draw_creates_bar_grid() {
        let (mut tree, model, mut node) = plot_doc();
        node.draw(&model, &mut tree);

        let rects = bar_rects(&tree, &node);
        assert_eq!(rects.len(), 4);

        // Shared maximum is 20; that bar fills the plot band.
        let plot_height = 120.0 - CAPTION_BAND;
        assert_eq!(rects[3].height, plot_height);
        assert_eq!(rects[3].y, 0.0);
        // costs bar for "ant" is 2/20 of the band.
        assert!(approx(rects[0].height, plot_height * 0.1));
        assert!(approx(rects[0].y, plot_height - rects[0].height));
    }

    #[test]
    fn test_series_fill_palettes() {
        let (mut tree, model, mut node) = plot_doc();
        node.draw(&model, &mut tree);

        let NodeKind::Plot(st) = &node.kind else { panic!("expected plot") };
        assert_eq!(tree.attr(st.bars[0], "fill"), Some("neutral"));
        assert_eq!(tree.attr(st.bars[1], "fill"), Some("accent"));
    }

    #[test]
    fn test_update_rewrites_extents_only() {
        let (mut tree, mut model, mut node) = plot_doc();
        node.draw(&model, &mut tree);
        let before = bar_rects(&tree, &node);

        model.set_element("kills_by_unit", 1, 40.0);
        node.update(&model, &mut tree);
        let after = bar_rects(&tree, &node);

        // x positions and widths are untouched.
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.x, a.x);
            assert_eq!(b.width, a.width);
        }
        // The grown value owns the full band; others rescale against max 40.
        let plot_height = 120.0 - CAPTION_BAND;
        assert_eq!(after[3].height, plot_height);
        assert!(approx(after[0].height, plot_height * 2.0 / 40.0));
    }

    #[test]
    fn test_update_rebuilds_on_growth() {
        let (mut tree, mut model, mut node) = plot_doc();
        node.draw(&model, &mut tree);

        model.set_value(
            "unit_names",
            Value::Labels(vec!["ant".into(), "bee".into(), "wasp".into()]),
        );
        model.set_value("costs_by_unit", Value::Series(vec![2.0, 4.0, 6.0]));
        model.set_value("kills_by_unit", Value::Series(vec![10.0, 20.0, 5.0]));
        node.update(&model, &mut tree);

        assert_eq!(bar_rects(&tree, &node).len(), 6);
    }

    #[test]
    fn test_inline_expression_series() {
        let mut tree = Tree::new();
        let el = tree.create_element("div");
        let root = tree.root();
        tree.append_child(root, el);
        tree.set_data(el, attr::PLOT, "unit_names,kills_by_unit / costs_by_unit");
        tree.set_rect(el, Rect::new(0.0, 0.0, 200.0, 100.0));

        let mut model = Model::new();
        model.set_value("unit_names", Value::Labels(vec!["ant".into(), "bee".into()]));
        model.set_value("costs_by_unit", Value::Series(vec![2.0, 4.0]));
        model.set_value("kills_by_unit", Value::Series(vec![10.0, 30.0]));

        let mut node = new_node(&tree, el).unwrap();
        node.draw(&model, &mut tree);

        // Ratios are 5 and 7.5; the larger fills the band.
        let rects = bar_rects(&tree, &node);
        let plot_height = 100.0 - CAPTION_BAND;
        assert_eq!(rects[1].height, plot_height);
        assert!(approx(rects[0].height, plot_height * 5.0 / 7.5));
    }

    #[test]
    fn test_unresolvable_series_draws_flat() {
        let (mut tree, mut model, mut node) = plot_doc();
        model.set_value("kills_by_unit", Value::Text("broken".into()));
        node.draw(&model, &mut tree);

        let rects = bar_rects(&tree, &node);
        assert_eq!(rects.len(), 4);
        assert_eq!(rects[1].height, 0.0);
        assert_eq!(rects[3].height, 0.0);
        // The resolvable series still scales against its own maximum.
        assert!(rects[2].height > 0.0);
    }

    #[test]
    fn test_update_style_maps_bar() {
        let (mut tree, model, mut node) = plot_doc();
        node.draw(&model, &mut tree);
        let NodeKind::Plot(st) = &node.kind else { panic!("expected plot") };
        let bars = st.bars.clone();

        // (kills_by_unit, category 1) maps to bar 1 * 2 + 1 = 3.
        node.update_style(true, "kills_by_unit", Some(1), &mut tree, &Default::default());
        assert_eq!(tree.attr(bars[3], "fill"), Some("accent-hi"));
        assert_eq!(tree.attr(bars[1], "fill"), Some("accent"));

        node.update_style(false, "kills_by_unit", Some(1), &mut tree, &Default::default());
        assert_eq!(tree.attr(bars[3], "fill"), Some("accent"));

        // The axis variable does not address any bar.
        node.update_style(true, "unit_names", Some(0), &mut tree, &Default::default());
        assert_eq!(tree.attr(bars[0], "fill"), Some("neutral"));
    }

    #[test]
    fn test_absent_axis_skips_draw() {
        let (mut tree, _, mut node) = plot_doc();
        let model = Model::new();
        node.draw(&model, &mut tree);

        assert!(!node.flags.contains(NodeFlags::DRAWN));
        assert!(bar_rects(&tree, &node).is_empty());
    }
}
