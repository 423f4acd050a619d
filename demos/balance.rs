//! Scripted walkthrough of a unit-balancing document.
//!
//! Builds a small document - a cost table with a draggable column, a derived
//! value readout, and a grouped bar plot - then replays the pointer gestures
//! a reader would make and prints the document state after each step.
//!
//! Run with: cargo run --example balance

use livebind::doc::{attr, class};
use livebind::{Model, NodeFlags, PointerEvent, Rect, Registry, Tree, Value};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("livebind=debug")),
        )
        .init();

    let mut tree = Tree::new();
    let root = tree.root();

    // "Each <unit> costs <cost> minerals; the swarm deals <value> damage per
    // mineral."
    let readout = tree.create_element("span");
    tree.set_data(readout, attr::ID, "value_per_cost");
    tree.set_data(readout, attr::FORMAT, "%.2f");
    tree.append_child(root, readout);

    let table = tree.create_element("table");
    tree.append_child(root, table);
    let head = tree.create_element("tr");
    tree.append_child(table, head);
    let tbody = tree.create_element("tbody");
    tree.append_child(table, tbody);

    let name_col = tree.create_element("var");
    tree.set_data(name_col, attr::ID, "unit_names");
    tree.append_child(head, name_col);

    let cost_col = tree.create_element("var");
    tree.set_data(cost_col, attr::ID, "costs_by_unit");
    tree.add_class(cost_col, class::ADJUSTABLE);
    tree.set_data(cost_col, attr::MIN, "25");
    tree.set_data(cost_col, attr::MAX, "400");
    tree.set_data(cost_col, attr::STEP, "25");
    tree.set_data(cost_col, attr::FORMAT, "%d");
    tree.append_child(head, cost_col);

    let plot = tree.create_element("div");
    tree.set_data(plot, attr::PLOT, "unit_names,damage_by_unit");
    tree.set_data(plot, attr::YLABEL, "damage");
    tree.set_rect(plot, Rect::new(240.0, 0.0, 320.0, 120.0));
    tree.append_child(root, plot);

    let mut model = Model::new();
    model.set_value(
        "unit_names",
        Value::Labels(vec!["zergling".into(), "roach".into(), "hydralisk".into()]),
    );
    model.set_value("costs_by_unit", Value::Series(vec![50.0, 75.0, 100.0]));
    model.set_value("damage_by_unit", Value::Series(vec![10.0, 16.0, 24.0]));
    model.set_formula(
        "value_per_cost",
        "sum(damage_by_unit) / sum(costs_by_unit)",
    );

    let mut registry = Registry::new();
    registry.scan(&mut tree, &mut model, root);
    registry.draw(&model, &mut tree);

    // The embedder owns layout: place the grown cost cells, then hand the
    // geometry to the registry for hit testing.
    let cost_cells: Vec<usize> = registry
        .outlets("costs_by_unit")
        .iter()
        .copied()
        .filter(|&i| registry.nodes()[i].flags.contains(NodeFlags::ADJUSTABLE))
        .collect();
    for (row, &i) in cost_cells.iter().enumerate() {
        let el = registry.nodes()[i].el;
        tree.set_rect(el, Rect::new(40.0, 20.0 + row as f64 * 16.0, 48.0, 16.0));
    }
    registry.refresh_hit_regions(&tree);

    println!("initial document:");
    print_state(&tree, &registry, readout);

    // Drag the zergling cost up by four steps (20 units of travel per step
    // scale: 5 units of pointer travel move one step).
    println!("\ndrag the zergling cost up by 100 minerals:");
    registry.dispatch_pointer(&mut tree, &mut model, PointerEvent::down(64.0, 28.0));
    registry.dispatch_pointer(&mut tree, &mut model, PointerEvent::move_to(84.0, 28.0));
    registry.dispatch_pointer(&mut tree, &mut model, PointerEvent::up(84.0, 28.0));
    print_state(&tree, &registry, readout);
}

fn print_state(tree: &Tree, registry: &Registry, readout: livebind::NodeId) {
    for &i in registry.outlets("unit_names") {
        let node = &registry.nodes()[i];
        if node.idx.is_none() {
            continue;
        }
        let row = node.idx.unwrap();
        let cost = registry
            .outlets("costs_by_unit")
            .iter()
            .copied()
            .find(|&c| registry.nodes()[c].idx == Some(row))
            .map(|c| tree.text(registry.nodes()[c].el).to_string())
            .unwrap_or_default();
        println!("  {:<10} {:>4} minerals", tree.text(node.el), cost);
    }
    println!("  damage per mineral: {}", tree.text(readout));
}
