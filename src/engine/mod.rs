//! Binding engine - bound nodes and the registry that fans out to them.
//!
//! The engine manages the core structures:
//! - Registry: scan/classify, variable-keyed fan-out, pointer routing
//! - BoundNode: the shared node shape with a tagged behavior variant
//! - Kind modules: display, adjustable, table, plot, selection
//!
//! # Architecture
//!
//! A scan pass walks a snapshot of the document tree, classifies every
//! element carrying binding attributes, and registers one node per binding
//! under each variable it depends on. Model mutations then fan out through
//! `Registry::update`; highlight changes through
//! `Registry::set_variable_hovering`.

pub mod adjustable;
pub mod display;
pub mod node;
pub mod plot;
pub mod registry;
pub mod selection;
pub mod table;

pub use adjustable::{AdjustState, Bounds};
pub use node::{BoundNode, NodeKind};
pub use plot::PlotState;
pub use registry::Registry;
pub use selection::SelectionNode;
pub use table::TableState;
