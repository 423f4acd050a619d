//! # livebind
//!
//! Reactive data-binding engine for live documents.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! shared interaction state.
//!
//! ## Architecture
//!
//! A document mixes static text with computed, user-adjustable values. The
//! engine scans the element tree once for binding attributes, wires each
//! bound element to one or more named variables in a shared data model, and
//! keeps the rendered values synchronized with model changes - including
//! changes the user makes by dragging a value directly in the output.
//!
//! ```text
//! Registry scan -> node instantiation -> draw
//!       -> (drag / selection writes model) -> update fan-out
//! ```
//!
//! A variable holds either a raw value or a formula over other variables;
//! formulae compile once per source string to a small AST interpreted with
//! broadcasting vector semantics. Dragging is exclusive: one active drag at
//! a time, and while it lasts, hover highlighting everywhere else is
//! suppressed.
//!
//! ## Modules
//!
//! - [`doc`] - element tree arena, binding attribute schema
//! - [`model`] - variable store, formula memoization
//! - [`vector`] - scalar-or-sequence values, broadcasting, reductions
//! - [`formula`] - expression parser and interpreter
//! - [`engine`] - bound nodes, registry, fan-out, pointer routing
//! - [`state`] - interaction exclusivity, pointer events, hit testing
//! - [`format`] - printf-style value formatting

pub mod doc;
pub mod engine;
pub mod format;
pub mod formula;
pub mod model;
pub mod state;
pub mod types;
pub mod vector;

// Re-export commonly used items
pub use types::*;

pub use doc::{NodeId, Tree};

pub use engine::{BoundNode, Bounds, NodeKind, Registry, SelectionNode};

pub use formula::FormulaError;

pub use model::{Model, Value};

pub use state::{
    HitMap, HitRegion, HitTarget, InteractionState, PointerAction, PointerEvent,
};

pub use vector::Vector;
