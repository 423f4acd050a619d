//! Formula subsystem - restricted expressions over model variables.
//!
//! A formula is a small algebraic expression over variable identifiers,
//! evaluated with [`crate::vector::Vector`] semantics:
//!
//! ```text
//! reads_total / cells_total
//! sum(costs_by_unit) * scale_factor
//! max(damage_air / damage_cost)
//! ```
//!
//! The grammar is intentionally tiny: identifiers (five characters or more),
//! number literals, the reduction calls `max`/`min`/`sum` wrapping a
//! sub-expression, and at most one binary operator split per expression.
//! Formula text is compiled to an AST and interpreted directly; no code is
//! ever generated or dynamically evaluated.
//!
//! # Modules
//!
//! - [`parser`] - tokenizer and recursive-descent parser producing [`Expr`]
//! - [`eval`] - AST interpretation over a variable [`Resolver`]

pub mod eval;
pub mod parser;

pub use eval::{eval, Resolver};
pub use parser::{parse, Expr, Op, Reduction};

/// Faults raised while compiling or evaluating a formula.
///
/// Render paths treat every variant as "unresolved" and skip the node;
/// the distinction exists for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    /// The formula text does not fit the grammar.
    #[error("formula parse error: {0}")]
    Parse(String),

    /// An identifier resolved to nothing usable as a numeric value.
    #[error("unresolved variable `{0}`")]
    Unresolved(String),

    /// A formula depends on itself, directly or transitively.
    #[error("formula cycle through `{0}`")]
    Cycle(String),
}
