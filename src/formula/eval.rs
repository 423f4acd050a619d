//! Formula evaluator - interprets the AST over vector semantics.
//!
//! Variable identifiers resolve through a [`Resolver`], which is how the data
//! model plugs in. The resolver carries the trail of formula variables
//! currently being evaluated so that self-referential definitions surface as
//! [`FormulaError::Cycle`] instead of unbounded recursion.

use super::parser::{Expr, Op, Reduction};
use super::FormulaError;
use crate::vector::Vector;

/// Variable lookup seam between the evaluator and the data model.
pub trait Resolver {
    /// Resolve a variable name to a numeric vector.
    ///
    /// `trail` lists the formula variables currently being evaluated further
    /// up the stack; implementations evaluating nested formulae must push the
    /// variable name around the nested evaluation and fail with
    /// [`FormulaError::Cycle`] on re-entry.
    fn resolve(&self, name: &str, trail: &mut Vec<String>) -> Result<Vector, FormulaError>;
}

/// Evaluate an expression to a vector value.
pub fn eval(
    expr: &Expr,
    vars: &dyn Resolver,
    trail: &mut Vec<String>,
) -> Result<Vector, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(Vector::Scalar(*n)),
        Expr::Ident(name) => vars.resolve(name, trail),
        Expr::Reduce { func, arg } => {
            let value = eval(arg, vars, trail)?;
            Ok(match func {
                Reduction::Max => value.max(),
                Reduction::Min => value.min(),
                Reduction::Sum => value.sum(),
            })
        }
        Expr::Binary { op, left, right } => {
            let lhs = eval(left, vars, trail)?;
            let rhs = eval(right, vars, trail)?;
            Ok(match op {
                Op::Add => lhs.add(&rhs),
                Op::Sub => lhs.sub(&rhs),
                Op::Mul => lhs.mul(&rhs),
                Op::Div => lhs.div(&rhs),
            })
        }
    }
}
