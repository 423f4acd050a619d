//! Data model - named variables backing every bound node.
//!
//! A variable maps to either a raw value or a formula (an expression over
//! other variables). Raw lookup always wins when both are present. Formulae
//! compile once per literal source string; the compiled AST is memoized for
//! the lifetime of the model, so re-resolving an unchanged formula reuses the
//! cached program while edits to the underlying data flow through on every
//! evaluation.
//!
//! Absence is a normal, checked outcome: `get` returns `None` both for
//! variables that were never defined and for formulae that fault, and render
//! paths skip the node. Faults are still logged so malformed formulae can be
//! diagnosed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::formula::{self, Expr, FormulaError, Resolver};
use crate::vector::Vector;

// =============================================================================
// Value
// =============================================================================

/// A raw variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    /// Ordered sequence of numbers.
    Series(Vec<f64>),
    /// Ordered sequence of labels (a plot's category axis).
    Labels(Vec<String>),
}

impl Value {
    /// Numeric view for formula evaluation; text values have none.
    pub fn as_vector(&self) -> Option<Vector> {
        match self {
            Value::Number(n) => Some(Vector::Scalar(*n)),
            Value::Series(v) => Some(Vector::Seq(v.clone())),
            Value::Text(_) | Value::Labels(_) => None,
        }
    }

    /// Sequence length; 0 for scalar values.
    pub fn len(&self) -> usize {
        match self {
            Value::Series(v) => v.len(),
            Value::Labels(v) => v.len(),
            Value::Number(_) | Value::Text(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        match v {
            Vector::Scalar(n) => Value::Number(n),
            Vector::Seq(s) => Value::Series(s),
        }
    }
}

// =============================================================================
// Model
// =============================================================================

/// The shared variable store: raw values, formulae, and the compile cache.
#[derive(Debug, Default)]
pub struct Model {
    values: HashMap<String, Value>,
    formulae: HashMap<String, String>,
    compiled: RefCell<HashMap<String, Rc<Expr>>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or replace a raw value.
    pub fn set_value(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Define or replace a formula. Raw-value lookup still wins if the
    /// variable also has a raw value.
    pub fn set_formula(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.formulae.insert(name.into(), source.into());
    }

    /// Replace one element of a sequence variable.
    ///
    /// The whole sequence value is replaced (copy-on-write at variable
    /// granularity), so holders of a previously read value never observe the
    /// edit. Writing out of range is a caller contract violation.
    pub fn set_element(&mut self, name: &str, idx: usize, value: f64) {
        let Some(Value::Series(current)) = self.values.get(name) else {
            debug_assert!(false, "set_element on non-sequence variable `{name}`");
            return;
        };
        debug_assert!(idx < current.len(), "set_element index {idx} out of range");
        if idx >= current.len() {
            return;
        }
        let mut next = current.clone();
        next[idx] = value;
        self.values.insert(name.to_string(), Value::Series(next));
    }

    /// Resolve a variable: raw value first, then formula evaluation, else
    /// `None`. Formula faults also yield `None` and are logged.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        if self.formulae.contains_key(name) {
            let mut trail = Vec::new();
            match self.resolve(name, &mut trail) {
                Ok(vector) => return Some(vector.into()),
                Err(err) => {
                    debug!(variable = name, %err, "formula did not resolve");
                    return None;
                }
            }
        }
        None
    }

    /// Evaluate a formula string against the current model state.
    ///
    /// The compiled AST is cached under the literal source text; a different
    /// string compiles fresh, the same string reuses the cache.
    pub fn compute(&self, source: &str) -> Result<Vector, FormulaError> {
        let expr = self.compile(source)?;
        formula::eval(&expr, self, &mut Vec::new())
    }

    /// True when the variable has a raw value or a formula.
    pub fn is_defined(&self, name: &str) -> bool {
        self.values.contains_key(name) || self.formulae.contains_key(name)
    }

    fn compile(&self, source: &str) -> Result<Rc<Expr>, FormulaError> {
        if let Some(expr) = self.compiled.borrow().get(source) {
            return Ok(expr.clone());
        }
        // Only successful compiles are cached; a malformed string re-parses
        // on each attempt so a later corrected definition is not shadowed.
        let expr = Rc::new(formula::parse(source)?);
        self.compiled
            .borrow_mut()
            .insert(source.to_string(), expr.clone());
        Ok(expr)
    }

    /// Number of memoized compiled formulae.
    pub fn compiled_count(&self) -> usize {
        self.compiled.borrow().len()
    }
}

impl Resolver for Model {
    fn resolve(&self, name: &str, trail: &mut Vec<String>) -> Result<Vector, FormulaError> {
        if let Some(value) = self.values.get(name) {
            return value
                .as_vector()
                .ok_or_else(|| FormulaError::Unresolved(name.to_string()));
        }
        let Some(source) = self.formulae.get(name) else {
            return Err(FormulaError::Unresolved(name.to_string()));
        };
        if trail.iter().any(|v| v == name) {
            return Err(FormulaError::Cycle(name.to_string()));
        }
        trail.push(name.to_string());
        let expr = self.compile(source)?;
        let result = formula::eval(&expr, self, trail);
        trail.pop();
        result
    }
}
