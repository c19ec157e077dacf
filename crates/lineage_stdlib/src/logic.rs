//! Boolean connectives and conditional choice.
//!
//! The connectives report witnesses: a false conjunction is explained by
//! its false operands, a true disjunction by its true operands. Either one
//! alone suffices, so several witnesses are joined by OR. In the other case
//! every operand was needed and they are joined by AND.

use lineage_engine::{Atomic, Cause, Query};
use lineage_foundation::{Result, Value};

/// The operands equal to `wanted`, as alternative causes.
fn witnesses(inputs: &[Value], wanted: bool) -> Cause<'static> {
    Cause::any(
        inputs
            .iter()
            .enumerate()
            .filter(|(_, value)| value.as_bool() == Some(wanted))
            .map(|(i, _)| Cause::input(i))
            .collect(),
    )
}

fn require_bools(inputs: &[Value]) -> Result<Vec<bool>> {
    inputs.iter().map(Value::require_bool).collect()
}

/// Conjunction of its inputs.
#[derive(Clone, Copy, Debug)]
pub struct And {
    arity: usize,
}

impl And {
    /// Creates a binary conjunction.
    #[must_use]
    pub fn new() -> Self {
        Self::with_arity(2)
    }

    /// Creates a conjunction of `arity` operands.
    #[must_use]
    pub fn with_arity(arity: usize) -> Self {
        Self { arity }
    }
}

impl Default for And {
    fn default() -> Self {
        Self::new()
    }
}

impl Atomic for And {
    fn name(&self) -> &str {
        "and"
    }

    fn arity(&self) -> (usize, usize) {
        (self.arity, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let operands = require_bools(inputs)?;
        Ok(vec![Value::Bool(operands.into_iter().all(|b| b))])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        match query.outputs[0].as_bool() {
            Some(false) => Some(witnesses(query.inputs, false)),
            _ => None,
        }
    }
}

/// Disjunction of its inputs.
#[derive(Clone, Copy, Debug)]
pub struct Or {
    arity: usize,
}

impl Or {
    /// Creates a binary disjunction.
    #[must_use]
    pub fn new() -> Self {
        Self::with_arity(2)
    }

    /// Creates a disjunction of `arity` operands.
    #[must_use]
    pub fn with_arity(arity: usize) -> Self {
        Self { arity }
    }
}

impl Default for Or {
    fn default() -> Self {
        Self::new()
    }
}

impl Atomic for Or {
    fn name(&self) -> &str {
        "or"
    }

    fn arity(&self) -> (usize, usize) {
        (self.arity, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let operands = require_bools(inputs)?;
        Ok(vec![Value::Bool(operands.into_iter().any(|b| b))])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        match query.outputs[0].as_bool() {
            Some(true) => Some(witnesses(query.inputs, true)),
            _ => None,
        }
    }
}

/// Negation of a boolean.
#[derive(Clone, Copy, Debug, Default)]
pub struct Not;

impl Atomic for Not {
    fn name(&self) -> &str {
        "not"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(vec![Value::Bool(!inputs[0].require_bool()?)])
    }
}

/// Chooses between its second and third input on its first.
///
/// The result is explained by the condition together with the taken branch.
/// When both branches hold the same value the condition did not matter and
/// only the taken branch is reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct IfThenElse;

impl IfThenElse {
    fn taken(condition: &Value) -> Result<usize> {
        Ok(if condition.require_bool()? { 1 } else { 2 })
    }
}

impl Atomic for IfThenElse {
    fn name(&self) -> &str {
        "if"
    }

    fn arity(&self) -> (usize, usize) {
        (3, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let taken = Self::taken(&inputs[0])?;
        Ok(vec![inputs[taken].clone()])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        let taken = Self::taken(&query.inputs[0]).ok()?;
        let branch = Cause::input_part(taken, query.rest.clone());
        if query.inputs[1] == query.inputs[2] {
            Some(branch)
        } else {
            Some(Cause::all(vec![Cause::input(0), branch]))
        }
    }
}
