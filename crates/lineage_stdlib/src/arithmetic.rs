//! Arithmetic over integers and floats.
//!
//! Integer operands stay integers; any float operand promotes the result to
//! a float. Anything else is a type mismatch against [`Type::Number`].

use lineage_engine::{Atomic, Cause, Query};
use lineage_foundation::{Error, ErrorKind, Result, Type, Value};

// =============================================================================
// Helpers
// =============================================================================

fn not_a_number(value: &Value) -> Error {
    Error::type_mismatch(Type::Number, value.value_type())
}

fn overflow(op: &str) -> Error {
    Error::new(ErrorKind::Internal(format!("integer overflow in {op}")))
}

#[allow(clippy::cast_precision_loss)]
fn binary(
    a: &Value,
    b: &Value,
    op: &str,
    int: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> Result<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => int(*x, *y).map(Value::Int).ok_or_else(|| overflow(op)),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(float(*x, *y))),
        (Value::Int(x), Value::Float(y)) => Ok(Value::Float(float(*x as f64, *y))),
        (Value::Float(x), Value::Int(y)) => Ok(Value::Float(float(*x, *y as f64))),
        (Value::Int(_) | Value::Float(_), other) | (other, _) => Err(not_a_number(other)),
    }
}

pub(crate) fn add_values(a: &Value, b: &Value) -> Result<Value> {
    binary(a, b, "addition", i64::checked_add, |x, y| x + y)
}

fn sub_values(a: &Value, b: &Value) -> Result<Value> {
    binary(a, b, "subtraction", i64::checked_sub, |x, y| x - y)
}

fn mul_values(a: &Value, b: &Value) -> Result<Value> {
    binary(a, b, "multiplication", i64::checked_mul, |x, y| x * y)
}

fn div_values(a: &Value, b: &Value) -> Result<Value> {
    if b.is_zero() && a.as_number().is_some() {
        return Err(Error::new(ErrorKind::DivisionByZero));
    }
    binary(a, b, "division", i64::checked_div, |x, y| x / y)
}

fn neg_value(a: &Value) -> Result<Value> {
    match a {
        Value::Int(x) => x.checked_neg().map(Value::Int).ok_or_else(|| overflow("negation")),
        Value::Float(x) => Ok(Value::Float(-x)),
        other => Err(not_a_number(other)),
    }
}

pub(crate) fn fold(inputs: &[Value], unit: Value, op: fn(&Value, &Value) -> Result<Value>) -> Result<Value> {
    inputs.iter().try_fold(unit, |acc, value| op(&acc, value))
}

// =============================================================================
// Functions
// =============================================================================

/// Sums its inputs.
#[derive(Clone, Copy, Debug)]
pub struct Addition {
    arity: usize,
}

impl Addition {
    /// Creates a binary addition.
    #[must_use]
    pub fn new() -> Self {
        Self::with_arity(2)
    }

    /// Creates an addition of `arity` operands.
    #[must_use]
    pub fn with_arity(arity: usize) -> Self {
        Self { arity }
    }
}

impl Default for Addition {
    fn default() -> Self {
        Self::new()
    }
}

impl Atomic for Addition {
    fn name(&self) -> &str {
        "+"
    }

    fn arity(&self) -> (usize, usize) {
        (self.arity, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(vec![fold(inputs, Value::Int(0), add_values)?])
    }
}

/// Subtracts its second input from its first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Subtraction;

impl Atomic for Subtraction {
    fn name(&self) -> &str {
        "-"
    }

    fn arity(&self) -> (usize, usize) {
        (2, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(vec![sub_values(&inputs[0], &inputs[1])?])
    }
}

/// Multiplies its inputs.
///
/// A zero product is explained by its zero factors alone, joined by OR when
/// there are several.
#[derive(Clone, Copy, Debug)]
pub struct Multiplication {
    arity: usize,
}

impl Multiplication {
    /// Creates a binary multiplication.
    #[must_use]
    pub fn new() -> Self {
        Self::with_arity(2)
    }

    /// Creates a multiplication of `arity` operands.
    #[must_use]
    pub fn with_arity(arity: usize) -> Self {
        Self { arity }
    }
}

impl Default for Multiplication {
    fn default() -> Self {
        Self::new()
    }
}

impl Atomic for Multiplication {
    fn name(&self) -> &str {
        "*"
    }

    fn arity(&self) -> (usize, usize) {
        (self.arity, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(vec![fold(inputs, Value::Int(1), mul_values)?])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        if !query.outputs[0].is_zero() {
            return None;
        }
        let zeros: Vec<_> = query
            .inputs
            .iter()
            .enumerate()
            .filter(|(_, value)| value.is_zero())
            .map(|(i, _)| Cause::input(i))
            .collect();
        // An underflowed float product has no zero factor to blame.
        if zeros.is_empty() {
            return None;
        }
        Some(Cause::any(zeros))
    }
}

/// Divides its first input by its second.
#[derive(Clone, Copy, Debug, Default)]
pub struct Division;

impl Atomic for Division {
    fn name(&self) -> &str {
        "/"
    }

    fn arity(&self) -> (usize, usize) {
        (2, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(vec![div_values(&inputs[0], &inputs[1])?])
    }
}

/// Negates its input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Negation;

impl Atomic for Negation {
    fn name(&self) -> &str {
        "neg"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(vec![neg_value(&inputs[0])?])
    }
}
