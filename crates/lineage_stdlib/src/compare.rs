//! Ordering and equality tests.

use std::cmp::Ordering;

use lineage_engine::Atomic;
use lineage_foundation::{Error, Result, Type, Value};

/// Orders two numbers or two strings.
fn compare_values(a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_))
        | (Value::String(_), Value::String(_)) => {
            // NaN is unordered and compares as neither greater nor less.
            Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal))
        }
        (Value::String(_), other) => Err(Error::type_mismatch(Type::String, other.value_type())),
        (Value::Int(_) | Value::Float(_), other) | (other, _) => {
            Err(Error::type_mismatch(Type::Number, other.value_type()))
        }
    }
}

/// Tests whether the first input is greater than the second.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreaterThan;

impl Atomic for GreaterThan {
    fn name(&self) -> &str {
        ">"
    }

    fn arity(&self) -> (usize, usize) {
        (2, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let ord = compare_values(&inputs[0], &inputs[1])?;
        Ok(vec![Value::Bool(ord == Ordering::Greater)])
    }
}

/// Tests whether the first input is less than the second.
#[derive(Clone, Copy, Debug, Default)]
pub struct LessThan;

impl Atomic for LessThan {
    fn name(&self) -> &str {
        "<"
    }

    fn arity(&self) -> (usize, usize) {
        (2, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let ord = compare_values(&inputs[0], &inputs[1])?;
        Ok(vec![Value::Bool(ord == Ordering::Less)])
    }
}

/// Tests two values for equality. Integers and floats compare numerically.
#[derive(Clone, Copy, Debug, Default)]
pub struct Equals;

impl Atomic for Equals {
    fn name(&self) -> &str {
        "="
    }

    fn arity(&self) -> (usize, usize) {
        (2, 1)
    }

    #[allow(clippy::float_cmp)]
    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let (a, b) = (&inputs[0], &inputs[1]);
        let equal = match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        };
        Ok(vec![Value::Bool(equal)])
    }
}
