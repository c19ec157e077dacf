//! Functions over vectors.
//!
//! [`ApplyToAll`], [`ForAll`] and [`Exists`] run one independent duplicate
//! of an inner function per element. Explaining them traces the relevant
//! duplicates and rewrites whatever those say about "the input" into "element
//! n of input 0".

use lineage_engine::{Atomic, Cause, Function, Query};
use lineage_foundation::{Elements, Error, ErrorKind, Part, Result, Type, Value};
use lineage_graph::Node;
use tracing::trace;

use crate::arithmetic::{add_values, fold};

fn element_of_input(n: usize) -> Part {
    Part::Input(0).then(Part::Element(n))
}

fn length_value(len: usize) -> Result<Value> {
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| Error::new(ErrorKind::Internal(format!("length {len} exceeds i64"))))
}

// =============================================================================
// Per-element copies
// =============================================================================

/// A unary template function and one duplicate of it per element.
#[derive(Debug)]
struct Copies {
    template: Box<dyn Function>,
    copies: Vec<Box<dyn Function>>,
}

impl Copies {
    fn new(template: Box<dyn Function>) -> Result<Self> {
        if template.input_arity() != 1 {
            return Err(Error::arity_mismatch(1, template.input_arity()));
        }
        if template.output_arity() != 1 {
            return Err(Error::arity_mismatch(1, template.output_arity()));
        }
        Ok(Self {
            template,
            copies: Vec::new(),
        })
    }

    /// Evaluates one copy per element, reusing copies from earlier runs.
    ///
    /// On failure no copies are kept.
    fn apply(&mut self, elements: &Elements) -> Result<Vec<Value>> {
        let mut copies = std::mem::take(&mut self.copies);
        copies.truncate(elements.len());
        while copies.len() < elements.len() {
            copies.push(self.template.duplicate(false));
        }
        trace!(
            function = self.template.name(),
            elements = elements.len(),
            "applying to elements"
        );
        let results = copies
            .iter_mut()
            .zip(elements.iter())
            .enumerate()
            .map(|(n, (copy, element))| {
                copy.evaluate(std::slice::from_ref(element))
                    .map(|outputs| outputs[0].clone())
                    .map_err(|e| e.in_frame(format!("element {n}")))
            })
            .collect::<Result<Vec<_>>>()?;
        self.copies = copies;
        Ok(results)
    }

    /// Part `part` of copy `n`, seen through element `n` of input 0.
    fn through(&self, n: usize, part: Part) -> Cause<'_> {
        match self.copies.get(n) {
            Some(copy) => Cause::Through {
                function: &**copy,
                part,
                inputs: vec![element_of_input(n)],
            },
            None => Cause::Unknown,
        }
    }

    /// Element `n` of input 0, beneath the copy's explanation of it.
    fn witness(&self, n: usize) -> Cause<'_> {
        Cause::Witness {
            part: element_of_input(n),
            because: Box::new(self.through(n, Part::Output(0))),
        }
    }

    fn clear(&mut self) {
        self.copies.clear();
    }
}

impl Clone for Copies {
    fn clone(&self) -> Self {
        Self {
            template: self.template.duplicate(true),
            copies: self.copies.iter().map(|copy| copy.duplicate(true)).collect(),
        }
    }
}

// =============================================================================
// ApplyToAll
// =============================================================================

/// Maps a unary function over the elements of its input.
#[derive(Clone, Debug)]
pub struct ApplyToAll {
    inner: Copies,
}

impl ApplyToAll {
    /// Creates a map over `template`.
    ///
    /// # Errors
    ///
    /// Fails with `ArityMismatch` unless `template` has one input and one
    /// output.
    pub fn new(template: Box<dyn Function>) -> Result<Self> {
        Ok(Self {
            inner: Copies::new(template)?,
        })
    }

    /// Returns the duplicate evaluated on element `n`.
    #[must_use]
    pub fn copy(&self, n: usize) -> Option<&dyn Function> {
        self.inner.copies.get(n).map(|copy| &**copy)
    }
}

impl Atomic for ApplyToAll {
    fn name(&self) -> &str {
        "apply-to-all"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let elements = inputs[0].require_vector()?;
        let results = self.inner.apply(elements)?;
        Ok(vec![Value::from(results)])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        match query.rest.head() {
            Part::Element(n) => Some(
                self.inner
                    .through(*n, Part::Output(0).then(query.rest.tail())),
            ),
            Part::All if self.inner.copies.is_empty() => Some(Cause::input(0)),
            Part::All => Some(Cause::all(
                (0..self.inner.copies.len())
                    .map(|n| self.inner.through(n, Part::Output(0)))
                    .collect(),
            )),
            _ => None,
        }
    }

    fn reset_state(&mut self) {
        self.inner.clear();
    }
}

// =============================================================================
// Quantifiers
// =============================================================================

/// Evaluates a boolean condition on every element.
fn conditions(inner: &mut Copies, inputs: &[Value]) -> Result<Vec<bool>> {
    let elements = inputs[0].require_vector()?;
    inner
        .apply(elements)?
        .iter()
        .map(Value::require_bool)
        .collect()
}

/// Element witnesses whose condition came out as `wanted`.
fn witnesses(inner: &Copies, wanted: bool) -> Vec<Cause<'_>> {
    (0..inner.copies.len())
        .filter(|&n| {
            inner.copies[n]
                .last_outputs()
                .and_then(|outputs| outputs[0].as_bool())
                == Some(wanted)
        })
        .map(|n| inner.witness(n))
        .collect()
}

/// True when a condition holds for every element.
///
/// A true result is explained by every element with its condition; a false
/// one by any single counter-example.
#[derive(Clone, Debug)]
pub struct ForAll {
    inner: Copies,
}

impl ForAll {
    /// Creates a universal quantifier over `condition`.
    ///
    /// # Errors
    ///
    /// Fails with `ArityMismatch` unless `condition` has one input and one
    /// output.
    pub fn new(condition: Box<dyn Function>) -> Result<Self> {
        Ok(Self {
            inner: Copies::new(condition)?,
        })
    }
}

impl Atomic for ForAll {
    fn name(&self) -> &str {
        "for-all"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let holds = conditions(&mut self.inner, inputs)?;
        Ok(vec![Value::Bool(holds.into_iter().all(|b| b))])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        if self.inner.copies.is_empty() {
            return Some(Cause::input(0));
        }
        if query.outputs[0].as_bool()? {
            Some(Cause::all(witnesses(&self.inner, true)))
        } else {
            Some(Cause::any(witnesses(&self.inner, false)))
        }
    }

    fn reset_state(&mut self) {
        self.inner.clear();
    }
}

/// True when a condition holds for some element.
///
/// A true result is explained by any single witness; a false one by every
/// element with its condition.
#[derive(Clone, Debug)]
pub struct Exists {
    inner: Copies,
}

impl Exists {
    /// Creates an existential quantifier over `condition`.
    ///
    /// # Errors
    ///
    /// Fails with `ArityMismatch` unless `condition` has one input and one
    /// output.
    pub fn new(condition: Box<dyn Function>) -> Result<Self> {
        Ok(Self {
            inner: Copies::new(condition)?,
        })
    }
}

impl Atomic for Exists {
    fn name(&self) -> &str {
        "exists"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let holds = conditions(&mut self.inner, inputs)?;
        Ok(vec![Value::Bool(holds.into_iter().any(|b| b))])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        if self.inner.copies.is_empty() {
            return Some(Cause::input(0));
        }
        if query.outputs[0].as_bool()? {
            Some(Cause::any(witnesses(&self.inner, true)))
        } else {
            Some(Cause::all(witnesses(&self.inner, false)))
        }
    }

    fn reset_state(&mut self) {
        self.inner.clear();
    }
}

// =============================================================================
// Indexing and aggregates
// =============================================================================

/// Picks the element of its first input at the index given by its second.
///
/// Negative indices are out of bounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct NthElement;

impl Atomic for NthElement {
    fn name(&self) -> &str {
        "nth"
    }

    fn arity(&self) -> (usize, usize) {
        (2, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let elements = inputs[0].require_vector()?;
        let index = inputs[1]
            .as_int()
            .ok_or_else(|| Error::type_mismatch(Type::Int, inputs[1].value_type()))?;
        let index = usize::try_from(index).unwrap_or(usize::MAX);
        elements
            .get(index)
            .map(|element| vec![element.clone()])
            .ok_or_else(|| {
                Error::new(ErrorKind::IndexOutOfBounds {
                    index,
                    length: elements.len(),
                })
            })
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        let index = usize::try_from(query.inputs[1].as_int()?).ok()?;
        Some(Cause::all(vec![
            Cause::Part(element_of_input(index).then(query.rest.clone())),
            Cause::input(1),
        ]))
    }
}

/// The number of elements of its input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Length;

impl Atomic for Length {
    fn name(&self) -> &str {
        "length"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(vec![length_value(inputs[0].require_vector()?.len())?])
    }
}

/// The sum of the elements of its input.
///
/// Explained by every element jointly.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum;

impl Atomic for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let elements: Vec<Value> = inputs[0].require_vector()?.iter().cloned().collect();
        Ok(vec![fold(&elements, Value::Int(0), add_values)?])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        let len = query.inputs[0].as_vector()?.len();
        if len == 0 {
            return Some(Cause::input(0));
        }
        Some(Cause::all(
            (0..len).map(|n| Cause::Part(element_of_input(n))).collect(),
        ))
    }
}
