//! Constants, pass-through, fan-out, and instrumentation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lineage_engine::{Atomic, Cause, Query};
use lineage_foundation::{Result, Value};

/// Emits a fixed value. Explanations stop here.
#[derive(Clone, Debug)]
pub struct Constant {
    value: Value,
}

impl Constant {
    /// Creates a constant.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the emitted value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Atomic for Constant {
    fn name(&self) -> &str {
        "constant"
    }

    fn arity(&self) -> (usize, usize) {
        (0, 1)
    }

    fn compute(&mut self, _inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(vec![self.value.clone()])
    }
}

/// Passes its input through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Atomic for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(inputs.to_vec())
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        Some(Cause::input_part(0, query.rest.clone()))
    }
}

/// Copies its input to each of its outputs.
#[derive(Clone, Copy, Debug)]
pub struct Fork {
    outputs: usize,
}

impl Fork {
    /// Creates a fork with `outputs` copies.
    #[must_use]
    pub fn new(outputs: usize) -> Self {
        Self { outputs }
    }
}

impl Atomic for Fork {
    fn name(&self) -> &str {
        "fork"
    }

    fn arity(&self) -> (usize, usize) {
        (1, self.outputs)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        Ok(vec![inputs[0].clone(); self.outputs])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        Some(Cause::input_part(0, query.rest.clone()))
    }
}

/// Wraps another behaviour and counts how often it computes.
///
/// Copies share the counter, so a count taken through one handle sees the
/// work done by every duplicate.
#[derive(Clone, Debug)]
pub struct CountingFunction<A> {
    inner: A,
    calls: Arc<AtomicUsize>,
}

impl<A: Atomic> CountingFunction<A> {
    /// Wraps `inner` with a fresh counter.
    #[must_use]
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns a handle to the shared counter.
    #[must_use]
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Returns the number of computations so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<A: Atomic> Atomic for CountingFunction<A> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn arity(&self) -> (usize, usize) {
        self.inner.arity()
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.compute(inputs)
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        self.inner.explain(query)
    }

    fn reset_state(&mut self) {
        self.inner.reset_state();
    }
}
