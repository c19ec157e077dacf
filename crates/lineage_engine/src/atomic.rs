//! Leaf functions.
//!
//! An [`Atomic`] supplies just the behaviour of a leaf: its arity, how it
//! computes, and optionally how it explains a result. [`AtomicFunction`]
//! wraps it with ports, a memo and the standard local explanation, which
//! makes it a full [`Function`].
//!
//! The standard explanation of any part of an output is an AND over every
//! input. Atomics with witness semantics return a [`Cause`] from
//! [`Atomic::explain`] naming only the inputs that actually decided the
//! result.

use std::fmt;
use std::sync::Arc;

use lineage_explain::{Explainable, NodeIndex, Quality, Subject, Tracer};
use lineage_foundation::{Error, ErrorKind, Part, Result, Value};
use lineage_graph::{Node, Ports};
use tracing::debug;

use crate::cause::Cause;
use crate::function::Function;
use crate::memo::Memo;

// =============================================================================
// Atomic
// =============================================================================

/// What is known when an evaluated atomic is asked to explain an output.
#[derive(Clone, Debug)]
pub struct Query<'a> {
    /// The output index the part starts at.
    pub output: usize,
    /// The rest of the part below that output.
    pub rest: Part,
    /// The inputs of the last evaluation.
    pub inputs: &'a [Value],
    /// The outputs of the last evaluation.
    pub outputs: &'a [Value],
}

/// The behaviour of a leaf function.
pub trait Atomic: Clone + fmt::Debug + Send + 'static {
    /// Returns the display name.
    fn name(&self) -> &str;

    /// Returns the `(inputs, outputs)` arity.
    fn arity(&self) -> (usize, usize);

    /// Computes one value per output.
    ///
    /// The argument count has already been checked against the arity.
    ///
    /// # Errors
    ///
    /// Type mismatches and evaluation faults.
    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>>;

    /// Explains an output of the last evaluation, overriding the standard
    /// AND over all inputs. `None` keeps the standard explanation.
    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        let _ = query;
        None
    }

    /// Drops any evaluation state beyond the memo.
    fn reset_state(&mut self) {}

    /// Wraps this behaviour into a function.
    fn into_function(self) -> AtomicFunction<Self> {
        AtomicFunction::new(self)
    }
}

// =============================================================================
// AtomicFunction
// =============================================================================

/// An [`Atomic`] with ports and a memo.
#[derive(Clone, Debug)]
pub struct AtomicFunction<A> {
    ports: Ports,
    atomic: A,
    memo: Memo,
}

impl<A: Atomic> AtomicFunction<A> {
    /// Wraps `atomic` under a fresh identity.
    #[must_use]
    pub fn new(atomic: A) -> Self {
        let (inputs, outputs) = atomic.arity();
        Self {
            ports: Ports::new(inputs, outputs),
            atomic,
            memo: Memo::new(),
        }
    }

    /// Returns the wrapped behaviour.
    #[must_use]
    pub fn atomic(&self) -> &A {
        &self.atomic
    }

    /// Boxes this function for use in a circuit.
    #[must_use]
    pub fn boxed(self) -> Box<dyn Function> {
        Box::new(self)
    }

    fn standard_cause(&self) -> Cause<'static> {
        Cause::all(
            (0..self.input_arity())
                .map(|i| Cause::Part(Part::Input(i)))
                .collect(),
        )
    }
}

impl<A: Atomic> Node for AtomicFunction<A> {
    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn clone_node(&self, with_state: bool) -> Self {
        let mut atomic = self.atomic.clone();
        let memo = if with_state {
            self.memo.clone()
        } else {
            atomic.reset_state();
            Memo::new()
        };
        Self {
            ports: self.ports.fresh_copy(),
            atomic,
            memo,
        }
    }

    fn label(&self) -> String {
        self.atomic.name().to_string()
    }
}

impl<A: Atomic> Function for AtomicFunction<A> {
    fn name(&self) -> &str {
        self.atomic.name()
    }

    fn evaluate(&mut self, inputs: &[Value]) -> Result<Arc<[Value]>> {
        let expected = self.input_arity();
        if inputs.len() != expected {
            return Err(Error::arity_mismatch(expected, inputs.len()));
        }
        if let Some(outputs) = self.memo.lookup(inputs) {
            debug!(function = self.atomic.name(), id = %self.id(), "memo hit");
            return Ok(outputs);
        }
        let outputs = match self.atomic.compute(inputs) {
            Ok(outputs) if outputs.len() == self.output_arity() => outputs,
            Ok(outputs) => {
                let err = Error::new(ErrorKind::Internal(format!(
                    "{} produced {} outputs, declared {}",
                    self.atomic.name(),
                    outputs.len(),
                    self.output_arity()
                )));
                self.reset();
                return Err(err);
            }
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };
        Ok(self.memo.store(inputs.to_vec(), outputs))
    }

    fn reset(&mut self) {
        self.memo.clear();
        self.atomic.reset_state();
    }

    fn duplicate(&self, with_state: bool) -> Box<dyn Function> {
        Box::new(self.clone_node(with_state))
    }

    fn memo(&self) -> &Memo {
        &self.memo
    }

    fn as_explainable(&self) -> &dyn Explainable {
        self
    }
}

impl<A: Atomic> Explainable for AtomicFunction<A> {
    fn subject(&self) -> Subject {
        Subject::node(self.id(), self.atomic.name())
    }

    fn explain(&self, part: &Part, root: NodeIndex, tracer: &mut Tracer) -> Result<()> {
        let Some(output) = part.mentioned_output() else {
            return Ok(());
        };
        if output >= self.output_arity() {
            let unknown = tracer.unknown();
            tracer.add_child(root, unknown);
            return Ok(());
        }
        let overridden = match (self.memo.inputs(), self.memo.outputs()) {
            (Some(inputs), Some(outputs)) => self.atomic.explain(&Query {
                output,
                rest: part.tail(),
                inputs,
                outputs,
            }),
            _ => None,
        };
        // Whole inputs over-approximate a part below the output.
        let (cause, quality) = match overridden {
            Some(cause) => (cause, Quality::Exact),
            None if part.tail().is_trivial() => (self.standard_cause(), Quality::Exact),
            None => (self.standard_cause(), Quality::Over),
        };
        if let Some(child) = cause.render(&self.subject(), tracer)? {
            tracer.add_child_with(root, child, quality);
        }
        Ok(())
    }
}
