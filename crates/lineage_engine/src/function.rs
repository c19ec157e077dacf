//! The function contract.
//!
//! A [`Function`] is a graph node that computes outputs from inputs,
//! remembers its last evaluation, and can explain parts of its outputs in
//! terms of parts of its inputs. Functions live in graphs as
//! `Box<dyn Function>`; the box implements [`Node`] and [`Flatten`] so the
//! substrate's traversal and flattening work on it directly.

use std::fmt;
use std::sync::Arc;

use lineage_explain::Explainable;
use lineage_foundation::{Result, Value};
use lineage_graph::{Flatten, NestedNode, Node, Ports};

use crate::circuit::Circuit;
use crate::memo::Memo;

/// A computation unit of a circuit.
pub trait Function: Node + Explainable + Send + fmt::Debug {
    /// Returns the display name.
    fn name(&self) -> &str;

    /// Computes outputs from `inputs`.
    ///
    /// Evaluating again with equal inputs returns the cached outputs (the
    /// same allocation) without recomputing, until [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// Fails with `ArityMismatch` when `inputs` does not match the input
    /// arity, and with whatever the computation itself raises.
    fn evaluate(&mut self, inputs: &[Value]) -> Result<Arc<[Value]>>;

    /// Clears the memo and any evaluation state.
    fn reset(&mut self);

    /// Returns an independent copy with fresh identities.
    ///
    /// With `with_state` the copy starts out with this function's memo and
    /// state; otherwise it starts unevaluated.
    fn duplicate(&self, with_state: bool) -> Box<dyn Function>;

    /// Returns the memo.
    fn memo(&self) -> &Memo;

    /// Returns this function as an explainable subject.
    fn as_explainable(&self) -> &dyn Explainable;

    /// Returns the circuit view of this function, if it is one.
    fn as_circuit(&self) -> Option<&Circuit> {
        None
    }

    /// Returns the inputs of the last evaluation.
    fn last_inputs(&self) -> Option<&[Value]> {
        self.memo().inputs()
    }

    /// Returns the outputs of the last evaluation.
    fn last_outputs(&self) -> Option<&[Value]> {
        self.memo().outputs().map(|outputs| &outputs[..])
    }

    /// Returns true if the function has been evaluated since the last reset.
    fn is_evaluated(&self) -> bool {
        self.memo().is_evaluated()
    }
}

impl Node for Box<dyn Function> {
    fn ports(&self) -> &Ports {
        (**self).ports()
    }

    fn ports_mut(&mut self) -> &mut Ports {
        (**self).ports_mut()
    }

    fn clone_node(&self, with_state: bool) -> Self {
        self.duplicate(with_state)
    }

    fn label(&self) -> String {
        (**self).label()
    }
}

impl Flatten for Box<dyn Function> {
    fn as_nested(&self) -> Option<&NestedNode<Self>> {
        self.as_circuit().map(Circuit::nested)
    }
}
