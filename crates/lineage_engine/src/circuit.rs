//! Circuits: functions made of functions.
//!
//! A [`Circuit`] owns a [`NestedNode`] of boxed functions. Its inputs feed
//! associated inner input pins and its outputs read associated inner output
//! pins. Evaluation is pull-based: each output pulls its inner function,
//! which pulls whatever feeds its inputs, and so on. Every inner function
//! evaluates at most once per input set because pulled results are read
//! back from its memo.
//!
//! Explaining an output traces the associated inner function and then
//! links each place where that explanation stops at an inner input to
//! whatever feeds it: the upstream function's output (traced the same way,
//! recursively) or, at the circuit boundary, the circuit's own input.

use std::collections::HashMap;
use std::sync::Arc;

use lineage_explain::{Explainable, NodeIndex, Subject, Tracer};
use lineage_foundation::{Error, ErrorKind, NodeId, Part, Result, Value};
use lineage_graph::{Graph, NestedNode, Node, Pin, Ports, flatten};
use tracing::{debug, warn};

use crate::function::Function;
use crate::memo::Memo;

/// A function whose behaviour is an inner graph of functions.
#[derive(Debug)]
pub struct Circuit {
    name: String,
    nested: NestedNode<Box<dyn Function>>,
    memo: Memo,
}

impl Circuit {
    /// Creates an empty circuit with the given arity.
    #[must_use]
    pub fn new(name: impl Into<String>, input_arity: usize, output_arity: usize) -> Self {
        Self {
            name: name.into(),
            nested: NestedNode::new(input_arity, output_arity),
            memo: Memo::new(),
        }
    }

    /// Adds an inner function and returns its identifier.
    pub fn add<F: Function + 'static>(&mut self, function: F) -> NodeId {
        self.nested.add(Box::new(function))
    }

    /// Adds an already boxed inner function.
    pub fn add_boxed(&mut self, function: Box<dyn Function>) -> NodeId {
        self.nested.add(function)
    }

    /// Connects output `output` of inner function `from` to input `input` of `to`.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes, bad indices, or connections that would
    /// close a cycle.
    pub fn connect(&mut self, from: NodeId, output: usize, to: NodeId, input: usize) -> Result<()> {
        self.nested.connect(from, output, to, input)
    }

    /// Feeds circuit input `index` into input `input` of inner function `node`.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes or bad indices.
    pub fn associate_input(&mut self, index: usize, node: NodeId, input: usize) -> Result<()> {
        self.nested.associate_input(index, node, input)
    }

    /// Reads circuit output `index` from output `output` of inner function `node`.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes or bad indices.
    pub fn associate_output(&mut self, index: usize, node: NodeId, output: usize) -> Result<()> {
        self.nested.associate_output(index, node, output)
    }

    /// Returns an inner function.
    #[must_use]
    pub fn function(&self, id: NodeId) -> Option<&dyn Function> {
        self.nested.inner().get(id).map(|f| &**f)
    }

    /// Returns the nested view of this circuit.
    #[must_use]
    pub fn nested(&self) -> &NestedNode<Box<dyn Function>> {
        &self.nested
    }

    /// Returns an equivalent circuit with every nested circuit spliced in.
    ///
    /// Inner functions are copied with their state; the result itself
    /// starts unevaluated.
    ///
    /// # Errors
    ///
    /// Fails if this circuit or any circuit inside it has an unassociated port.
    pub fn flatten(&self) -> Result<Circuit> {
        self.nested
            .validate()
            .map_err(|e| e.in_frame(self.name.clone()))?;
        let flattened = flatten(self.nested.inner())?;
        let inputs: Vec<Pin> = (0..self.input_arity())
            .map(|index| {
                let pin = self.nested.input_association(index)?;
                flattened.resolve_input(pin.node, pin.index)
            })
            .collect::<Result<_>>()?;
        let outputs: Vec<Pin> = (0..self.output_arity())
            .map(|index| {
                let pin = self.nested.output_association(index)?;
                flattened.resolve_output(pin.node, pin.index)
            })
            .collect::<Result<_>>()?;
        let mut nested = NestedNode::new(self.input_arity(), self.output_arity());
        *nested.inner_mut() = flattened.graph;
        for (index, pin) in inputs.into_iter().enumerate() {
            nested.associate_input(index, pin.node, pin.index)?;
        }
        for (index, pin) in outputs.into_iter().enumerate() {
            nested.associate_output(index, pin.node, pin.index)?;
        }
        debug!(circuit = %self.name, functions = nested.inner().len(), "flattened circuit");
        Ok(Circuit {
            name: self.name.clone(),
            nested,
            memo: Memo::new(),
        })
    }

    fn reset_inner(&mut self) {
        for function in self.nested.inner_mut().iter_mut() {
            function.reset();
        }
    }

    fn pull_outputs(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let mut feeds = HashMap::new();
        for index in 0..self.input_arity() {
            feeds
                .entry(self.nested.input_association(index)?)
                .or_insert(index);
        }
        let mut outputs = Vec::with_capacity(self.output_arity());
        for index in 0..self.output_arity() {
            let pin = self.nested.output_association(index)?;
            let values = pull(self.nested.inner_mut(), &feeds, inputs, pin.node)?;
            outputs.push(output_value(&values, pin)?);
        }
        Ok(outputs)
    }

    fn trace_pin(
        &self,
        id: NodeId,
        output: usize,
        rest: Part,
        tracer: &mut Tracer,
    ) -> Result<NodeIndex> {
        let function = self.nested.inner().node(id)?;
        let subject = function.subject();
        let part = Part::Output(output).then(rest);
        let (node, fresh) = tracer.trace_fresh(&part, function.as_explainable())?;
        if !fresh {
            return Ok(node);
        }
        for leaf in tracer.frontier(node, &subject) {
            let Some(leaf_part) = tracer.graph()[leaf].part().cloned() else {
                continue;
            };
            let Some(input) = leaf_part.mentioned_input() else {
                continue;
            };
            let rest = leaf_part.tail();
            let feeding = self.nested.inputs_feeding(Pin::new(id, input));
            let child = if let Some(&index) = feeding.first() {
                tracer.leaf(Part::Input(index).then(rest), self.subject())
            } else if let Some(upstream) = function.ports().upstream(input)? {
                self.trace_pin(upstream.node, upstream.index, rest, tracer)?
            } else {
                warn!(
                    circuit = %self.name,
                    function = %subject,
                    input,
                    "unconnected input in explanation"
                );
                tracer.unknown()
            };
            tracer.add_child(leaf, child);
        }
        Ok(node)
    }
}

/// Returns the outputs of inner function `id`, evaluating it (and, first,
/// everything feeding it) unless it already ran for the current inputs.
fn pull(
    inner: &mut Graph<Box<dyn Function>>,
    feeds: &HashMap<Pin, usize>,
    args: &[Value],
    id: NodeId,
) -> Result<Arc<[Value]>> {
    let function = inner.node(id)?;
    if let Some(outputs) = function.memo().outputs() {
        return Ok(outputs.clone());
    }
    let arity = function.input_arity();
    let mut values = Vec::with_capacity(arity);
    for index in 0..arity {
        if let Some(&feed) = feeds.get(&Pin::new(id, index)) {
            values.push(args[feed].clone());
            continue;
        }
        match inner.node(id)?.ports().upstream(index)? {
            Some(upstream) => {
                let outputs = pull(inner, feeds, args, upstream.node)?;
                values.push(output_value(&outputs, upstream)?);
            }
            None => return Err(Error::unconnected(id, index)),
        }
    }
    inner.node_mut(id)?.evaluate(&values)
}

fn output_value(values: &[Value], pin: Pin) -> Result<Value> {
    values.get(pin.index).cloned().ok_or_else(|| {
        Error::new(ErrorKind::Internal(format!(
            "{pin} read past {} outputs",
            values.len()
        )))
    })
}

impl Node for Circuit {
    fn ports(&self) -> &Ports {
        self.nested.ports()
    }

    fn ports_mut(&mut self) -> &mut Ports {
        self.nested.ports_mut()
    }

    fn clone_node(&self, with_state: bool) -> Self {
        Self {
            name: self.name.clone(),
            nested: self.nested.duplicate(with_state),
            memo: if with_state {
                self.memo.clone()
            } else {
                Memo::new()
            },
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Function for Circuit {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&mut self, inputs: &[Value]) -> Result<Arc<[Value]>> {
        self.nested
            .validate()
            .map_err(|e| e.in_frame(self.name.clone()))?;
        let expected = self.input_arity();
        if inputs.len() != expected {
            return Err(Error::arity_mismatch(expected, inputs.len()).in_frame(self.name.clone()));
        }
        if let Some(outputs) = self.memo.lookup(inputs) {
            debug!(circuit = %self.name, "memo hit");
            return Ok(outputs);
        }
        debug!(circuit = %self.name, functions = self.nested.inner().len(), "evaluating circuit");
        self.reset_inner();
        match self.pull_outputs(inputs) {
            Ok(outputs) => Ok(self.memo.store(inputs.to_vec(), outputs)),
            Err(e) => {
                // Inner state no longer backs the old outputs.
                self.memo.clear();
                Err(e.in_frame(self.name.clone()))
            }
        }
    }

    fn reset(&mut self) {
        self.memo.clear();
        self.reset_inner();
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

    fn as_circuit(&self) -> Option<&Circuit> {
        Some(self)
    }
}

impl Explainable for Circuit {
    fn subject(&self) -> Subject {
        Subject::node(self.id(), self.name.as_str())
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
        let pin = self
            .nested
            .output_association(output)
            .map_err(|e| e.in_frame(self.name.clone()))?;
        let child = self
            .trace_pin(pin.node, pin.index, part.tail(), tracer)
            .map_err(|e| e.in_frame(self.name.clone()))?;
        tracer.add_child(root, child);
        Ok(())
    }
}
