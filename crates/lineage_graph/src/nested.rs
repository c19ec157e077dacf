//! Nodes wrapping a private sub-graph.
//!
//! A [`NestedNode`] exposes ports of its own and associates each of them
//! with exactly one pin of an inner node. Its inputs feed inner inputs and
//! its outputs read inner outputs. Inner nodes that no association reaches
//! are allowed; they simply never take part in evaluation.

use std::collections::HashMap;

use lineage_foundation::{Error, NodeId, PortKind, Result};

use crate::graph::Graph;
use crate::node::Node;
use crate::ports::{Pin, Ports};

/// A node whose behaviour is an inner graph of other nodes.
#[derive(Clone, Debug)]
pub struct NestedNode<N> {
    ports: Ports,
    inner: Graph<N>,
    inputs: Vec<Option<Pin>>,
    outputs: Vec<Option<Pin>>,
}

impl<N: Node> NestedNode<N> {
    /// Creates an empty nested node with the given arity.
    #[must_use]
    pub fn new(input_arity: usize, output_arity: usize) -> Self {
        Self {
            ports: Ports::new(input_arity, output_arity),
            inner: Graph::new(),
            inputs: vec![None; input_arity],
            outputs: vec![None; output_arity],
        }
    }

    /// Returns the inner graph.
    #[must_use]
    pub fn inner(&self) -> &Graph<N> {
        &self.inner
    }

    /// Returns the inner graph mutably.
    pub fn inner_mut(&mut self) -> &mut Graph<N> {
        &mut self.inner
    }

    /// Adds a node to the inner graph.
    pub fn add(&mut self, node: N) -> NodeId {
        self.inner.add(node)
    }

    /// Connects two inner nodes.
    ///
    /// # Errors
    ///
    /// See [`Graph::connect`].
    pub fn connect(&mut self, from: NodeId, output: usize, to: NodeId, input: usize) -> Result<()> {
        self.inner.connect(from, output, to, input)
    }

    /// Associates input `index` of this node with input `input` of inner node `node`.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range, the inner node is unknown, or
    /// `input` is out of range for it.
    pub fn associate_input(&mut self, index: usize, node: NodeId, input: usize) -> Result<()> {
        let arity = self.inputs.len();
        let pin = self.inner.node(node)?.input_pin(input)?;
        let slot = self
            .inputs
            .get_mut(index)
            .ok_or_else(|| Error::port_out_of_range(PortKind::Input, index, arity))?;
        *slot = Some(pin);
        Ok(())
    }

    /// Associates output `index` of this node with output `output` of inner node `node`.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range, the inner node is unknown, or
    /// `output` is out of range for it.
    pub fn associate_output(&mut self, index: usize, node: NodeId, output: usize) -> Result<()> {
        let arity = self.outputs.len();
        let pin = self.inner.node(node)?.output_pin(output)?;
        let slot = self
            .outputs
            .get_mut(index)
            .ok_or_else(|| Error::port_out_of_range(PortKind::Output, index, arity))?;
        *slot = Some(pin);
        Ok(())
    }

    /// Returns the inner input pin fed by input `index`.
    ///
    /// # Errors
    ///
    /// Fails with `PortOutOfRange` or, if nothing was associated, `Unassociated`.
    pub fn input_association(&self, index: usize) -> Result<Pin> {
        let slot = self
            .inputs
            .get(index)
            .ok_or_else(|| Error::port_out_of_range(PortKind::Input, index, self.inputs.len()))?;
        slot.ok_or_else(|| Error::unassociated(PortKind::Input, index))
    }

    /// Returns the inner output pin read by output `index`.
    ///
    /// # Errors
    ///
    /// Fails with `PortOutOfRange` or, if nothing was associated, `Unassociated`.
    pub fn output_association(&self, index: usize) -> Result<Pin> {
        let slot = self
            .outputs
            .get(index)
            .ok_or_else(|| Error::port_out_of_range(PortKind::Output, index, self.outputs.len()))?;
        slot.ok_or_else(|| Error::unassociated(PortKind::Output, index))
    }

    /// Checks that every port is associated.
    ///
    /// # Errors
    ///
    /// Returns `Unassociated` for the first port without an association.
    pub fn validate(&self) -> Result<()> {
        for index in 0..self.inputs.len() {
            self.input_association(index)?;
        }
        for index in 0..self.outputs.len() {
            self.output_association(index)?;
        }
        Ok(())
    }

    /// Returns true if every port is associated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Returns the inputs of this node associated with the given inner input pin.
    #[must_use]
    pub fn inputs_feeding(&self, pin: Pin) -> Vec<usize> {
        self.inputs
            .iter()
            .enumerate()
            .filter(|(_, slot)| **slot == Some(pin))
            .map(|(i, _)| i)
            .collect()
    }

    /// Copies the inner graph under fresh identities and rewrites the associations.
    #[must_use]
    pub fn duplicate(&self, with_state: bool) -> Self {
        let (inner, map) = self.inner.duplicate(with_state);
        Self {
            ports: self.ports.fresh_copy(),
            inner,
            inputs: remap(&self.inputs, &map),
            outputs: remap(&self.outputs, &map),
        }
    }
}

fn remap(slots: &[Option<Pin>], map: &HashMap<NodeId, NodeId>) -> Vec<Option<Pin>> {
    slots
        .iter()
        .map(|slot| slot.and_then(|pin| map.get(&pin.node).map(|n| Pin::new(*n, pin.index))))
        .collect()
}

impl<N: Node> Node for NestedNode<N> {
    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn clone_node(&self, with_state: bool) -> Self {
        self.duplicate(with_state)
    }
}
