//! Splicing nested nodes into their parent scope.
//!
//! [`flatten`] takes a graph whose nodes may wrap inner graphs and produces a
//! single-level graph that computes the same thing. Every plain node is
//! copied exactly once, keyed by its original identifier, and every link
//! that crossed a nesting boundary is reconnected to the inner pin the
//! boundary was associated with.

use std::collections::HashMap;

use lineage_foundation::{Error, NodeId, PortKind, Result};
use tracing::debug;

use crate::graph::Graph;
use crate::nested::NestedNode;
use crate::node::{BasicNode, Node};
use crate::ports::Pin;

/// Nodes that may wrap an inner graph of their own kind.
pub trait Flatten: Node + Sized {
    /// Returns the nested view of this node, if it is one.
    fn as_nested(&self) -> Option<&NestedNode<Self>>;
}

impl Flatten for BasicNode {
    fn as_nested(&self) -> Option<&NestedNode<Self>> {
        None
    }
}

/// Resolved pins of one nested node in the flattened graph.
#[derive(Clone, Debug, Default)]
struct Boundary {
    inputs: Vec<Pin>,
    outputs: Vec<Pin>,
}

/// The result of [`flatten`]: a single-level graph plus the map back to it.
#[derive(Debug)]
pub struct Flattened<N> {
    /// The flattened graph.
    pub graph: Graph<N>,
    copies: HashMap<NodeId, NodeId>,
    boundaries: HashMap<NodeId, Boundary>,
}

impl<N: Flatten> Flattened<N> {
    /// Returns the identifier of the copy made of a plain node.
    #[must_use]
    pub fn copy_of(&self, original: NodeId) -> Option<NodeId> {
        self.copies.get(&original).copied()
    }

    /// Returns where input `index` of an original node ended up.
    ///
    /// For a nested node this is the inner input pin its input was associated
    /// with, resolved all the way down.
    ///
    /// # Errors
    ///
    /// Fails with `NodeNotFound` for nodes that were not part of the flattened
    /// graph and `PortOutOfRange` for bad indices.
    pub fn resolve_input(&self, original: NodeId, index: usize) -> Result<Pin> {
        if let Some(copy) = self.copies.get(&original) {
            return self.graph.node(*copy)?.input_pin(index);
        }
        let boundary = self
            .boundaries
            .get(&original)
            .ok_or_else(|| Error::node_not_found(original))?;
        boundary
            .inputs
            .get(index)
            .copied()
            .ok_or_else(|| Error::port_out_of_range(PortKind::Input, index, boundary.inputs.len()))
    }

    /// Returns where output `index` of an original node ended up.
    ///
    /// # Errors
    ///
    /// Fails like [`resolve_input`](Self::resolve_input).
    pub fn resolve_output(&self, original: NodeId, index: usize) -> Result<Pin> {
        if let Some(copy) = self.copies.get(&original) {
            return self.graph.node(*copy)?.output_pin(index);
        }
        let boundary = self
            .boundaries
            .get(&original)
            .ok_or_else(|| Error::node_not_found(original))?;
        boundary.outputs.get(index).copied().ok_or_else(|| {
            Error::port_out_of_range(PortKind::Output, index, boundary.outputs.len())
        })
    }
}

/// Flattens `graph`, splicing every nested node's inner graph in its place.
///
/// Node copies keep their evaluation state.
///
/// # Errors
///
/// Fails with `Unassociated` if a nested node has a port without an inner
/// pin, or with any error raised while reconnecting the copies.
pub fn flatten<N: Flatten>(graph: &Graph<N>) -> Result<Flattened<N>> {
    let mut flattened = Flattened {
        graph: Graph::new(),
        copies: HashMap::new(),
        boundaries: HashMap::new(),
    };
    flattened.copy_plain(graph);
    flattened.resolve_scope(graph)?;
    flattened.rewire(graph)?;
    debug!(
        original = graph.len(),
        flattened = flattened.graph.len(),
        "flattened graph"
    );
    Ok(flattened)
}

impl<N: Flatten> Flattened<N> {
    fn copy_plain(&mut self, scope: &Graph<N>) {
        for node in scope.iter() {
            if let Some(nested) = node.as_nested() {
                self.copy_plain(nested.inner());
            } else if !self.copies.contains_key(&node.id()) {
                let copy = node.clone_node(true);
                self.copies.insert(node.id(), copy.id());
                self.graph.add(copy);
            }
        }
    }

    fn resolve_scope(&mut self, scope: &Graph<N>) -> Result<()> {
        for node in scope.iter() {
            if let Some(nested) = node.as_nested() {
                self.resolve_nested(nested)?;
            }
        }
        Ok(())
    }

    fn resolve_nested(&mut self, nested: &NestedNode<N>) -> Result<()> {
        if self.boundaries.contains_key(&nested.id()) {
            return Ok(());
        }
        self.resolve_scope(nested.inner())?;
        let mut boundary = Boundary::default();
        for index in 0..nested.input_arity() {
            let pin = nested.input_association(index)?;
            boundary.inputs.push(self.resolve_input(pin.node, pin.index)?);
        }
        for index in 0..nested.output_arity() {
            let pin = nested.output_association(index)?;
            boundary.outputs.push(self.resolve_output(pin.node, pin.index)?);
        }
        self.boundaries.insert(nested.id(), boundary);
        Ok(())
    }

    fn rewire(&mut self, scope: &Graph<N>) -> Result<()> {
        for node in scope.iter() {
            for (output, pin) in node.ports().all_output_links() {
                if !scope.contains(pin.node) {
                    continue;
                }
                let from = self.resolve_output(node.id(), output)?;
                let to = self.resolve_input(pin.node, pin.index)?;
                self.graph.connect(from.node, from.index, to.node, to.index)?;
            }
            if let Some(nested) = node.as_nested() {
                self.rewire(nested.inner())?;
            }
        }
        Ok(())
    }
}
