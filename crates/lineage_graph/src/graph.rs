//! An arena of connected nodes.
//!
//! [`Graph`] owns its nodes and keys them by [`NodeId`]. Links are stored on
//! the nodes' own ports; the graph keeps both sides of every connection in
//! step and refuses connections that would make it cyclic.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use lineage_foundation::{Error, NodeId, Result};
use tracing::trace;

use crate::node::Node;
use crate::ports::Pin;

/// A collection of nodes connected pin to pin.
///
/// Iteration follows identifier order, which is creation order.
#[derive(Clone, Debug)]
pub struct Graph<N> {
    nodes: BTreeMap<NodeId, N>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }
}

impl<N: Node> Graph<N> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its identifier.
    pub fn add(&mut self, node: N) -> NodeId {
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    /// Returns the node with the given identifier, if present.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(&id)
    }

    /// Returns the node with the given identifier mutably, if present.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(&id)
    }

    /// Returns the node with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the graph has no such node.
    pub fn node(&self, id: NodeId) -> Result<&N> {
        self.get(id).ok_or_else(|| Error::node_not_found(id))
    }

    /// Returns the node with the given identifier mutably.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the graph has no such node.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut N> {
        self.get_mut(id).ok_or_else(|| Error::node_not_found(id))
    }

    /// Removes a node, dropping every link to it from its neighbours.
    pub fn remove(&mut self, id: NodeId) -> Option<N> {
        let mut node = self.nodes.remove(&id)?;
        let upstream: Vec<_> = node.ports().all_input_links().collect();
        let downstream: Vec<_> = node.ports().all_output_links().collect();
        for (input, pin) in upstream {
            if let Some(other) = self.nodes.get_mut(&pin.node) {
                let _ = other
                    .ports_mut()
                    .remove_from_output(pin.index, Pin::new(id, input));
            }
        }
        for (output, pin) in downstream {
            if let Some(other) = self.nodes.get_mut(&pin.node) {
                let _ = other
                    .ports_mut()
                    .remove_from_input(pin.index, Pin::new(id, output));
            }
        }
        node.ports_mut().clear_links();
        Some(node)
    }

    /// Returns true if the graph holds a node with this identifier.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over node identifiers.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Iterates over nodes.
    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    /// Iterates over nodes mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut N> {
        self.nodes.values_mut()
    }

    /// Connects output `output` of `from` to input `input` of `to`.
    ///
    /// Both nodes record the link.
    ///
    /// # Errors
    ///
    /// Fails with `NodeNotFound` for unknown nodes, `PortOutOfRange` for bad
    /// indices, and `Cycle` if `to` already reaches `from`.
    pub fn connect(&mut self, from: NodeId, output: usize, to: NodeId, input: usize) -> Result<()> {
        let source = self.node(from)?.output_pin(output)?;
        let target = self.node(to)?.input_pin(input)?;
        if from == to || self.reaches(to, from) {
            return Err(Error::cycle(from, to));
        }
        self.node_mut(from)?.ports_mut().add_to_output(output, target)?;
        self.node_mut(to)?.ports_mut().add_to_input(input, source)?;
        trace!(%source, %target, "connected");
        Ok(())
    }

    /// Removes the link between output `output` of `from` and input `input` of `to`.
    ///
    /// Returns whether the link existed.
    ///
    /// # Errors
    ///
    /// Fails with `NodeNotFound` or `PortOutOfRange` like [`connect`](Self::connect).
    pub fn disconnect(
        &mut self,
        from: NodeId,
        output: usize,
        to: NodeId,
        input: usize,
    ) -> Result<bool> {
        let removed = self
            .node_mut(from)?
            .ports_mut()
            .remove_from_output(output, Pin::new(to, input))?;
        self.node_mut(to)?
            .ports_mut()
            .remove_from_input(input, Pin::new(from, output))?;
        Ok(removed)
    }

    /// Returns true if a forward walk from `start` arrives at `goal`.
    #[must_use]
    pub fn reaches(&self, start: NodeId, goal: NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            if id == goal {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                queue.extend(node.ports().all_output_links().map(|(_, pin)| pin.node));
            }
        }
        false
    }

    /// Returns the nodes with no upstream link on any input.
    #[must_use]
    pub fn sources(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| !n.ports().has_upstream())
            .map(Node::id)
            .collect()
    }

    /// Returns the nodes with no downstream link on any output.
    #[must_use]
    pub fn sinks(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| !n.ports().has_downstream())
            .map(Node::id)
            .collect()
    }

    /// Returns every node ordered so that upstream nodes come first.
    #[must_use]
    pub fn topological_order(&self) -> Vec<NodeId> {
        let mut pending: HashMap<NodeId, usize> = self
            .nodes
            .iter()
            .map(|(id, n)| {
                let count = n
                    .ports()
                    .all_input_links()
                    .filter(|(_, pin)| self.contains(pin.node))
                    .count();
                (*id, count)
            })
            .collect();
        let mut ready: VecDeque<NodeId> = self
            .nodes
            .keys()
            .filter(|id| pending.get(id) == Some(&0))
            .copied()
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = ready.pop_front() {
            order.push(id);
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            for (_, pin) in node.ports().all_output_links() {
                if let Some(count) = pending.get_mut(&pin.node) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(pin.node);
                    }
                }
            }
        }
        order
    }

    /// Copies every node under a fresh identity and rewires the copies.
    ///
    /// Returns the new graph and the map from original to copied identifiers.
    /// Links to nodes outside this graph are not carried over.
    #[must_use]
    pub fn duplicate(&self, with_state: bool) -> (Self, HashMap<NodeId, NodeId>) {
        let mut copies = BTreeMap::new();
        let mut map = HashMap::with_capacity(self.nodes.len());
        for (id, node) in &self.nodes {
            let copy = node.clone_node(with_state);
            map.insert(*id, copy.id());
            copies.insert(copy.id(), copy);
        }
        for (id, node) in &self.nodes {
            let Some(copy) = copies.get_mut(&map[id]) else {
                continue;
            };
            let ports = copy.ports_mut();
            for (input, pin) in node.ports().all_input_links() {
                if let Some(&upstream) = map.get(&pin.node) {
                    let _ = ports.add_to_input(input, Pin::new(upstream, pin.index));
                }
            }
            for (output, pin) in node.ports().all_output_links() {
                if let Some(&downstream) = map.get(&pin.node) {
                    let _ = ports.add_to_output(output, Pin::new(downstream, pin.index));
                }
            }
        }
        (Self { nodes: copies }, map)
    }
}

impl<N> FromIterator<N> for Graph<N>
where
    N: Node,
{
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut graph = Self::new();
        for node in iter {
            graph.add(node);
        }
        graph
    }
}
