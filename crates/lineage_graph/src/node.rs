//! The node trait.

use std::collections::BTreeSet;

use lineage_foundation::{NodeId, Result};

use crate::ports::{Pin, Ports};

/// A node of a computation graph: anything that owns [`Ports`].
///
/// All accessors delegate to the ports; implementors only supply storage
/// and a way to copy themselves.
pub trait Node {
    /// Returns this node's ports.
    fn ports(&self) -> &Ports;

    /// Returns this node's ports mutably.
    fn ports_mut(&mut self) -> &mut Ports;

    /// Returns a copy with a fresh identity and no links.
    ///
    /// When `with_state` is true, any evaluation state the node carries is
    /// copied as well.
    fn clone_node(&self, with_state: bool) -> Self
    where
        Self: Sized;

    /// Returns a short human-readable label.
    fn label(&self) -> String {
        self.id().to_string()
    }

    /// Returns this node's identifier.
    fn id(&self) -> NodeId {
        self.ports().id()
    }

    /// Returns the number of inputs.
    fn input_arity(&self) -> usize {
        self.ports().input_arity()
    }

    /// Returns the number of outputs.
    fn output_arity(&self) -> usize {
        self.ports().output_arity()
    }

    /// Returns the upstream pins of input `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    fn input_links(&self, index: usize) -> Result<&BTreeSet<Pin>> {
        self.ports().input_links(index)
    }

    /// Returns the downstream pins of output `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    fn output_links(&self, index: usize) -> Result<&BTreeSet<Pin>> {
        self.ports().output_links(index)
    }

    /// Returns this node's pin for input `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    fn input_pin(&self, index: usize) -> Result<Pin> {
        self.ports().input_pin(index)
    }

    /// Returns this node's pin for output `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    fn output_pin(&self, index: usize) -> Result<Pin> {
        self.ports().output_pin(index)
    }
}

/// A plain labelled node with no behaviour of its own.
#[derive(Clone, Debug)]
pub struct BasicNode {
    ports: Ports,
    name: String,
}

impl BasicNode {
    /// Creates a node with the given arity.
    #[must_use]
    pub fn new(name: impl Into<String>, input_arity: usize, output_arity: usize) -> Self {
        Self {
            ports: Ports::new(input_arity, output_arity),
            name: name.into(),
        }
    }

    /// Returns the node's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Node for BasicNode {
    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn clone_node(&self, _with_state: bool) -> Self {
        Self {
            ports: self.ports.fresh_copy(),
            name: self.name.clone(),
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
