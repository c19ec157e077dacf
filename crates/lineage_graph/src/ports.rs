//! Ports and pins.
//!
//! Every node owns a [`Ports`] value: a fixed number of input and output
//! slots, each holding the set of [`Pin`]s of other nodes it is linked to.
//! Inputs record upstream output pins and outputs record downstream input
//! pins, so a connection is stored on both sides and can be walked in either
//! direction.

use std::collections::BTreeSet;
use std::fmt;

use lineage_foundation::{Error, NodeId, PortKind, Result};

/// A port slot of a particular node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pin {
    /// The node owning the slot.
    pub node: NodeId,
    /// The slot index on that node.
    pub index: usize,
}

impl Pin {
    /// Creates a pin.
    #[must_use]
    pub const fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.index)
    }
}

/// The input and output slots of one node.
#[derive(Clone, Debug)]
pub struct Ports {
    id: NodeId,
    inputs: Vec<BTreeSet<Pin>>,
    outputs: Vec<BTreeSet<Pin>>,
}

impl Ports {
    /// Creates unconnected ports with a fresh node identifier.
    #[must_use]
    pub fn new(input_arity: usize, output_arity: usize) -> Self {
        Self {
            id: NodeId::fresh(),
            inputs: vec![BTreeSet::new(); input_arity],
            outputs: vec![BTreeSet::new(); output_arity],
        }
    }

    /// Returns unconnected ports of the same arity under a fresh identifier.
    #[must_use]
    pub fn fresh_copy(&self) -> Self {
        Self::new(self.input_arity(), self.output_arity())
    }

    /// Returns the identifier of the owning node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the number of input slots.
    #[must_use]
    pub fn input_arity(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the number of output slots.
    #[must_use]
    pub fn output_arity(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the upstream pins linked to input `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the input arity.
    pub fn input_links(&self, index: usize) -> Result<&BTreeSet<Pin>> {
        let arity = self.inputs.len();
        self.inputs
            .get(index)
            .ok_or_else(|| Error::port_out_of_range(PortKind::Input, index, arity))
    }

    /// Returns the downstream pins linked to output `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the output arity.
    pub fn output_links(&self, index: usize) -> Result<&BTreeSet<Pin>> {
        let arity = self.outputs.len();
        self.outputs
            .get(index)
            .ok_or_else(|| Error::port_out_of_range(PortKind::Output, index, arity))
    }

    /// Returns the single upstream pin of input `index`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the input arity.
    pub fn upstream(&self, index: usize) -> Result<Option<Pin>> {
        Ok(self.input_links(index)?.iter().next().copied())
    }

    /// Returns this node's pin for input `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the input arity.
    pub fn input_pin(&self, index: usize) -> Result<Pin> {
        self.input_links(index)?;
        Ok(Pin::new(self.id, index))
    }

    /// Returns this node's pin for output `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the output arity.
    pub fn output_pin(&self, index: usize) -> Result<Pin> {
        self.output_links(index)?;
        Ok(Pin::new(self.id, index))
    }

    /// Adds a pin to the links of input `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the input arity.
    pub fn add_to_input(&mut self, index: usize, pin: Pin) -> Result<()> {
        self.input_slot(index)?.insert(pin);
        Ok(())
    }

    /// Replaces all links of input `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the input arity.
    pub fn set_to_input<I>(&mut self, index: usize, pins: I) -> Result<()>
    where
        I: IntoIterator<Item = Pin>,
    {
        *self.input_slot(index)? = pins.into_iter().collect();
        Ok(())
    }

    /// Adds a pin to the links of output `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the output arity.
    pub fn add_to_output(&mut self, index: usize, pin: Pin) -> Result<()> {
        self.output_slot(index)?.insert(pin);
        Ok(())
    }

    /// Replaces all links of output `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the output arity.
    pub fn set_to_output<I>(&mut self, index: usize, pins: I) -> Result<()>
    where
        I: IntoIterator<Item = Pin>,
    {
        *self.output_slot(index)? = pins.into_iter().collect();
        Ok(())
    }

    /// Removes a pin from the links of input `index`, returning whether it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the input arity.
    pub fn remove_from_input(&mut self, index: usize, pin: Pin) -> Result<bool> {
        Ok(self.input_slot(index)?.remove(&pin))
    }

    /// Removes a pin from the links of output `index`, returning whether it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the output arity.
    pub fn remove_from_output(&mut self, index: usize, pin: Pin) -> Result<bool> {
        Ok(self.output_slot(index)?.remove(&pin))
    }

    /// Iterates over `(input index, upstream pin)` pairs.
    pub fn all_input_links(&self) -> impl Iterator<Item = (usize, Pin)> + '_ {
        self.inputs
            .iter()
            .enumerate()
            .flat_map(|(i, pins)| pins.iter().map(move |p| (i, *p)))
    }

    /// Iterates over `(output index, downstream pin)` pairs.
    pub fn all_output_links(&self) -> impl Iterator<Item = (usize, Pin)> + '_ {
        self.outputs
            .iter()
            .enumerate()
            .flat_map(|(i, pins)| pins.iter().map(move |p| (i, *p)))
    }

    /// Returns true if any output has a downstream link.
    #[must_use]
    pub fn has_downstream(&self) -> bool {
        self.outputs.iter().any(|pins| !pins.is_empty())
    }

    /// Returns true if any input has an upstream link.
    #[must_use]
    pub fn has_upstream(&self) -> bool {
        self.inputs.iter().any(|pins| !pins.is_empty())
    }

    /// Drops every link on both sides.
    pub fn clear_links(&mut self) {
        self.inputs.iter_mut().for_each(BTreeSet::clear);
        self.outputs.iter_mut().for_each(BTreeSet::clear);
    }

    fn input_slot(&mut self, index: usize) -> Result<&mut BTreeSet<Pin>> {
        let arity = self.inputs.len();
        self.inputs
            .get_mut(index)
            .ok_or_else(|| Error::port_out_of_range(PortKind::Input, index, arity))
    }

    fn output_slot(&mut self, index: usize) -> Result<&mut BTreeSet<Pin>> {
        let arity = self.outputs.len();
        self.outputs
            .get_mut(index)
            .ok_or_else(|| Error::port_out_of_range(PortKind::Output, index, arity))
    }
}
