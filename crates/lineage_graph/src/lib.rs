//! Node/pin substrate, traversal, and nested composition for Lineage.
//!
//! This crate provides:
//! - [`Ports`] and [`Pin`] - Fixed-arity ports with symmetric link sets
//! - [`Node`] - The trait every graph node implements
//! - [`Graph`] - An arena of nodes keyed by [`NodeId`](lineage_foundation::NodeId)
//! - [`Crawler`] and [`LeafCrawler`] - Breadth-first traversal
//! - [`NestedNode`] - A node wrapping a private sub-graph
//! - [`flatten`] - Splicing nested sub-graphs into their parent scope

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod crawler;
pub mod flatten;
pub mod graph;
pub mod nested;
pub mod node;
pub mod ports;

pub use crawler::{Crawler, LeafCrawler, Visitor};
pub use flatten::{Flatten, Flattened, flatten};
pub use graph::Graph;
pub use nested::NestedNode;
pub use node::{BasicNode, Node};
pub use ports::{Pin, Ports};
