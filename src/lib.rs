//! Lineage - explanations for computed values
//!
//! This crate re-exports all layers of the Lineage system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: lineage_stdlib     - Leaf functions (arithmetic, logic, vectors, strings)
//! Layer 3: lineage_engine     - Function contract, atomic functions, circuits
//! Layer 2: lineage_explain    - Explanation graphs, tracer, squash, DNF, rendering
//! Layer 1: lineage_graph      - Node/pin substrate, traversal, nesting, flattening
//! Layer 0: lineage_foundation - Core types (Value, Part, NodeId, Error)
//! ```

pub use lineage_engine as engine;
pub use lineage_explain as explain;
pub use lineage_foundation as foundation;
pub use lineage_graph as graph;
pub use lineage_stdlib as stdlib;
