//! Explanation graphs for Lineage.
//!
//! This crate provides:
//! - [`ExplanationGraph`] - An arena of part nodes and AND/OR connectives
//! - [`Subject`] - What a part node talks about (a function or a value)
//! - [`Tracer`] - Recursive, pooled construction of explanation graphs
//! - [`squash`] - Removal of degenerate and redundantly nested connectives
//! - [`as_dnf`] - Conversion to a minimal set of alternative clauses
//! - Formatters ([`TextFormatter`], [`DotFormatter`]) for presentation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dnf;
pub mod format;
pub mod node;
pub mod squash;
pub mod subject;
pub mod tracer;

pub use dnf::{Clause, Dnf, Literal, as_dnf, holds};
pub use format::{DotFormatter, ExplanationFormatter, TextFormatter};
pub use node::{
    Collapse, Connective, Edge, ExplanationGraph, ExplanationNode, NodeIndex, NodeKind, Quality,
};
pub use squash::{is_squashed, squash};
pub use subject::Subject;
pub use tracer::{Explainable, Explanation, Tracer, TracerConfig};
