//! Core values, node identifiers, part designators, and errors for Lineage.
//!
//! This crate provides:
//! - [`Value`] - The values flowing through computation graphs
//! - [`NodeId`] - Process-wide unique node identifiers
//! - [`Part`] - Composable designators addressing sub-parts of values and ports
//! - [`Type`] - Value kinds named in type mismatch reports
//! - [`Error`] - Rich error types with context
//! - Persistent collections behind composite values ([`Elements`], [`Record`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod id;
pub mod part;
pub mod types;
pub mod value;

pub use collections::{Elements, Record};
pub use error::{Error, ErrorCategory, ErrorContext, ErrorKind, PortKind};
pub use id::NodeId;
pub use part::{Part, Target};
pub use types::Type;
pub use value::Value;

/// Result type for Lineage operations.
pub type Result<T> = std::result::Result<T, Error>;
