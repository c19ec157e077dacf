//! Error types for the Lineage system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Failures are always synchronous and local to the call that raised them;
//! an explanation that cannot be resolved is not an error (the tracer
//! produces an unknown leaf instead).

use std::fmt;

use thiserror::Error;

use crate::id::NodeId;
use crate::types::Type;

/// The main error type for Lineage operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Pushes a frame onto this error's context, creating one if needed.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an arity mismatch error for a call to `evaluate`.
    #[must_use]
    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch { expected, actual })
    }

    /// Creates a port index out of range error.
    #[must_use]
    pub fn port_out_of_range(port: PortKind, index: usize, arity: usize) -> Self {
        Self::new(ErrorKind::PortOutOfRange { port, index, arity })
    }

    /// Creates an error for a nested port without an internal association.
    #[must_use]
    pub fn unassociated(port: PortKind, index: usize) -> Self {
        Self::new(ErrorKind::Unassociated { port, index })
    }

    /// Creates an error for an internal input with no value source.
    #[must_use]
    pub fn unconnected(node: NodeId, index: usize) -> Self {
        Self::new(ErrorKind::Unconnected { node, index })
    }

    /// Creates a node not found error.
    #[must_use]
    pub fn node_not_found(id: NodeId) -> Self {
        Self::new(ErrorKind::NodeNotFound(id))
    }

    /// Creates an error for a connection that would close a cycle.
    #[must_use]
    pub fn cycle(from: NodeId, to: NodeId) -> Self {
        Self::new(ErrorKind::Cycle { from, to })
    }

    /// Returns the taxonomy category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

/// Which side of a node a port lives on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// An input port.
    Input,
    /// An output port.
    Output,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Broad error categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad port index, wrong argument count, unknown node, cycle.
    Structural,
    /// A value did not have the type a function expects.
    Type,
    /// A nested node was used before all of its ports were wired.
    Configuration,
    /// A leaf function failed on well-typed input (e.g. division by zero).
    Evaluation,
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Type mismatch during runtime type checking.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// Wrong number of arguments to `evaluate`.
    #[error("arity mismatch: expected {expected} arguments, got {actual}")]
    ArityMismatch {
        /// Declared input arity.
        expected: usize,
        /// Actual number of arguments.
        actual: usize,
    },

    /// Port index outside the declared arity.
    #[error("{port} index {index} out of range (arity {arity})")]
    PortOutOfRange {
        /// Which side the index addressed.
        port: PortKind,
        /// The index that was accessed.
        index: usize,
        /// The declared arity on that side.
        arity: usize,
    },

    /// Nested node port without an internal association.
    #[error("{port} {index} is not associated with an internal pin")]
    Unassociated {
        /// Which side the unassociated port is on.
        port: PortKind,
        /// The port index.
        index: usize,
    },

    /// Internal input with neither an upstream link nor a nested input.
    #[error("input {index} of node {node} is not connected")]
    Unconnected {
        /// The node whose input is dangling.
        node: NodeId,
        /// The input index.
        index: usize,
    },

    /// Node was not found in a graph.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Connection would make the graph cyclic.
    #[error("connecting {from} to {to} would create a cycle")]
    Cycle {
        /// Upstream node of the rejected connection.
        from: NodeId,
        /// Downstream node of the rejected connection.
        to: NodeId,
    },

    /// Index outside a collection.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: usize,
        /// The actual length of the collection.
        length: usize,
    },

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Returns the taxonomy category of this error kind.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeMismatch { .. } => ErrorCategory::Type,
            Self::Unassociated { .. } | Self::Unconnected { .. } => ErrorCategory::Configuration,
            Self::IndexOutOfBounds { .. } | Self::DivisionByZero | Self::Internal(_) => {
                ErrorCategory::Evaluation
            }
            Self::ArityMismatch { .. }
            | Self::PortOutOfRange { .. }
            | Self::NodeNotFound(_)
            | Self::Cycle { .. } => ErrorCategory::Structural,
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Enclosing functions, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.stack {
            writeln!(f, "  in {frame}")?;
        }
        Ok(())
    }
}
