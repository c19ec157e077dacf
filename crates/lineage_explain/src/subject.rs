//! Explanation subjects.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use lineage_foundation::{NodeId, Value};

/// What a part node is about.
///
/// A subject is either a node of a computation graph, identified by its
/// [`NodeId`], or a plain value. Node subjects compare by identifier only;
/// the name is carried for display.
#[derive(Clone, Debug)]
pub enum Subject {
    /// A function or circuit.
    Node {
        /// The node's identifier.
        id: NodeId,
        /// A display name.
        name: Arc<str>,
    },
    /// A value with no explanation of its own.
    Value(Value),
}

impl Subject {
    /// Creates a node subject.
    #[must_use]
    pub fn node(id: NodeId, name: impl Into<Arc<str>>) -> Self {
        Self::Node {
            id,
            name: name.into(),
        }
    }

    /// Creates a value subject.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Returns the node identifier, if this subject is a node.
    #[must_use]
    pub fn id(&self) -> Option<NodeId> {
        match self {
            Self::Node { id, .. } => Some(*id),
            Self::Value(_) => None,
        }
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Node { id: a, .. }, Self::Node { id: b, .. }) => a == b,
            (Self::Value(a), Self::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Subject {}

impl Hash for Subject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Node { id, .. } => id.hash(state),
            Self::Value(v) => v.hash(state),
        }
    }
}

impl PartialOrd for Subject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Total order needed for sorted clauses. Values of different types order by
// type name, incomparable values by their debug rendering.
impl Ord for Subject {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Node { id: a, .. }, Self::Node { id: b, .. }) => a.cmp(b),
            (Self::Node { .. }, Self::Value(_)) => Ordering::Less,
            (Self::Value(_), Self::Node { .. }) => Ordering::Greater,
            (Self::Value(a), Self::Value(b)) => cmp_values(a, b),
        }
    }
}

fn cmp_values(a: &Value, b: &Value) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    a.value_type()
        .to_string()
        .cmp(&b.value_type().to_string())
        .then_with(|| match a.partial_cmp(b) {
            Some(order) if order != Ordering::Equal => order,
            _ => format!("{a:?}").cmp(&format!("{b:?}")),
        })
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node { id, name } => write!(f, "{name}{id}"),
            Self::Value(v) => write!(f, "`{v:?}`"),
        }
    }
}
