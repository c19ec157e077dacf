//! Process-wide unique node identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Next identifier to hand out. Zero is never allocated.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a node in a computation graph.
///
/// Identifiers are drawn from a global counter when a node is constructed,
/// so no two node instances in the same process ever share one. Equality,
/// hashing, and visited-sets in graph traversals all key on this value.
/// Identifiers increase monotonically, so ordering by `NodeId` is creation
/// order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates a fresh identifier.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
