//! The explanation node model.
//!
//! An [`ExplanationGraph`] is an arena of nodes addressed by [`NodeIndex`].
//! Part nodes name a `(Part, Subject)` fact; connective nodes join their
//! children with AND or OR; unknown nodes mark a cause that could not be
//! resolved. Edges are ordered and carry a [`Quality`].
//!
//! Connectives are kept canonical as the graph grows: attaching an AND to an
//! AND (or an OR to an OR) splices the child's edges into the parent instead
//! of nesting it.

use std::collections::HashSet;
use std::fmt;
use std::ops::Index;

use lineage_foundation::Part;

use crate::subject::Subject;

// =============================================================================
// Handles and edges
// =============================================================================

/// Handle of a node within one [`ExplanationGraph`].
///
/// Stable for the lifetime of the graph and unique within it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Returns the raw position of this node in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// How tightly a child accounts for its parent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Quality {
    /// The child is exactly the cause.
    #[default]
    Exact,
    /// The child covers more than the actual cause.
    Over,
    /// The child covers only part of the actual cause.
    Under,
}

impl Quality {
    /// Combines the quality of an outer edge with that of an edge beneath it.
    #[must_use]
    pub const fn then(self, inner: Quality) -> Quality {
        match self {
            Self::Exact => inner,
            other => other,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Over => write!(f, "over"),
            Self::Under => write!(f, "under"),
        }
    }
}

/// An outgoing edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    /// The child node.
    pub target: NodeIndex,
    /// The quality of the attribution.
    pub quality: Quality,
}

// =============================================================================
// Nodes
// =============================================================================

/// The two connective kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Connective {
    /// All children hold jointly.
    And,
    /// At least one child holds.
    Or,
}

impl Connective {
    /// Returns the node kind of this connective.
    #[must_use]
    pub const fn kind(self) -> NodeKind {
        match self {
            Self::And => NodeKind::And,
            Self::Or => NodeKind::Or,
        }
    }
}

/// What an explanation node stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A part of a subject.
    Part {
        /// The designated part.
        part: Part,
        /// What the part belongs to.
        subject: Subject,
    },
    /// All children hold jointly.
    And,
    /// At least one child holds.
    Or,
    /// A cause that could not be resolved.
    Unknown,
}

impl NodeKind {
    /// Returns the connective this kind represents, if any.
    #[must_use]
    pub const fn connective(&self) -> Option<Connective> {
        match self {
            Self::And => Some(Connective::And),
            Self::Or => Some(Connective::Or),
            _ => None,
        }
    }
}

/// One node of an explanation graph.
#[derive(Clone, Debug)]
pub struct ExplanationNode {
    kind: NodeKind,
    edges: Vec<Edge>,
}

impl ExplanationNode {
    /// Returns what this node stands for.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the outgoing edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Iterates over the children in edge order.
    pub fn children(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.edges.iter().map(|e| e.target)
    }

    /// Returns true if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the part of a part node.
    #[must_use]
    pub fn part(&self) -> Option<&Part> {
        match &self.kind {
            NodeKind::Part { part, .. } => Some(part),
            _ => None,
        }
    }

    /// Returns the subject of a part node.
    #[must_use]
    pub fn subject(&self) -> Option<&Subject> {
        match &self.kind {
            NodeKind::Part { subject, .. } => Some(subject),
            _ => None,
        }
    }

    /// Returns the connective of an AND or OR node.
    #[must_use]
    pub fn connective(&self) -> Option<Connective> {
        self.kind.connective()
    }
}

/// What to do with connectives that end up with fewer than two children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Collapse {
    /// Always create the connective.
    Keep,
    /// No node for zero children; the child itself for one child.
    #[default]
    Degenerate,
}

// =============================================================================
// Graph
// =============================================================================

/// An arena of explanation nodes.
#[derive(Clone, Debug, Default)]
pub struct ExplanationGraph {
    nodes: Vec<ExplanationNode>,
}

impl ExplanationGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    /// Returns the node at `index`, if it belongs to this graph.
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&ExplanationNode> {
        self.nodes.get(index.0)
    }

    /// Iterates over all nodes with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &ExplanationNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
    }

    /// Adds a childless node.
    pub fn add(&mut self, kind: NodeKind) -> NodeIndex {
        self.nodes.push(ExplanationNode {
            kind,
            edges: Vec::new(),
        });
        NodeIndex(self.nodes.len() - 1)
    }

    /// Adds a part node.
    pub fn add_part(&mut self, part: Part, subject: Subject) -> NodeIndex {
        self.add(NodeKind::Part { part, subject })
    }

    /// Adds an unknown leaf.
    pub fn add_unknown(&mut self) -> NodeIndex {
        self.add(NodeKind::Unknown)
    }

    /// Attaches `child` beneath `parent`.
    ///
    /// If both are the same connective, the child's edges are copied into
    /// the parent instead, so an AND never has an AND child and an OR never
    /// has an OR child. Self-edges are ignored.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex, quality: Quality) {
        if parent == child {
            return;
        }
        let parent_kind = self.nodes[parent.0].connective();
        if parent_kind.is_some() && parent_kind == self.nodes[child.0].connective() {
            let spliced: Vec<Edge> = self.nodes[child.0]
                .edges
                .iter()
                .map(|e| Edge {
                    target: e.target,
                    quality: quality.then(e.quality),
                })
                .collect();
            self.nodes[parent.0].edges.extend(spliced);
        } else {
            self.push_edge(parent, child, quality);
        }
    }

    /// Appends an edge without any normalization.
    ///
    /// Used to build non-canonical graphs, for instance as input to
    /// [`squash`](crate::squash).
    pub fn push_edge(&mut self, parent: NodeIndex, child: NodeIndex, quality: Quality) {
        self.nodes[parent.0].edges.push(Edge {
            target: child,
            quality,
        });
    }

    /// Builds a connective over `children`.
    ///
    /// Returns `None` only when `collapse` is [`Collapse::Degenerate`] and
    /// there are no children.
    pub fn connective(
        &mut self,
        connective: Connective,
        children: &[NodeIndex],
        collapse: Collapse,
    ) -> Option<NodeIndex> {
        if collapse == Collapse::Degenerate {
            match children {
                [] => return None,
                [only] => return Some(*only),
                _ => {}
            }
        }
        let node = self.add(connective.kind());
        for child in children {
            self.add_child(node, *child, Quality::Exact);
        }
        Some(node)
    }

    /// Returns the nodes reachable from `root`, `root` first, in depth-first
    /// pre-order. Each node appears once.
    #[must_use]
    pub fn reachable(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            if !seen.insert(index) {
                continue;
            }
            let Some(node) = self.get(index) else {
                continue;
            };
            order.push(index);
            stack.extend(node.edges.iter().rev().map(|e| e.target));
        }
        order
    }

    /// Returns the childless nodes reachable from `root`.
    #[must_use]
    pub fn leaves(&self, root: NodeIndex) -> Vec<NodeIndex> {
        self.reachable(root)
            .into_iter()
            .filter(|i| self.nodes[i.0].is_leaf())
            .collect()
    }

    /// Returns the nodes no edge points at.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeIndex> {
        let targets: HashSet<NodeIndex> = self
            .nodes
            .iter()
            .flat_map(|n| n.edges.iter().map(|e| e.target))
            .collect();
        (0..self.nodes.len())
            .map(NodeIndex)
            .filter(|i| !targets.contains(i))
            .collect()
    }
}

impl Index<NodeIndex> for ExplanationGraph {
    type Output = ExplanationNode;

    fn index(&self, index: NodeIndex) -> &ExplanationNode {
        &self.nodes[index.0]
    }
}
