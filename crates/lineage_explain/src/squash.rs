//! Simplification of explanation graphs.

use std::collections::HashMap;

use crate::node::{Edge, ExplanationGraph, NodeIndex, NodeKind, Quality};

/// Rebuilds the graph below `root` without degenerate connectives.
///
/// Connectives with no surviving children disappear, connectives with one
/// surviving child are replaced by that child, and a connective beneath a
/// connective of the same kind is merged into it. Repeated children of a
/// connective are kept once. Part and unknown nodes are copied once each, so
/// shared sub-graphs stay shared.
///
/// Returns the new graph and its root, or `None` for the root if nothing is
/// left. Squashing a squashed graph reproduces it.
#[must_use]
pub fn squash(graph: &ExplanationGraph, root: NodeIndex) -> (ExplanationGraph, Option<NodeIndex>) {
    let mut squasher = Squasher {
        source: graph,
        target: ExplanationGraph::new(),
        copies: HashMap::new(),
    };
    let root = squasher.copy(root);
    (squasher.target, root)
}

struct Squasher<'a> {
    source: &'a ExplanationGraph,
    target: ExplanationGraph,
    copies: HashMap<NodeIndex, Option<NodeIndex>>,
}

impl Squasher<'_> {
    fn copy(&mut self, index: NodeIndex) -> Option<NodeIndex> {
        if let Some(copy) = self.copies.get(&index) {
            return *copy;
        }
        let node = self.source.get(index)?;
        // placeholder breaks accidental cycles in malformed input
        self.copies.insert(index, None);
        let children: Vec<_> = node
            .edges()
            .iter()
            .filter_map(|edge| self.copy(edge.target).map(|c| (c, edge.quality)))
            .collect();
        let copy = match node.connective() {
            Some(connective) => {
                let mut edges: Vec<Edge> = Vec::with_capacity(children.len());
                for (child, quality) in children {
                    let spliced = &self.target[child];
                    if spliced.connective() == Some(connective) {
                        for edge in spliced.edges() {
                            push_unique(&mut edges, edge.target, quality.then(edge.quality));
                        }
                    } else {
                        push_unique(&mut edges, child, quality);
                    }
                }
                match edges.as_slice() {
                    [] => None,
                    [only] => Some(only.target),
                    _ => {
                        let merged = self.target.add(connective.kind());
                        for edge in edges {
                            self.target.push_edge(merged, edge.target, edge.quality);
                        }
                        Some(merged)
                    }
                }
            }
            None => {
                let kind: NodeKind = node.kind().clone();
                let copied = self.target.add(kind);
                for (child, quality) in children {
                    self.target.add_child(copied, child, quality);
                }
                Some(copied)
            }
        };
        self.copies.insert(index, copy);
        copy
    }
}

fn push_unique(edges: &mut Vec<Edge>, target: NodeIndex, quality: Quality) {
    if !edges.iter().any(|e| e.target == target) {
        edges.push(Edge { target, quality });
    }
}

/// Returns true if no connective below `root` has fewer than two children or
/// a child of its own kind.
#[must_use]
pub fn is_squashed(graph: &ExplanationGraph, root: NodeIndex) -> bool {
    graph.reachable(root).into_iter().all(|index| {
        let node = &graph[index];
        match node.connective() {
            None => true,
            Some(kind) => {
                node.edges().len() >= 2
                    && node.children().all(|c| graph[c].connective() != Some(kind))
            }
        }
    })
}
