//! Breadth-first traversal over a [`Graph`].

use std::collections::{HashSet, VecDeque};

use lineage_foundation::{NodeId, Result};

use crate::graph::Graph;
use crate::node::Node;

/// Per-node hook called by a [`Crawler`].
pub trait Visitor<N> {
    /// Called once for every node reached, in breadth-first order.
    fn visit(&mut self, node: &N);
}

impl<N, F> Visitor<N> for F
where
    F: FnMut(&N),
{
    fn visit(&mut self, node: &N) {
        self(node);
    }
}

/// Breadth-first walker following forward links, backward links, or both.
///
/// Each node is visited at most once, tracked by identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crawler {
    forward: bool,
    backward: bool,
}

impl Crawler {
    /// Creates a crawler with explicit direction flags.
    #[must_use]
    pub const fn new(forward: bool, backward: bool) -> Self {
        Self { forward, backward }
    }

    /// Creates a crawler that follows outputs to downstream nodes.
    #[must_use]
    pub const fn forward() -> Self {
        Self::new(true, false)
    }

    /// Creates a crawler that follows inputs to upstream nodes.
    #[must_use]
    pub const fn backward() -> Self {
        Self::new(false, true)
    }

    /// Creates a crawler that follows links in both directions.
    #[must_use]
    pub const fn both() -> Self {
        Self::new(true, true)
    }

    /// Returns true if downstream links are followed.
    #[must_use]
    pub const fn follows_forward(&self) -> bool {
        self.forward
    }

    /// Returns true if upstream links are followed.
    #[must_use]
    pub const fn follows_backward(&self) -> bool {
        self.backward
    }

    /// Visits every node reachable from `start`, `start` included.
    ///
    /// Links leading outside the graph are ignored.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `start` is not in the graph.
    pub fn crawl<N, V>(&self, graph: &Graph<N>, start: NodeId, visitor: &mut V) -> Result<()>
    where
        N: Node,
        V: Visitor<N> + ?Sized,
    {
        graph.node(start)?;
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = graph.get(id) else {
                continue;
            };
            visitor.visit(node);
            let ports = node.ports();
            if self.forward {
                queue.extend(
                    ports
                        .all_output_links()
                        .map(|(_, pin)| pin.node)
                        .filter(|n| !visited.contains(n)),
                );
            }
            if self.backward {
                queue.extend(
                    ports
                        .all_input_links()
                        .map(|(_, pin)| pin.node)
                        .filter(|n| !visited.contains(n)),
                );
            }
        }
        Ok(())
    }

    /// Returns the identifiers of the nodes reachable from `start` in visit order.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `start` is not in the graph.
    pub fn collect<N: Node>(&self, graph: &Graph<N>, start: NodeId) -> Result<Vec<NodeId>> {
        let mut order = Vec::new();
        self.crawl(graph, start, &mut |node: &N| order.push(node.id()))?;
        Ok(order)
    }
}

/// Forward crawler collecting nodes with no downstream link on any output.
#[derive(Clone, Debug, Default)]
pub struct LeafCrawler {
    leaves: Vec<NodeId>,
}

impl LeafCrawler {
    /// Creates an empty leaf crawler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Crawls forward from `start` and returns the leaves found, in visit order.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `start` is not in the graph.
    pub fn leaves<N: Node>(mut self, graph: &Graph<N>, start: NodeId) -> Result<Vec<NodeId>> {
        Crawler::forward().crawl(graph, start, &mut self)?;
        Ok(self.leaves)
    }
}

impl<N: Node> Visitor<N> for LeafCrawler {
    fn visit(&mut self, node: &N) {
        if !node.ports().has_downstream() {
            self.leaves.push(node.id());
        }
    }
}
