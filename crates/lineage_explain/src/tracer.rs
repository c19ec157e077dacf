//! Recursive construction of explanation graphs.
//!
//! A [`Tracer`] answers "why" queries of the form `(part, subject)`. It asks
//! the subject for its local explanation, which in turn may trace further
//! `(part, subject)` pairs on the same tracer, and so on until every branch
//! ends in a terminal fact or an unknown leaf.
//!
//! Part nodes are pooled by `(part, subject)`: tracing a pair twice returns
//! the same node and never asks the subject to explain itself again. This
//! turns what would be an explanation tree into a DAG with shared
//! sub-explanations, and lets several queries on one tracer merge into one
//! graph.
//!
//! # Example
//!
//! ```
//! use lineage_explain::{Explainable, Subject, Tracer};
//! use lineage_foundation::{NodeId, Part, Result};
//! use lineage_explain::NodeIndex;
//!
//! struct Doubler(NodeId);
//!
//! impl Explainable for Doubler {
//!     fn subject(&self) -> Subject {
//!         Subject::node(self.0, "double")
//!     }
//!
//!     fn explain(&self, part: &Part, root: NodeIndex, tracer: &mut Tracer) -> Result<()> {
//!         if part.mentioned_output().is_some() {
//!             let input = tracer.leaf(Part::Input(0), self.subject());
//!             tracer.add_child(root, input);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let doubler = Doubler(NodeId::fresh());
//! let mut tracer = Tracer::new();
//! let root = tracer.query(&Part::Output(0), &doubler).unwrap();
//! let explanation = tracer.finish();
//! assert_eq!(explanation.graph[root].children().count(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;

use lineage_foundation::{Part, Result};
use tracing::{trace, warn};

use crate::dnf::{Dnf, as_dnf};
use crate::format::{ExplanationFormatter, TextFormatter};
use crate::node::{Collapse, Connective, ExplanationGraph, NodeIndex, Quality};
use crate::squash::squash;
use crate::subject::Subject;

// =============================================================================
// Explainable
// =============================================================================

/// Something that can account for parts of itself.
pub trait Explainable {
    /// Returns the subject part nodes about this object carry.
    fn subject(&self) -> Subject;

    /// Attaches the local explanation of `part` beneath `root`.
    ///
    /// `root` is the already registered node for `(part, self.subject())`.
    /// Implementations add children through `tracer`, tracing upstream
    /// objects recursively where they know them. A part the object cannot
    /// account for should get an unknown child, not an error.
    ///
    /// # Errors
    ///
    /// Only structural and configuration faults are errors.
    fn explain(&self, part: &Part, root: NodeIndex, tracer: &mut Tracer) -> Result<()>;
}

// =============================================================================
// Tracer Configuration
// =============================================================================

/// Default bound on explanation recursion.
const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration for the tracer.
#[derive(Clone, Debug)]
pub struct TracerConfig {
    /// Whether equal `(part, subject)` pairs share one node.
    pub share_nodes: bool,
    /// Whether connectives with fewer than two children are collapsed.
    pub collapse_connectives: bool,
    /// Maximum nesting of `explain` calls before giving up with an unknown leaf.
    pub max_depth: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            share_nodes: true,
            collapse_connectives: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TracerConfig {
    /// Creates a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to build a tree instead of a shared graph.
    #[must_use]
    pub fn as_tree(mut self) -> Self {
        self.share_nodes = false;
        self
    }

    /// Builder method to keep degenerate connectives.
    #[must_use]
    pub fn keep_connectives(mut self) -> Self {
        self.collapse_connectives = false;
        self
    }

    /// Builder method to set the recursion bound.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    fn collapse(&self) -> Collapse {
        if self.collapse_connectives {
            Collapse::Degenerate
        } else {
            Collapse::Keep
        }
    }
}

// =============================================================================
// Tracer
// =============================================================================

type Key = (Part, Subject);

/// Builds explanation graphs by recursive, pooled expansion.
#[derive(Debug, Default)]
pub struct Tracer {
    config: TracerConfig,
    graph: ExplanationGraph,
    pool: HashMap<Key, NodeIndex>,
    in_progress: HashMap<Key, NodeIndex>,
    roots: Vec<NodeIndex>,
    depth: usize,
}

impl Tracer {
    /// Creates a tracer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracer with the given configuration.
    #[must_use]
    pub fn with_config(config: TracerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// Returns the graph built so far.
    #[must_use]
    pub fn graph(&self) -> &ExplanationGraph {
        &self.graph
    }

    /// Returns the roots of the queries run so far.
    #[must_use]
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Returns the pooled node for `(part, subject)`, if one exists.
    #[must_use]
    pub fn lookup(&self, part: &Part, subject: &Subject) -> Option<NodeIndex> {
        let key = (part.clone(), subject.clone());
        self.pool
            .get(&key)
            .or_else(|| self.in_progress.get(&key))
            .copied()
    }

    /// Traces `part` of `explainable` and records the node as a query root.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by `explain`.
    pub fn query(&mut self, part: &Part, explainable: &dyn Explainable) -> Result<NodeIndex> {
        let root = self.trace(part, explainable)?;
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
        Ok(root)
    }

    /// Returns the node explaining `part` of `explainable`, expanding it if new.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by `explain`.
    pub fn trace(&mut self, part: &Part, explainable: &dyn Explainable) -> Result<NodeIndex> {
        self.trace_fresh(part, explainable).map(|(node, _)| node)
    }

    /// Like [`trace`](Self::trace), also reporting whether the node was created
    /// by this call.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by `explain`.
    pub fn trace_fresh(
        &mut self,
        part: &Part,
        explainable: &dyn Explainable,
    ) -> Result<(NodeIndex, bool)> {
        let key = (part.clone(), explainable.subject());
        if let Some(existing) = self.existing(&key) {
            return Ok((existing, false));
        }
        let node = self.register(key.clone());
        if part.is_trivial() {
            self.release(&key);
            return Ok((node, true));
        }
        if self.depth >= self.config.max_depth {
            warn!(%part, subject = %key.1, depth = self.depth, "explanation depth exceeded");
            let unknown = self.graph.add_unknown();
            self.graph.add_child(node, unknown, Quality::Exact);
            self.release(&key);
            return Ok((node, true));
        }
        self.depth += 1;
        let result = explainable.explain(part, node, self);
        self.depth -= 1;
        self.release(&key);
        result.map(|()| (node, true))
    }

    /// Traces `part` of a subject that may or may not be explainable.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by `explain`.
    pub fn trace_subject(
        &mut self,
        part: &Part,
        subject: Subject,
        explainable: Option<&dyn Explainable>,
    ) -> Result<NodeIndex> {
        match explainable {
            Some(explainable) => self.trace(part, explainable),
            None => Ok(self.trace_opaque(part, subject)),
        }
    }

    /// Returns the node for `part` of a subject with no explanation of its own.
    ///
    /// A new node for a non-trivial part gets an unknown child.
    pub fn trace_opaque(&mut self, part: &Part, subject: Subject) -> NodeIndex {
        let key = (part.clone(), subject);
        if let Some(existing) = self.existing(&key) {
            return existing;
        }
        let node = self.register(key.clone());
        if !part.is_trivial() {
            let unknown = self.graph.add_unknown();
            self.graph.add_child(node, unknown, Quality::Exact);
        }
        self.release(&key);
        node
    }

    /// Returns the node for `(part, subject)` without expanding it.
    pub fn leaf(&mut self, part: Part, subject: Subject) -> NodeIndex {
        let key = (part, subject);
        if let Some(existing) = self.existing(&key) {
            return existing;
        }
        let node = self.register(key.clone());
        self.release(&key);
        node
    }

    /// Adds a fresh unknown leaf.
    pub fn unknown(&mut self) -> NodeIndex {
        self.graph.add_unknown()
    }

    /// Attaches `child` beneath `parent` with exact quality.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.graph.add_child(parent, child, Quality::Exact);
    }

    /// Attaches `child` beneath `parent` with the given quality.
    pub fn add_child_with(&mut self, parent: NodeIndex, child: NodeIndex, quality: Quality) {
        self.graph.add_child(parent, child, quality);
    }

    /// Builds a connective over `children`, collapsing degenerate ones if
    /// so configured.
    pub fn connective(&mut self, connective: Connective, children: &[NodeIndex]) -> Option<NodeIndex> {
        let collapse = self.config.collapse();
        self.graph.connective(connective, children, collapse)
    }

    /// Returns the childless part nodes under `root` that are about `subject`
    /// and whose part starts at one of its inputs.
    ///
    /// These are the places where an explanation of `subject` stops and the
    /// caller, who knows what feeds `subject`, can continue it.
    #[must_use]
    pub fn frontier(&self, root: NodeIndex, subject: &Subject) -> Vec<NodeIndex> {
        self.graph
            .reachable(root)
            .into_iter()
            .filter(|index| {
                let node = &self.graph[*index];
                node.is_leaf()
                    && node.subject() == Some(subject)
                    && node.part().and_then(Part::mentioned_input).is_some()
            })
            .collect()
    }

    /// Consumes the tracer and returns what it built.
    #[must_use]
    pub fn finish(self) -> Explanation {
        Explanation {
            graph: self.graph,
            roots: self.roots,
        }
    }

    fn existing(&self, key: &Key) -> Option<NodeIndex> {
        if self.config.share_nodes {
            self.pool.get(key).copied()
        } else {
            self.in_progress.get(key).copied()
        }
    }

    fn register(&mut self, key: Key) -> NodeIndex {
        let node = self.graph.add_part(key.0.clone(), key.1.clone());
        trace!(%node, part = %key.0, subject = %key.1, "created part node");
        if self.config.share_nodes {
            self.pool.insert(key, node);
        } else {
            self.in_progress.insert(key, node);
        }
        node
    }

    fn release(&mut self, key: &Key) {
        if !self.config.share_nodes {
            self.in_progress.remove(key);
        }
    }
}

// =============================================================================
// Explanation
// =============================================================================

/// A finished explanation graph with the roots of the queries that built it.
#[derive(Clone, Debug, Default)]
pub struct Explanation {
    /// The explanation graph.
    pub graph: ExplanationGraph,
    /// Query roots in the order they were first asked.
    pub roots: Vec<NodeIndex>,
}

impl Explanation {
    /// Returns the root of the first query.
    #[must_use]
    pub fn root(&self) -> Option<NodeIndex> {
        self.roots.first().copied()
    }

    /// Returns the alternative clauses explaining `root`.
    #[must_use]
    pub fn dnf(&self, root: NodeIndex) -> Dnf {
        as_dnf(&self.graph, root)
    }

    /// Returns a squashed copy of the graph below `root`.
    ///
    /// The copy is `None` if nothing remains once empty connectives are removed.
    #[must_use]
    pub fn squashed(&self, root: NodeIndex) -> Option<Explanation> {
        let (graph, root) = squash(&self.graph, root);
        root.map(|root| Explanation {
            graph,
            roots: vec![root],
        })
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatter = TextFormatter::new();
        for root in &self.roots {
            write!(f, "{}", formatter.format(&self.graph, *root))?;
        }
        Ok(())
    }
}
