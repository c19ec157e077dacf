//! Explanation output formatters.
//!
//! Provides an indented text rendering and a Graphviz DOT rendering of the
//! nodes reachable from a root.

use std::collections::HashSet;
use std::fmt::Write;

use crate::node::{ExplanationGraph, NodeIndex, NodeKind, Quality};

// =============================================================================
// Explanation Formatter Trait
// =============================================================================

/// Trait for rendering an explanation graph from one root.
pub trait ExplanationFormatter {
    /// Formats the nodes reachable from `root`.
    fn format(&self, graph: &ExplanationGraph, root: NodeIndex) -> String;

    /// Formats several roots one after another.
    fn format_many(&self, graph: &ExplanationGraph, roots: &[NodeIndex]) -> String {
        roots.iter().map(|r| self.format(graph, *r)).collect()
    }
}

fn label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Part { part, subject } => format!("{part} of {subject}"),
        NodeKind::And => "AND".to_string(),
        NodeKind::Or => "OR".to_string(),
        NodeKind::Unknown => "?".to_string(),
    }
}

// =============================================================================
// Text Formatter
// =============================================================================

/// Formats explanations as an indented tree, one node per line.
///
/// A node reached a second time is printed once more with a reference to its
/// index and is not expanded again.
#[derive(Clone, Debug)]
pub struct TextFormatter {
    /// Whether to annotate non-exact edges with their quality.
    pub show_quality: bool,
    /// Whether to prefix every line with the node index.
    pub show_index: bool,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            show_quality: false,
            show_index: false,
            indent: 2,
        }
    }
}

impl TextFormatter {
    /// Creates a new text formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to show edge qualities.
    #[must_use]
    pub fn with_quality(mut self) -> Self {
        self.show_quality = true;
        self
    }

    /// Builder method to show node indices.
    #[must_use]
    pub fn with_index(mut self) -> Self {
        self.show_index = true;
        self
    }

    /// Builder method to set the indentation width.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    fn write_node(
        &self,
        out: &mut String,
        graph: &ExplanationGraph,
        index: NodeIndex,
        quality: Quality,
        depth: usize,
        printed: &mut HashSet<NodeIndex>,
    ) {
        let Some(node) = graph.get(index) else {
            return;
        };
        let _ = write!(out, "{:width$}", "", width = depth * self.indent);
        if self.show_index {
            let _ = write!(out, "{index}: ");
        }
        out.push_str(&label(node.kind()));
        if self.show_quality && quality != Quality::Exact {
            let _ = write!(out, " [{quality}]");
        }
        if !printed.insert(index) {
            if !node.is_leaf() {
                let _ = write!(out, " (see {index})");
            }
            out.push('\n');
            return;
        }
        out.push('\n');
        for edge in node.edges() {
            self.write_node(out, graph, edge.target, edge.quality, depth + 1, printed);
        }
    }
}

impl ExplanationFormatter for TextFormatter {
    fn format(&self, graph: &ExplanationGraph, root: NodeIndex) -> String {
        let mut out = String::new();
        let mut printed = HashSet::new();
        self.write_node(&mut out, graph, root, Quality::Exact, 0, &mut printed);
        out
    }
}

// =============================================================================
// DOT Formatter
// =============================================================================

/// Formats explanations as a Graphviz digraph.
#[derive(Clone, Debug)]
pub struct DotFormatter {
    /// The graph name.
    pub name: String,
}

impl Default for DotFormatter {
    fn default() -> Self {
        Self {
            name: "explanation".to_string(),
        }
    }
}

impl DotFormatter {
    /// Creates a new DOT formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the graph name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

impl ExplanationFormatter for DotFormatter {
    fn format(&self, graph: &ExplanationGraph, root: NodeIndex) -> String {
        let reachable = graph.reachable(root);
        let mut out = String::new();
        let _ = writeln!(out, "digraph \"{}\" {{", Self::escape(&self.name));
        for index in &reachable {
            let node = &graph[*index];
            let shape = match node.kind() {
                NodeKind::Part { .. } => "box",
                NodeKind::And | NodeKind::Or => "ellipse",
                NodeKind::Unknown => "diamond",
            };
            let _ = writeln!(
                out,
                "  {index} [label=\"{}\", shape={shape}];",
                Self::escape(&label(node.kind()))
            );
        }
        for index in &reachable {
            for edge in graph[*index].edges() {
                let style = match edge.quality {
                    Quality::Exact => "",
                    Quality::Over => " [color=blue]",
                    Quality::Under => " [color=red]",
                };
                let _ = writeln!(out, "  {index} -> {}{style};", edge.target);
            }
        }
        out.push_str("}\n");
        out
    }
}
