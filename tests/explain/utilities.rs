//! Integration tests for squash, DNF, and rendering

use std::collections::HashSet;

use lineage_explain::{
    Collapse, Connective, DotFormatter, ExplanationFormatter, ExplanationGraph, Literal,
    NodeIndex, NodeKind, Quality, Subject, TextFormatter, as_dnf, holds, is_squashed, squash,
};
use lineage_foundation::{NodeId, Part};
use proptest::prelude::*;

fn subject() -> Subject {
    Subject::node(NodeId::fresh(), "f")
}

// =============================================================================
// Squash
// =============================================================================

#[test]
fn nested_and_collapses_to_one_level() {
    let s = subject();
    let mut graph = ExplanationGraph::new();
    let leaves: Vec<_> = (0..3)
        .map(|i| graph.add_part(Part::Input(i), s.clone()))
        .collect();
    let inner = graph
        .connective(Connective::And, &leaves, Collapse::Keep)
        .unwrap();
    let outer = graph.add(NodeKind::And);
    graph.push_edge(outer, inner, Quality::Exact);
    assert!(!is_squashed(&graph, outer));

    let (squashed, root) = squash(&graph, outer);
    let root = root.unwrap();
    assert_eq!(squashed[root].connective(), Some(Connective::And));
    let children: Vec<_> = squashed[root].children().collect();
    assert_eq!(children.len(), 3);
    assert!(children.iter().all(|&c| squashed[c].is_leaf()));
    assert!(is_squashed(&squashed, root));

    let (again, again_root) = squash(&squashed, root);
    assert_eq!(again.len(), squashed.len());
    assert_eq!(again[again_root.unwrap()].children().count(), 3);
}

// =============================================================================
// DNF
// =============================================================================

#[test]
fn dnf_distributes_and_over_or() {
    let s = subject();
    let mut graph = ExplanationGraph::new();
    let a = graph.add_part(Part::Input(0), s.clone());
    let b = graph.add_part(Part::Input(1), s.clone());
    let c = graph.add_part(Part::Input(2), s.clone());
    let or = graph
        .connective(Connective::Or, &[a, b], Collapse::Keep)
        .unwrap();
    let and = graph
        .connective(Connective::And, &[or, c], Collapse::Keep)
        .unwrap();
    let dnf = as_dnf(&graph, and);
    assert_eq!(dnf.len(), 2);
    let c_literal = Literal::fact(Part::Input(2), s.clone());
    assert!(dnf.clauses().iter().all(|clause| clause.contains(&c_literal)));
    assert!(dnf.evaluate(&[Literal::fact(Part::Input(1), s), c_literal]));
}

/// A random AND/OR graph over five leaves; every node points at older ones.
fn random_graph() -> impl Strategy<Value = (ExplanationGraph, NodeIndex, Vec<Literal>)> {
    prop::collection::vec((any::<bool>(), prop::collection::vec(0..64usize, 1..4)), 1..8).prop_map(
        |nodes| {
            let s = Subject::node(NodeId::fresh(), "f");
            let mut graph = ExplanationGraph::new();
            let mut all: Vec<NodeIndex> = (0..5)
                .map(|i| graph.add_part(Part::Input(i), s.clone()))
                .collect();
            let literals = (0..5)
                .map(|i| Literal::fact(Part::Input(i), s.clone()))
                .collect();
            for (is_and, picks) in nodes {
                let node = graph.add(if is_and { NodeKind::And } else { NodeKind::Or });
                for pick in picks {
                    let child = all[pick % all.len()];
                    graph.push_edge(node, child, Quality::Exact);
                }
                all.push(node);
            }
            let root = *all.last().unwrap();
            (graph, root, literals)
        },
    )
}

proptest! {
    #[test]
    fn every_clause_makes_the_graph_true((graph, root, _) in random_graph()) {
        for clause in as_dnf(&graph, root).clauses() {
            let assignment: HashSet<Literal> = clause.iter().cloned().collect();
            prop_assert!(holds(&graph, root, &assignment));
        }
    }

    #[test]
    fn dnf_agrees_with_the_graph(
        (graph, root, literals) in random_graph(),
        mask in 0u8..32,
    ) {
        let assignment: HashSet<Literal> = literals
            .into_iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, l)| l)
            .collect();
        prop_assert_eq!(
            as_dnf(&graph, root).is_satisfied_by(&assignment),
            holds(&graph, root, &assignment)
        );
    }
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn text_and_dot_render_every_node() {
    let s = Subject::node(NodeId::fresh(), "mul");
    let mut graph = ExplanationGraph::new();
    let root = graph.add_part(Part::Output(0), s.clone());
    let a = graph.add_part(Part::Input(0), s.clone());
    let b = graph.add_part(Part::Input(1), s);
    let or = graph
        .connective(Connective::Or, &[a, b], Collapse::Keep)
        .unwrap();
    graph.add_child(root, or, Quality::Exact);

    let text = TextFormatter::new().format(&graph, root);
    assert_eq!(text.lines().count(), 4);
    assert_eq!(text.lines().nth(1).unwrap().trim(), "OR");

    let wide = TextFormatter::new().with_indent(4).format(&graph, root);
    assert!(wide.lines().nth(2).unwrap().starts_with("        input 0"));

    let dot = DotFormatter::new().format(&graph, root);
    assert!(dot.starts_with("digraph"));
    assert_eq!(dot.matches("->").count(), 3);
}
