//! Integration tests for the Tracer

use std::cell::Cell;

use lineage_explain::{
    Connective, Explainable, NodeIndex, NodeKind, Quality, Subject, Tracer, TracerConfig,
};
use lineage_foundation::{NodeId, Part, Result, Value};

/// Explains each output by both inputs; input parts lead to an upstream
/// stage when there is one. Counts how often it is asked.
struct Stage<'a> {
    id: NodeId,
    upstream: Option<&'a Stage<'a>>,
    asked: Cell<usize>,
}

impl<'a> Stage<'a> {
    fn new(upstream: Option<&'a Stage<'a>>) -> Self {
        Self {
            id: NodeId::fresh(),
            upstream,
            asked: Cell::new(0),
        }
    }
}

impl Explainable for Stage<'_> {
    fn subject(&self) -> Subject {
        Subject::node(self.id, "stage")
    }

    fn explain(&self, part: &Part, root: NodeIndex, tracer: &mut Tracer) -> Result<()> {
        self.asked.set(self.asked.get() + 1);
        if part.mentioned_output().is_none() {
            return Ok(());
        }
        let mut inputs = Vec::new();
        for i in 0..2 {
            let leaf = tracer.leaf(Part::Input(i), self.subject());
            if let Some(upstream) = self.upstream {
                let cause = tracer.trace(&Part::Output(0), upstream)?;
                tracer.add_child(leaf, cause);
            }
            inputs.push(leaf);
        }
        if let Some(and) = tracer.connective(Connective::And, &inputs) {
            tracer.add_child(root, and);
        }
        Ok(())
    }
}

#[test]
fn repeated_queries_return_the_same_node() {
    let stage = Stage::new(None);
    let mut tracer = Tracer::new();
    let first = tracer.query(&Part::Output(0), &stage).unwrap();
    let second = tracer.query(&Part::Output(0), &stage).unwrap();
    assert_eq!(first, second);
    assert_eq!(stage.asked.get(), 1);
    assert_eq!(tracer.roots(), &[first]);
}

#[test]
fn shared_causes_are_expanded_once() {
    let source = Stage::new(None);
    let middle = Stage::new(Some(&source));
    let mut tracer = Tracer::new();
    tracer.query(&Part::Output(0), &middle).unwrap();
    assert_eq!(source.asked.get(), 1);
}

#[test]
fn tree_mode_duplicates_shared_causes() {
    let source = Stage::new(None);
    let middle = Stage::new(Some(&source));
    let mut tracer = Tracer::with_config(TracerConfig::new().as_tree());
    let root = tracer.query(&Part::Output(0), &middle).unwrap();
    assert_eq!(source.asked.get(), 2);
    let sources = tracer
        .graph()
        .reachable(root)
        .into_iter()
        .filter(|&i| tracer.graph()[i].subject() == Some(&source.subject()))
        .filter(|&i| tracer.graph()[i].part() == Some(&Part::Output(0)))
        .count();
    assert_eq!(sources, 2);
}

#[test]
fn queries_merge_into_one_graph() {
    let source = Stage::new(None);
    let left = Stage::new(Some(&source));
    let right = Stage::new(Some(&source));
    let mut tracer = Tracer::new();
    let a = tracer.query(&Part::Output(0), &left).unwrap();
    let b = tracer.query(&Part::Output(0), &right).unwrap();
    let explanation = tracer.finish();
    assert_eq!(explanation.roots, vec![a, b]);
    let shared = explanation.graph.reachable(a);
    assert!(explanation
        .graph
        .reachable(b)
        .iter()
        .any(|node| shared.contains(node)));
}

#[test]
fn depth_limit_ends_in_unknown() {
    let bottom = Stage::new(None);
    let mid = Stage::new(Some(&bottom));
    let top = Stage::new(Some(&mid));
    let mut tracer = Tracer::with_config(TracerConfig::new().with_max_depth(1));
    let root = tracer.query(&Part::Output(0), &top).unwrap();
    let graph = tracer.graph();
    assert!(graph
        .reachable(root)
        .iter()
        .any(|&i| matches!(graph[i].kind(), NodeKind::Unknown)));
    assert_eq!(bottom.asked.get(), 0);
}

#[test]
fn trivial_parts_are_terminal() {
    let stage = Stage::new(None);
    let mut tracer = Tracer::new();
    let root = tracer.query(&Part::All, &stage).unwrap();
    assert!(tracer.graph()[root].is_leaf());
    assert_eq!(stage.asked.get(), 0);
}

#[test]
fn opaque_subjects_get_unknown_leaves() {
    let mut tracer = Tracer::new();
    let subject = Subject::value(Value::Int(4));
    let node = tracer.trace_opaque(&Part::Element(0), subject.clone());
    let child = tracer.graph()[node].children().next().unwrap();
    assert!(matches!(tracer.graph()[child].kind(), NodeKind::Unknown));
    let whole = tracer.trace_opaque(&Part::All, subject);
    assert!(tracer.graph()[whole].is_leaf());
}

#[test]
fn frontier_lists_open_input_leaves() {
    let stage = Stage::new(None);
    let mut tracer = Tracer::new();
    let root = tracer.query(&Part::Output(0), &stage).unwrap();
    let frontier = tracer.frontier(root, &stage.subject());
    let parts: Vec<_> = frontier
        .iter()
        .map(|&i| tracer.graph()[i].part().cloned().unwrap())
        .collect();
    assert_eq!(parts, vec![Part::Input(0), Part::Input(1)]);
}

#[test]
fn kept_connectives_survive_with_one_child() {
    let subject = Subject::node(NodeId::fresh(), "f");
    let mut collapsing = Tracer::new();
    let leaf = collapsing.leaf(Part::Input(0), subject.clone());
    assert_eq!(collapsing.connective(Connective::Or, &[leaf]), Some(leaf));

    let mut keeping = Tracer::with_config(TracerConfig::new().keep_connectives());
    let leaf = keeping.leaf(Part::Input(0), subject);
    let or = keeping.connective(Connective::Or, &[leaf]).unwrap();
    assert_ne!(or, leaf);
    assert_eq!(keeping.graph()[or].connective(), Some(Connective::Or));
}

#[test]
fn edges_carry_their_quality() {
    let subject = Subject::node(NodeId::fresh(), "f");
    let mut tracer = Tracer::new();
    let root = tracer.leaf(Part::Output(0), subject.clone());
    let input = tracer.leaf(Part::Input(0), subject);
    tracer.add_child_with(root, input, Quality::Over);
    let edges = tracer.graph()[root].edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].target, input);
    assert_eq!(edges[0].quality, Quality::Over);
}
