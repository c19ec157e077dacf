//! Integration tests for nested nodes and flattening

use lineage_foundation::{ErrorKind, NodeId};
use lineage_graph::{BasicNode, Flatten, Graph, NestedNode, Node, Pin, Ports, flatten};

#[derive(Clone, Debug)]
enum Unit {
    Plain(BasicNode),
    Nested(NestedNode<Unit>),
}

impl Node for Unit {
    fn ports(&self) -> &Ports {
        match self {
            Self::Plain(n) => n.ports(),
            Self::Nested(n) => n.ports(),
        }
    }

    fn ports_mut(&mut self) -> &mut Ports {
        match self {
            Self::Plain(n) => n.ports_mut(),
            Self::Nested(n) => n.ports_mut(),
        }
    }

    fn clone_node(&self, with_state: bool) -> Self {
        match self {
            Self::Plain(n) => Self::Plain(n.clone_node(with_state)),
            Self::Nested(n) => Self::Nested(n.clone_node(with_state)),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Plain(n) => n.label(),
            Self::Nested(_) => "nested".to_string(),
        }
    }
}

impl Flatten for Unit {
    fn as_nested(&self) -> Option<&NestedNode<Self>> {
        match self {
            Self::Plain(_) => None,
            Self::Nested(n) => Some(n),
        }
    }
}

fn plain(name: &str, inputs: usize, outputs: usize) -> Unit {
    Unit::Plain(BasicNode::new(name, inputs, outputs))
}

// Two inputs both feeding one adder, then a doubler.
fn adder() -> (NestedNode<Unit>, NodeId, NodeId) {
    let mut nested = NestedNode::new(2, 1);
    let add = nested.add(plain("add", 2, 1));
    let double = nested.add(plain("double", 1, 1));
    nested.connect(add, 0, double, 0).unwrap();
    nested.associate_input(0, add, 0).unwrap();
    nested.associate_input(1, add, 1).unwrap();
    nested.associate_output(0, double, 0).unwrap();
    (nested, add, double)
}

#[test]
fn associations_resolve_and_validate() {
    let (nested, add, double) = adder();
    nested.validate().unwrap();
    assert_eq!(nested.input_association(1).unwrap(), Pin::new(add, 1));
    assert_eq!(nested.output_association(0).unwrap(), Pin::new(double, 0));
    assert_eq!(nested.inputs_feeding(Pin::new(add, 0)), vec![0]);
}

#[test]
fn incomplete_nesting_is_a_configuration_error() {
    let mut nested: NestedNode<Unit> = NestedNode::new(1, 1);
    let p = nested.add(plain("p", 1, 1));
    nested.associate_output(0, p, 0).unwrap();
    let err = nested.validate().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Unassociated { index: 0, .. }));
}

#[test]
fn duplicates_have_fresh_inner_identities() {
    let (nested, add, _) = adder();
    let copy = nested.duplicate(false);
    let inner = copy.input_association(0).unwrap();
    assert_ne!(inner.node, add);
    assert!(copy.inner().contains(inner.node));
    copy.validate().unwrap();
}

#[test]
fn flatten_splices_inner_graphs() {
    let (nested, add, double) = adder();
    let mut graph = Graph::new();
    let x = graph.add(plain("x", 0, 1));
    let y = graph.add(plain("y", 0, 1));
    let boxed = graph.add(Unit::Nested(nested));
    let out = graph.add(plain("out", 1, 0));
    graph.connect(x, 0, boxed, 0).unwrap();
    graph.connect(y, 0, boxed, 1).unwrap();
    graph.connect(boxed, 0, out, 0).unwrap();

    let flat = flatten(&graph).unwrap();
    assert_eq!(flat.graph.len(), 5);
    assert!(flat.graph.iter().all(|n| flat_is_plain(n)));

    let add_in = flat.resolve_input(boxed, 1).unwrap();
    assert_eq!(Some(add_in.node), flat.copy_of(add));
    let y_copy = flat.copy_of(y).unwrap();
    assert_eq!(
        flat.graph.node(add_in.node).unwrap().ports().upstream(1).unwrap(),
        Some(Pin::new(y_copy, 0))
    );
    let double_out = flat.resolve_output(boxed, 0).unwrap();
    assert_eq!(Some(double_out.node), flat.copy_of(double));
}

fn flat_is_plain(node: &Unit) -> bool {
    node.as_nested().is_none()
}
