//! Integration tests for end-to-end explanation scenarios

use std::collections::BTreeSet;

use lineage_engine::{Atomic, Circuit, Function};
use lineage_explain::{Explainable, Literal, NodeIndex, Subject, Tracer, as_dnf, is_squashed, squash};
use lineage_foundation::{Part, Value};
use lineage_stdlib::{
    Addition, And, ApplyToAll, Constant, Exists, GreaterThan, Multiplication, Split,
};

// =============================================================================
// Helper Functions
// =============================================================================

/// `(x + y) * z`.
fn sum_times() -> Circuit {
    let mut circuit = Circuit::new("sum-times", 3, 1);
    let add = circuit.add(Addition::new().into_function());
    let mul = circuit.add(Multiplication::new().into_function());
    circuit.connect(add, 0, mul, 0).unwrap();
    circuit.associate_input(0, add, 0).unwrap();
    circuit.associate_input(1, add, 1).unwrap();
    circuit.associate_input(2, mul, 1).unwrap();
    circuit.associate_output(0, mul, 0).unwrap();
    circuit
}

/// `x > 1`.
fn greater_than_one() -> Box<dyn Function> {
    let mut circuit = Circuit::new("gt-one", 1, 1);
    let one = circuit.add(Constant::new(1).into_function());
    let gt = circuit.add(GreaterThan.into_function());
    circuit.connect(one, 0, gt, 1).unwrap();
    circuit.associate_input(0, gt, 0).unwrap();
    circuit.associate_output(0, gt, 0).unwrap();
    Box::new(circuit)
}

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|v| Value::Int(*v)).collect()
}

/// The DNF of `root` as sets of parts of `owner`, dropping other facts.
fn clauses(tracer: &Tracer, root: NodeIndex, owner: &Subject) -> BTreeSet<BTreeSet<Part>> {
    as_dnf(tracer.graph(), root)
        .clauses()
        .iter()
        .map(|clause| {
            clause
                .iter()
                .filter_map(|literal| match literal {
                    Literal::Fact { part, subject } if subject == owner => Some(part.clone()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn set<const N: usize>(parts: [Part; N]) -> BTreeSet<Part> {
    parts.into_iter().collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn zero_factor_explains_the_product_alone() {
    let mut circuit = sum_times();
    let out = circuit.evaluate(&ints(&[2, 3, 0])).unwrap();
    assert_eq!(&out[..], &[Value::Int(0)]);

    let mut tracer = Tracer::new();
    let root = tracer.query(&Part::Output(0), &circuit).unwrap();
    let dnf = as_dnf(tracer.graph(), root);
    assert_eq!(dnf.len(), 1);
    let only: Vec<_> = dnf.clauses()[0].iter().cloned().collect();
    assert_eq!(only, vec![Literal::fact(Part::Input(2), circuit.subject())]);
}

#[test]
fn failed_reevaluation_forgets_the_previous_product() {
    let mut circuit = sum_times();
    circuit.evaluate(&ints(&[2, 3, 0])).unwrap();
    let bad = [Value::Int(2), Value::Int(3), Value::from("x")];
    assert!(circuit.evaluate(&bad).is_err());
    assert!(!circuit.is_evaluated());
    assert_eq!(circuit.last_outputs(), None);

    let out = circuit.evaluate(&ints(&[2, 3, 0])).unwrap();
    assert_eq!(&out[..], &[Value::Int(0)]);
    let mut tracer = Tracer::new();
    let root = tracer.query(&Part::Output(0), &circuit).unwrap();
    assert_eq!(
        clauses(&tracer, root, &circuit.subject()),
        BTreeSet::from([set([Part::Input(2)])])
    );
}

#[test]
fn two_zero_factors_are_alternatives() {
    let mut circuit = sum_times();
    circuit.evaluate(&ints(&[2, -2, 0])).unwrap();
    let mut tracer = Tracer::new();
    let root = tracer.query(&Part::Output(0), &circuit).unwrap();
    assert_eq!(
        clauses(&tracer, root, &circuit.subject()),
        BTreeSet::from([
            set([Part::Input(2)]),
            set([Part::Input(0), Part::Input(1)]),
        ])
    );
}

#[test]
fn false_conjunct_explains_the_conjunction() {
    let mut and = And::with_arity(3).into_function();
    let out = and
        .evaluate(&[Value::Bool(true), Value::Bool(false), Value::Bool(true)])
        .unwrap();
    assert_eq!(&out[..], &[Value::Bool(false)]);
    let mut tracer = Tracer::new();
    let root = tracer.query(&Part::Output(0), &and).unwrap();
    assert_eq!(
        clauses(&tracer, root, &and.subject()),
        BTreeSet::from([set([Part::Input(1)])])
    );
}

#[test]
fn quantifier_inside_apply_to_all_reaches_nested_elements() {
    let exists = Exists::new(greater_than_one()).unwrap().into_function().boxed();
    let mut apply = ApplyToAll::new(exists).unwrap().into_function();
    let input = Value::from(vec![Value::from(vec![1, 2]), Value::from(vec![0, 1])]);
    let out = apply.evaluate(&[input]).unwrap();
    assert_eq!(out[0], Value::from(vec![true, false]));

    let mut tracer = Tracer::new();
    let part = Part::Output(0).then(Part::Element(1));
    let root = tracer.query(&part, &apply).unwrap();
    let owner = apply.subject();
    let graph = tracer.graph();
    let reached: BTreeSet<Part> = graph
        .leaves(root)
        .into_iter()
        .filter(|l| graph[*l].subject() == Some(&owner))
        .filter_map(|l| graph[l].part().cloned())
        .collect();
    let element = |n| Part::Input(0).then(Part::Element(1)).then(Part::Element(n));
    assert_eq!(reached, set([element(0), element(1)]));

    // Nothing but the queried element takes part.
    let clauses = clauses(&tracer, root, &owner);
    assert_eq!(clauses, BTreeSet::from([set([element(0), element(1)])]));
}

#[test]
fn split_element_maps_to_a_character_range() {
    let mut split = Split::new(",").into_function();
    let out = split.evaluate(&[Value::from("the,2,penny")]).unwrap();
    assert_eq!(out[0], Value::from(vec!["the", "2", "penny"]));
    let mut tracer = Tracer::new();
    let root = tracer
        .query(&Part::Output(0).then(Part::Element(1)), &split)
        .unwrap();
    assert_eq!(
        clauses(&tracer, root, &split.subject()),
        BTreeSet::from([set([Part::Input(0).then(Part::range(4, 4))])])
    );
}

#[test]
fn squashed_explanations_keep_their_leaves() {
    let mut circuit = sum_times();
    circuit.evaluate(&ints(&[1, 2, 3])).unwrap();
    let mut tracer = Tracer::new();
    let root = tracer.query(&Part::Output(0), &circuit).unwrap();

    let (once, once_root) = squash(tracer.graph(), root);
    let once_root = once_root.unwrap();
    let (twice, twice_root) = squash(&once, once_root);
    let twice_root = twice_root.unwrap();

    let leaf_parts = |graph: &lineage_explain::ExplanationGraph, root| -> BTreeSet<Part> {
        graph
            .leaves(root)
            .into_iter()
            .filter_map(|l| graph[l].part().cloned())
            .collect()
    };
    assert_eq!(leaf_parts(&once, once_root), leaf_parts(&twice, twice_root));
    assert!(is_squashed(&once, once_root));
    assert_eq!(
        leaf_parts(&once, once_root),
        set([Part::Input(0), Part::Input(1), Part::Input(2)])
    );
}
