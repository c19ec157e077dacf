//! Property tests across the engine and the tracer

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::thread;

use lineage_engine::{Atomic, Circuit, Function};
use lineage_explain::{Tracer, as_dnf, holds};
use lineage_foundation::{Part, Value};
use lineage_stdlib::{Addition, CountingFunction, Multiplication};
use proptest::prelude::*;

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

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|v| Value::Int(*v)).collect()
}

#[test]
fn repeated_queries_reuse_the_pooled_node() {
    let mut circuit = sum_times();
    circuit.evaluate(&ints(&[2, -2, 0])).unwrap();
    let mut tracer = Tracer::new();
    let first = tracer.query(&Part::Output(0), &circuit).unwrap();
    let size = tracer.graph().len();
    let second = tracer.query(&Part::Output(0), &circuit).unwrap();
    assert_eq!(first, second);
    assert_eq!(tracer.graph().len(), size);
}

#[test]
fn evaluation_happens_once_per_input_set() {
    let counted = CountingFunction::new(Multiplication::new());
    let calls = counted.counter();
    let mut circuit = Circuit::new("counted", 2, 1);
    let mul = circuit.add(counted.into_function());
    circuit.associate_input(0, mul, 0).unwrap();
    circuit.associate_input(1, mul, 1).unwrap();
    circuit.associate_output(0, mul, 0).unwrap();
    for _ in 0..3 {
        circuit.evaluate(&ints(&[3, 4])).unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn duplicates_evaluate_independently_on_threads() {
    let mut original = sum_times();
    original.evaluate(&ints(&[1, 1, 1])).unwrap();
    let copies: Vec<Box<dyn Function>> = (0..4).map(|_| original.duplicate(false)).collect();

    let results: Vec<Value> = thread::scope(|scope| {
        let handles: Vec<_> = copies
            .into_iter()
            .zip(0_i64..)
            .map(|(mut copy, n)| {
                scope.spawn(move || copy.evaluate(&ints(&[n, 1, 2])).unwrap()[0].clone())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, ints(&[2, 4, 6, 8]));
    assert_eq!(original.last_outputs(), Some(&[Value::Int(2)][..]));
}

proptest! {
    #[test]
    fn every_clause_satisfies_the_explanation(
        x in -3_i64..=3,
        y in -3_i64..=3,
        z in -3_i64..=3,
    ) {
        let mut circuit = sum_times();
        circuit.evaluate(&ints(&[x, y, z])).unwrap();
        let mut tracer = Tracer::new();
        let root = tracer.query(&Part::Output(0), &circuit).unwrap();
        let dnf = as_dnf(tracer.graph(), root);
        prop_assert!(!dnf.is_empty());
        for clause in dnf.clauses() {
            let assignment: HashSet<_> = clause.iter().cloned().collect();
            prop_assert!(holds(tracer.graph(), root, &assignment));
        }
    }

    #[test]
    fn queries_are_idempotent(x in -3_i64..=3, z in -3_i64..=3) {
        let mut circuit = sum_times();
        circuit.evaluate(&ints(&[x, 1, z])).unwrap();
        let mut tracer = Tracer::new();
        let root = tracer.query(&Part::Output(0), &circuit).unwrap();
        let before = as_dnf(tracer.graph(), root);
        let again = tracer.query(&Part::Output(0), &circuit).unwrap();
        prop_assert_eq!(root, again);
        prop_assert_eq!(before, as_dnf(tracer.graph(), again));
    }
}
