//! Integration tests for memoized evaluation

use std::sync::Arc;
use std::sync::atomic::Ordering;

use lineage_engine::{Atomic, Circuit, Function};
use lineage_foundation::Value;
use lineage_stdlib::{Addition, CountingFunction, Multiplication};

/// `(x + y) * (x + y)` with one shared, counted adder.
fn shared_square() -> (Circuit, Arc<std::sync::atomic::AtomicUsize>) {
    let adder = CountingFunction::new(Addition::new());
    let calls = adder.counter();
    let mut circuit = Circuit::new("square", 2, 1);
    let add = circuit.add(adder.into_function());
    let mul = circuit.add(Multiplication::new().into_function());
    circuit.connect(add, 0, mul, 0).unwrap();
    circuit.connect(add, 0, mul, 1).unwrap();
    circuit.associate_input(0, add, 0).unwrap();
    circuit.associate_input(1, add, 1).unwrap();
    circuit.associate_output(0, mul, 0).unwrap();
    (circuit, calls)
}

#[test]
fn fan_out_evaluates_the_source_once() {
    let (mut circuit, calls) = shared_square();
    let out = circuit.evaluate(&[Value::Int(1), Value::Int(2)]).unwrap();
    assert_eq!(&out[..], &[Value::Int(9)]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn same_inputs_return_the_cached_outputs() {
    let (mut circuit, calls) = shared_square();
    let first = circuit.evaluate(&[Value::Int(1), Value::Int(2)]).unwrap();
    let second = circuit.evaluate(&[Value::Int(1), Value::Int(2)]).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn new_inputs_recompute() {
    let (mut circuit, calls) = shared_square();
    circuit.evaluate(&[Value::Int(1), Value::Int(2)]).unwrap();
    let out = circuit.evaluate(&[Value::Int(2), Value::Int(2)]).unwrap();
    assert_eq!(&out[..], &[Value::Int(16)]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn reset_clears_every_level() {
    let (mut circuit, calls) = shared_square();
    circuit.evaluate(&[Value::Int(1), Value::Int(2)]).unwrap();
    circuit.reset();
    assert!(!circuit.is_evaluated());
    assert!(circuit
        .nested()
        .inner()
        .iter()
        .all(|f| !f.is_evaluated()));
    circuit.evaluate(&[Value::Int(1), Value::Int(2)]).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
