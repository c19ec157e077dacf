//! Integration tests for circuit evaluation

use lineage_engine::{Atomic, Circuit, Function};
use lineage_foundation::{ErrorCategory, ErrorKind, Value};
use lineage_graph::Node;
use lineage_stdlib::{Addition, Constant, Fork, IfThenElse, LessThan, Multiplication, Negation};

// =============================================================================
// Helper Functions
// =============================================================================

/// `|x|` built from a comparison, a negation and a conditional.
fn absolute() -> Circuit {
    let mut circuit = Circuit::new("abs", 1, 1);
    let fork = circuit.add(Fork::new(3).into_function());
    let zero = circuit.add(Constant::new(0).into_function());
    let less = circuit.add(LessThan.into_function());
    let neg = circuit.add_boxed(Negation.into_function().boxed());
    let choose = circuit.add(IfThenElse.into_function());
    circuit.connect(fork, 0, less, 0).unwrap();
    circuit.connect(zero, 0, less, 1).unwrap();
    circuit.connect(fork, 1, neg, 0).unwrap();
    circuit.connect(less, 0, choose, 0).unwrap();
    circuit.connect(neg, 0, choose, 1).unwrap();
    circuit.connect(fork, 2, choose, 2).unwrap();
    circuit.associate_input(0, fork, 0).unwrap();
    circuit.associate_output(0, choose, 0).unwrap();
    circuit
}

// =============================================================================
// Evaluation
// =============================================================================

#[test]
fn evaluates_through_every_layer() {
    let mut abs = absolute();
    assert_eq!(&abs.evaluate(&[Value::Int(-4)]).unwrap()[..], &[Value::Int(4)]);
    assert_eq!(&abs.evaluate(&[Value::Int(3)]).unwrap()[..], &[Value::Int(3)]);
}

#[test]
fn one_input_may_feed_several_inner_inputs() {
    let mut circuit = Circuit::new("square-plus", 1, 1);
    let mul = circuit.add(Multiplication::new().into_function());
    let add = circuit.add(Addition::new().into_function());
    circuit.connect(mul, 0, add, 0).unwrap();
    circuit.associate_input(0, mul, 0).unwrap();
    circuit.associate_input(0, mul, 1).unwrap();
    circuit.associate_input(0, add, 1).unwrap();
    circuit.associate_output(0, add, 0).unwrap();
    assert_eq!(&circuit.evaluate(&[Value::Int(3)]).unwrap()[..], &[Value::Int(12)]);
}

#[test]
fn circuits_nest() {
    let mut outer = Circuit::new("abs-sum", 2, 1);
    let add = outer.add(Addition::new().into_function());
    let abs = outer.add(absolute());
    outer.connect(add, 0, abs, 0).unwrap();
    outer.associate_input(0, add, 0).unwrap();
    outer.associate_input(1, add, 1).unwrap();
    outer.associate_output(0, abs, 0).unwrap();
    assert_eq!(
        &outer.evaluate(&[Value::Int(2), Value::Int(-9)]).unwrap()[..],
        &[Value::Int(7)]
    );

    let flat = outer.flatten().unwrap();
    assert_eq!(flat.nested().inner().len(), 6);
    let mut flat = flat;
    assert_eq!(
        &flat.evaluate(&[Value::Int(2), Value::Int(-9)]).unwrap()[..],
        &[Value::Int(7)]
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn leaf_errors_carry_the_circuit_frame() {
    let mut abs = absolute();
    let err = abs.evaluate(&[Value::from("x")]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Type);
    assert_eq!(err.context.unwrap().stack, vec!["abs"]);
}

#[test]
fn unwired_outputs_fail_before_evaluating() {
    let mut circuit = Circuit::new("half", 1, 1);
    let neg = circuit.add_boxed(Negation.into_function().boxed());
    circuit.associate_input(0, neg, 0).unwrap();
    let err = circuit.evaluate(&[Value::Int(1)]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Unassociated { .. }));
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn argument_count_is_checked() {
    let mut abs = absolute();
    let err = abs.evaluate(&[]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::ArityMismatch {
            expected: 1,
            actual: 0
        }
    ));
}

// =============================================================================
// Duplication
// =============================================================================

#[test]
fn duplicates_get_fresh_identities() {
    let abs = absolute();
    let copy = abs.duplicate(false);
    assert_ne!(copy.id(), abs.id());
    let originals: Vec<_> = abs.nested().inner().ids().collect();
    let copies: Vec<_> = copy
        .as_circuit()
        .unwrap()
        .nested()
        .inner()
        .ids()
        .collect();
    assert_eq!(originals.len(), copies.len());
    assert!(copies.iter().all(|id| !originals.contains(id)));
}

#[test]
fn duplicates_may_carry_state() {
    let mut abs = absolute();
    abs.evaluate(&[Value::Int(-1)]).unwrap();
    let with_state = abs.duplicate(true);
    let fresh = abs.duplicate(false);
    assert_eq!(with_state.last_outputs(), Some(&[Value::Int(1)][..]));
    assert!(!fresh.is_evaluated());
}
