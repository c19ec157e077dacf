//! Integration tests for Value types
//!
//! Tests equality, hashing, ordering across numeric kinds, and typed access.

use lineage_foundation::{ErrorKind, Part, Record, Type, Value};
use std::collections::HashSet;

// =============================================================================
// Equality and Hashing
// =============================================================================

#[test]
fn floats_compare_by_bits() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
}

#[test]
fn int_and_float_are_distinct_values() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn values_can_key_sets() {
    let set: HashSet<Value> = [
        Value::Int(1),
        Value::from("a"),
        Value::from(vec![1, 2]),
        Value::Int(1),
    ]
    .into_iter()
    .collect();
    assert_eq!(set.len(), 3);
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn numbers_order_across_kinds() {
    assert!(Value::Int(1) < Value::Float(1.5));
    assert!(Value::Float(2.5) > Value::Int(2));
    assert!(Value::from("a") < Value::from("b"));
    assert_eq!(Value::Int(1).partial_cmp(&Value::from("a")), None);
}

// =============================================================================
// Typed Access
// =============================================================================

#[test]
fn require_reports_expected_type() {
    let err = Value::from("x").require_number().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: Type::Number,
            actual: Type::String
        }
    ));
    assert!(Value::Int(3).require_vector().is_err());
    assert!(Value::Bool(true).require_bool().unwrap());
}

#[test]
fn vectors_from_rust_vectors() {
    let v = Value::from(vec!["a", "b"]);
    let items = v.as_vector().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items.get(1), Some(&Value::from("b")));
}

#[test]
fn record_fields_are_addressable() {
    let record = Value::from(Record::new().with("name", "penny").with("age", 3));
    assert_eq!(record.value_type(), Type::Record);
    assert_eq!(record.as_record().map(Record::len), Some(2));
    assert_eq!(Part::field("age").select(&record), Some(Value::Int(3)));
    assert_eq!(
        Part::field("name").then(Part::range(0, 1)).select(&record),
        Some(Value::from("pe"))
    );
}

#[test]
fn display_is_readable() {
    assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "[1 2 3]");
    assert_eq!(Value::from("hi").to_string(), "hi");
    assert_eq!(Value::Nil.to_string(), "nil");
}
