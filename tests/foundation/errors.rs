//! Integration tests for Error types
//!
//! Tests categories, messages, and context frames.

use lineage_foundation::{Error, ErrorCategory, ErrorKind, NodeId, PortKind};

#[test]
fn categories_follow_the_taxonomy() {
    assert_eq!(
        Error::arity_mismatch(2, 1).category(),
        ErrorCategory::Structural
    );
    assert_eq!(
        Error::unassociated(PortKind::Input, 0).category(),
        ErrorCategory::Configuration
    );
    assert_eq!(
        Error::unconnected(NodeId::fresh(), 1).category(),
        ErrorCategory::Configuration
    );
    assert_eq!(
        Error::new(ErrorKind::DivisionByZero).category(),
        ErrorCategory::Evaluation
    );
}

#[test]
fn messages_name_the_problem() {
    let err = Error::arity_mismatch(2, 3);
    assert_eq!(
        err.to_string(),
        "arity mismatch: expected 2 arguments, got 3"
    );
    let err = Error::unassociated(PortKind::Output, 1);
    assert!(err.to_string().contains("not associated"));
}

#[test]
fn frames_stack_innermost_first() {
    let err = Error::new(ErrorKind::DivisionByZero)
        .in_frame("inner")
        .in_frame("outer");
    let context = err.context.unwrap();
    assert_eq!(context.stack, vec!["inner", "outer"]);
    let rendered = context.to_string();
    assert!(rendered.contains("in inner"));
}
