//! Integration tests for Part designators
//!
//! Tests composition, structural equality, navigation, and display.

use lineage_foundation::{Part, Target, Value};
use proptest::prelude::*;

// =============================================================================
// Composition
// =============================================================================

#[test]
fn then_builds_paths_in_application_order() {
    let part = Part::Output(0).then(Part::Element(1));
    assert_eq!(part.head(), &Part::Output(0));
    assert_eq!(part.tail(), Part::Element(1));
    assert_eq!(part.mentioned_output(), Some(0));
    assert_eq!(part.mentioned_input(), None);
}

#[test]
fn of_reads_inside_out() {
    assert_eq!(
        Part::Element(1).of(Part::Input(0)),
        Part::Input(0).then(Part::Element(1))
    );
}

#[test]
fn trivial_parts_need_no_explanation() {
    assert!(Part::All.is_trivial());
    assert!(Part::Nothing.is_trivial());
    assert!(Part::Unknown.is_trivial());
    assert!(!Part::Input(0).is_trivial());
}

#[test]
fn heads_can_be_replaced() {
    let part = Part::Input(2).then(Part::Element(1));
    assert_eq!(
        part.replace_head(Part::Output(0)),
        Part::Output(0).then(Part::Element(1))
    );
    assert_eq!(
        part.replace_input_with(Part::Input(0).then(Part::Element(7))),
        Part::Input(0).then(Part::Element(7)).then(Part::Element(1))
    );
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn select_navigates_values() {
    let value = Value::from(vec![Value::from("the"), Value::from("penny")]);
    let part = Part::Element(1).then(Part::range(1, 3));
    assert_eq!(part.select(&value), Some(Value::from("enn")));
    assert_eq!(Part::Element(5).select(&value), None);
}

#[test]
fn applies_to_port_signatures() {
    let ports = Target::Ports {
        inputs: 2,
        outputs: 1,
    };
    assert!(Part::Input(1).applies_to(ports));
    assert!(!Part::Output(1).applies_to(ports));
    assert!(Part::All.applies_to(ports));
}

#[test]
fn display_reads_outermost_first() {
    let part = Part::Input(0).then(Part::Element(1)).then(Part::range(4, 4));
    assert_eq!(part.to_string(), "chars 4-4 of element 1 of input 0");
}

// =============================================================================
// Properties
// =============================================================================

fn atomic_part() -> impl Strategy<Value = Part> {
    prop_oneof![
        (0..4usize).prop_map(Part::Input),
        (0..4usize).prop_map(Part::Output),
        (0..8usize).prop_map(Part::Element),
        "[a-c]".prop_map(Part::field),
        (0..5usize, 0..5usize).prop_map(|(s, l)| Part::range(s, s + l)),
        Just(Part::All),
    ]
}

proptest! {
    #[test]
    fn independently_built_paths_are_equal(parts in prop::collection::vec(atomic_part(), 0..6)) {
        let folded = parts.iter().cloned().fold(Part::All, Part::then);
        let composed = Part::compose(parts);
        prop_assert_eq!(folded, composed);
    }

    #[test]
    fn head_and_tail_rebuild_the_path(parts in prop::collection::vec(atomic_part(), 1..6)) {
        let part = Part::compose(parts);
        prop_assert_eq!(part.head().clone().then(part.tail()), part);
    }
}
