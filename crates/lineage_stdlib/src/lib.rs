//! Leaf functions for Lineage.
//!
//! Every function here is an [`Atomic`](lineage_engine::Atomic) behaviour;
//! wrap it with [`into_function`](lineage_engine::Atomic::into_function) to
//! place it in a circuit. Functions are organized by category:
//! - [`basic`] - Constants, identity, fan-out, call counting
//! - [`arithmetic`] - Addition, subtraction, multiplication, division, negation
//! - [`compare`] - Ordering and equality tests
//! - [`logic`] - Boolean connectives and conditional choice
//! - [`vector`] - Element-wise application, quantifiers, indexing, sums
//! - [`string`] - Splitting, concatenation, length
//!
//! Functions whose result is decided by a subset of their inputs (a zero
//! factor, a false conjunct, the taken branch) explain themselves by those
//! inputs only.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arithmetic;
pub mod basic;
pub mod compare;
pub mod logic;
pub mod string;
pub mod vector;

pub use arithmetic::{Addition, Division, Multiplication, Negation, Subtraction};
pub use basic::{Constant, CountingFunction, Fork, Identity};
pub use compare::{Equals, GreaterThan, LessThan};
pub use logic::{And, IfThenElse, Not, Or};
pub use string::{Concat, Split, StringLength};
pub use vector::{ApplyToAll, Exists, ForAll, Length, NthElement, Sum};
