//! Function evaluation and local explanations for Lineage.
//!
//! This crate provides:
//! - [`Function`] - The contract every computation unit implements
//! - [`Memo`] - Last inputs and outputs of a function
//! - [`Atomic`] and [`AtomicFunction`] - Leaf behaviour wrapped with ports and memo
//! - [`Cause`] - Local explanation fragments rendered onto a tracer
//! - [`Circuit`] - A function built from an inner graph of functions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod atomic;
pub mod cause;
pub mod circuit;
pub mod function;
pub mod memo;

pub use atomic::{Atomic, AtomicFunction, Query};
pub use cause::Cause;
pub use circuit::Circuit;
pub use function::Function;
pub use memo::Memo;
