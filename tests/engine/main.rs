//! Integration tests for Layer 3: Engine
//!
//! Tests circuits built from standard leaf functions: pull evaluation,
//! memoization, errors, duplication, and flattening.

mod circuits;
mod memo;
