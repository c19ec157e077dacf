//! Integration tests for Layer 1: Graph
//!
//! Tests for the node/pin substrate, traversal, nesting, and flattening.

mod nesting;
