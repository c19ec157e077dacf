//! Integration tests for Layer 2: Explain
//!
//! Tests for the tracer, graph utilities (squash, DNF), and rendering.

mod tracer;
mod utilities;
