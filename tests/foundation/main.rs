//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Part designators, and Error.

mod errors;
mod parts;
mod values;
