//! Integration tests across all layers
//!
//! End-to-end scenarios that build circuits from standard functions,
//! evaluate them, and check the explanations they produce.

mod properties;
mod scenarios;
