//! Per-function evaluation memo.

use std::sync::Arc;

use lineage_foundation::Value;

/// The last inputs a function was evaluated on and the outputs it produced.
///
/// Outputs are shared: a hit hands out the same allocation every time, so
/// callers can tell a cached result from a recomputed one with
/// [`Arc::ptr_eq`].
#[derive(Clone, Debug, Default)]
pub struct Memo {
    inputs: Option<Vec<Value>>,
    outputs: Option<Arc<[Value]>>,
}

impl Memo {
    /// Creates an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached outputs if the memo holds exactly these inputs.
    #[must_use]
    pub fn lookup(&self, inputs: &[Value]) -> Option<Arc<[Value]>> {
        match (&self.inputs, &self.outputs) {
            (Some(cached), Some(outputs)) if cached.as_slice() == inputs => Some(outputs.clone()),
            _ => None,
        }
    }

    /// Replaces the memo and returns the shared outputs.
    pub fn store(&mut self, inputs: Vec<Value>, outputs: Vec<Value>) -> Arc<[Value]> {
        let outputs: Arc<[Value]> = outputs.into();
        self.inputs = Some(inputs);
        self.outputs = Some(outputs.clone());
        outputs
    }

    /// Forgets the last evaluation.
    pub fn clear(&mut self) {
        self.inputs = None;
        self.outputs = None;
    }

    /// Returns the last inputs.
    #[must_use]
    pub fn inputs(&self) -> Option<&[Value]> {
        self.inputs.as_deref()
    }

    /// Returns the last outputs.
    #[must_use]
    pub fn outputs(&self) -> Option<&Arc<[Value]>> {
        self.outputs.as_ref()
    }

    /// Returns true if the memo holds an evaluation.
    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.outputs.is_some()
    }
}
