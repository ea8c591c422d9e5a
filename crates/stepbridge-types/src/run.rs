//! Per-invocation input and output types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named inputs supplied to one action invocation.
pub type CallArguments = HashMap<String, Value>;

/// Final action outputs. A `None` value is a present key whose value is null.
pub type Outputs = HashMap<String, Option<String>>;

/// The outputs of one action invocation, written once into the run
/// environment and retrieved once by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnValues {
    outputs: Outputs,
}

impl ReturnValues {
    pub fn new(outputs: Outputs) -> Self {
        Self { outputs }
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn into_outputs(self) -> Outputs {
        self.outputs
    }

    /// Output value for `name`. Returns `None` both for absent keys and for
    /// null values; use [`ReturnValues::contains`] to tell them apart.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
