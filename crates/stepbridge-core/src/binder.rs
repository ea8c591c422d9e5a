//! Argument binding from call arguments to action inputs.
//!
//! Binding never fails: names absent from the call arguments are bound to
//! null, and type mismatches surface later during invocation.

use std::collections::HashMap;

use serde_json::{Map, Value};
use stepbridge_types::run::CallArguments;
use stepbridge_types::value::to_string_value;

static NULL: Value = Value::Null;

/// Inputs bound for one native invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    values: HashMap<String, Value>,
}

impl BoundArguments {
    /// The bound value for `name`; null when the input was not supplied or
    /// `name` was never requested.
    pub fn get(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&NULL)
    }

    /// The bound value for `name` if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).as_str()
    }

    /// The bound value for `name` rendered with the output string rule.
    pub fn get_string(&self, name: &str) -> Option<String> {
        stepbridge_types::value::to_output_string(self.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bind the requested input `names` from `arguments`.
///
/// Present names map to their supplied value, absent names to null.
pub fn bind<'a, I>(names: I, arguments: &CallArguments) -> BoundArguments
where
    I: IntoIterator<Item = &'a str>,
{
    let values = names
        .into_iter()
        .map(|name| {
            let value = arguments.get(name).cloned().unwrap_or(Value::Null);
            (name.to_string(), value)
        })
        .collect();
    BoundArguments { values }
}

/// Present every supplied argument in its string form, as scripts see them.
pub fn bind_as_strings(arguments: &CallArguments) -> Map<String, Value> {
    arguments
        .iter()
        .map(|(name, value)| (name.clone(), to_string_value(value)))
        .collect()
}
