//! Output collection.
//!
//! Whichever strategy ran, its raw result is a map of dynamic values. The
//! collector applies the string conversion rule to every value. Null values
//! stay present keys with a `None` output.

use std::collections::HashMap;

use serde_json::Value;
use stepbridge_types::run::Outputs;
use stepbridge_types::value::to_output_string;

/// Unnormalized output of a native invocation or a script namespace harvest.
pub type RawResult = HashMap<String, Value>;

/// Normalize a raw result into the final outputs mapping.
pub fn collect(raw: RawResult) -> Outputs {
    raw.into_iter()
        .map(|(name, value)| {
            let output = to_output_string(&value);
            (name, output)
        })
        .collect()
}
