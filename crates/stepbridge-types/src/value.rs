//! String conversion rule for action outputs.
//!
//! Both native results and script bindings are dynamically typed
//! (`serde_json::Value`); outputs are always strings. This module owns the
//! single conversion rule between the two.
//!
//! Script arithmetic is carried out in f64, so integers beyond 2^53 are not
//! exact: `x = 9007199254740993` renders as `9007199254740992`. Native
//! results that hold an `i64`/`u64` keep every digit.

use serde_json::{Number, Value};

/// Largest magnitude for which an integral float is rendered without a
/// fractional part (2^53, the exact-integer range of f64).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Convert a dynamic value to its output string form.
///
/// - null → `None` (a present key with a null value)
/// - string → itself
/// - bool → `true` / `false`
/// - integral numbers, including integral floats such as `8081.0` → `8081`
/// - other numbers → shortest float form
/// - arrays and objects → compact JSON
pub fn to_output_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_to_string(n)),
        _ => Some(serde_json::to_string(value).unwrap_or_default()),
    }
}

/// Present an input value as a string value, as scripts see their inputs.
///
/// Null stays null so that explicitly-null inputs are still bound.
pub fn to_string_value(value: &Value) -> Value {
    match to_output_string(value) {
        Some(s) => Value::String(s),
        None => Value::Null,
    }
}

fn number_to_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(to_output_string(&json!(null)), None);
        assert_eq!(to_output_string(&json!("localhost")), Some("localhost".into()));
        assert_eq!(to_output_string(&json!(true)), Some("true".into()));
        assert_eq!(to_output_string(&json!(8080)), Some("8080".into()));
        assert_eq!(to_output_string(&json!(-3)), Some("-3".into()));
    }

    #[test]
    fn test_integral_float_renders_as_integer() {
        assert_eq!(to_output_string(&json!(8081.0)), Some("8081".into()));
        assert_eq!(to_output_string(&json!(0.0)), Some("0".into()));
    }

    #[test]
    fn test_integers_beyond_f64_precision() {
        assert_eq!(
            to_output_string(&json!(9_007_199_254_740_993.0_f64)),
            Some("9007199254740992".into())
        );
        assert_eq!(
            to_output_string(&json!(9_007_199_254_740_993_i64)),
            Some("9007199254740993".into())
        );
    }

    #[test]
    fn test_fractional_float() {
        assert_eq!(to_output_string(&json!(2.5)), Some("2.5".into()));
    }

    #[test]
    fn test_huge_float_keeps_float_form() {
        let s = to_output_string(&json!(1e300)).unwrap();
        assert!(s.len() > 20);
    }

    #[test]
    fn test_compound_values_are_compact_json() {
        assert_eq!(to_output_string(&json!(["a", 1])), Some(r#"["a",1]"#.into()));
        assert_eq!(to_output_string(&json!({"k": "v"})), Some(r#"{"k":"v"}"#.into()));
    }

    #[test]
    fn test_to_string_value() {
        assert_eq!(to_string_value(&json!(8080)), json!("8080"));
        assert_eq!(to_string_value(&json!(null)), json!(null));
    }
}
