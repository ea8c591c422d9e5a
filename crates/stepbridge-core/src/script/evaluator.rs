//! JEXL expression evaluation for action scripts.
//!
//! Wraps `jexl_eval::Evaluator` with the string transforms used by workflow
//! expressions plus the conversions scripts need to treat string inputs as
//! numbers and back (`int`, `float`, `str`).
//!
//! Prefix negation is rewritten before evaluation. JEXL arithmetic yields a
//! non-finite float on a zero divisor, which JSON can only hold as null; a
//! null result whose expression divides by zero is reported as an error.

use serde_json::{json, Map, Value};
use stepbridge_types::value::to_output_string;

use super::parser;

/// Errors that can occur during expression evaluation.
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    #[error("expression evaluation failed: {0}")]
    EvalFailed(String),

    #[error("division or modulo by zero")]
    DivisionByZero,
}

/// JEXL evaluator with the script transforms registered.
pub struct ScriptEvaluator {
    evaluator: jexl_eval::Evaluator<'static>,
}

impl ScriptEvaluator {
    pub fn new() -> Self {
        let evaluator = jexl_eval::Evaluator::new()
            // String transforms
            .with_transform("lower", |args: &[Value]| {
                let s = args.first().and_then(|v| v.as_str()).unwrap_or("");
                Ok(json!(s.to_lowercase()))
            })
            .with_transform("upper", |args: &[Value]| {
                let s = args.first().and_then(|v| v.as_str()).unwrap_or("");
                Ok(json!(s.to_uppercase()))
            })
            .with_transform("trim", |args: &[Value]| {
                let s = args.first().and_then(|v| v.as_str()).unwrap_or("");
                Ok(json!(s.trim()))
            })
            .with_transform("split", |args: &[Value]| {
                let s = args.first().and_then(|v| v.as_str()).unwrap_or("");
                let delimiter = args.get(1).and_then(|v| v.as_str()).unwrap_or(",");
                let parts: Vec<&str> = s.split(delimiter).collect();
                Ok(json!(parts))
            })
            .with_transform("contains", |args: &[Value]| {
                let subject = args.first().and_then(|v| v.as_str()).unwrap_or("");
                let search = args.get(1).and_then(|v| v.as_str()).unwrap_or("");
                Ok(json!(subject.contains(search)))
            })
            .with_transform("startsWith", |args: &[Value]| {
                let subject = args.first().and_then(|v| v.as_str()).unwrap_or("");
                let prefix = args.get(1).and_then(|v| v.as_str()).unwrap_or("");
                Ok(json!(subject.starts_with(prefix)))
            })
            .with_transform("endsWith", |args: &[Value]| {
                let subject = args.first().and_then(|v| v.as_str()).unwrap_or("");
                let suffix = args.get(1).and_then(|v| v.as_str()).unwrap_or("");
                Ok(json!(subject.ends_with(suffix)))
            })
            .with_transform("length", |args: &[Value]| {
                let len = match args.first() {
                    Some(Value::String(s)) => s.chars().count(),
                    Some(Value::Array(a)) => a.len(),
                    Some(Value::Object(o)) => o.len(),
                    _ => 0,
                };
                Ok(json!(len as f64))
            })
            .with_transform("not", |args: &[Value]| {
                let val = args.first().cloned().unwrap_or(Value::Null);
                Ok(json!(!truthy(&val)))
            })
            // Conversions
            .with_transform("int", |args: &[Value]| {
                Ok(args.first().map(to_int).unwrap_or(Value::Null))
            })
            .with_transform("float", |args: &[Value]| {
                Ok(args.first().map(to_float).unwrap_or(Value::Null))
            })
            .with_transform("str", |args: &[Value]| {
                let s = args.first().and_then(to_output_string);
                Ok(s.map(Value::String).unwrap_or(Value::Null))
            });

        Self { evaluator }
    }

    /// Evaluate `expression` against the script namespace.
    pub fn evaluate(
        &self,
        expression: &str,
        namespace: &Map<String, Value>,
    ) -> Result<Value, ExpressionError> {
        let expression = parser::rewrite_unary_minus(expression);
        let value = self.eval_raw(&expression, namespace)?;
        if contains_null(&value) && self.divides_by_zero(&expression, namespace) {
            return Err(ExpressionError::DivisionByZero);
        }
        Ok(value)
    }

    fn eval_raw(&self, expression: &str, namespace: &Map<String, Value>) -> Result<Value, ExpressionError> {
        self.evaluator
            .eval_in_context(expression, namespace)
            .map_err(|e| ExpressionError::EvalFailed(e.to_string()))
    }

    fn divides_by_zero(&self, expression: &str, namespace: &Map<String, Value>) -> bool {
        parser::divisor_operands(expression).into_iter().any(|operand| {
            matches!(
                self.eval_raw(operand, namespace),
                Ok(Value::Number(n)) if n.as_f64() == Some(0.0)
            )
        })
    }
}

impl Default for ScriptEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(fields) => fields.values().any(contains_null),
        _ => false,
    }
}

/// JavaScript-like truthiness.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn to_int(value: &Value) -> Value {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!(i),
            None => n.as_f64().map(|f| json!(f.trunc() as i64)).unwrap_or(Value::Null),
        },
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                json!(i)
            } else if let Ok(f) = s.parse::<f64>() {
                json!(f.trunc() as i64)
            } else {
                Value::Null
            }
        }
        Value::Bool(b) => json!(i64::from(*b)),
        _ => Value::Null,
    }
}

fn to_float(value: &Value) -> Value {
    match value {
        Value::Number(n) => n.as_f64().map(|f| json!(f)).unwrap_or(Value::Null),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| json!(f))
            .unwrap_or(Value::Null),
        Value::Bool(b) => json!(if *b { 1.0 } else { 0.0 }),
        _ => Value::Null,
    }
}
