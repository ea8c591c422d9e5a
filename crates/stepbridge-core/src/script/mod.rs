//! Action script interpreter bridge.
//!
//! Runs an action script in a fresh namespace seeded with the call arguments
//! (each presented as a string), then harvests every name still bound when
//! the script completes. A script that fails harvests nothing.
//!
//! - `parser` -- line-oriented statement parsing and free-name analysis
//! - `evaluator` -- JEXL evaluation with script transforms

pub mod evaluator;
pub mod parser;

use serde_json::{Map, Value};
use stepbridge_types::config::ScriptConfig;
use stepbridge_types::error::ActionError;
use stepbridge_types::run::CallArguments;
use stepbridge_types::value::to_output_string;

use crate::binder;
use crate::collector::RawResult;

use evaluator::{ExpressionError, ScriptEvaluator};
use parser::{Statement, StatementKind};

// ---------------------------------------------------------------------------
// ScriptError
// ---------------------------------------------------------------------------

/// Errors raised while parsing or running an action script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: name '{name}' is not defined")]
    UndefinedName { line: usize, name: String },

    #[error("line {line}: {source}")]
    Evaluation {
        line: usize,
        #[source]
        source: ExpressionError,
    },
}

impl ScriptError {
    pub fn line(&self) -> usize {
        match self {
            ScriptError::Syntax { line, .. }
            | ScriptError::UndefinedName { line, .. }
            | ScriptError::Evaluation { line, .. } => *line,
        }
    }

    fn detail(&self) -> String {
        match self {
            ScriptError::Syntax { message, .. } => message.clone(),
            ScriptError::UndefinedName { name, .. } => format!("name '{name}' is not defined"),
            ScriptError::Evaluation { source, .. } => source.to_string(),
        }
    }
}

impl From<ScriptError> for ActionError {
    fn from(err: ScriptError) -> Self {
        ActionError::ScriptRuntime {
            line: err.line(),
            message: err.detail(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptInterpreterBridge
// ---------------------------------------------------------------------------

/// Executes action scripts and harvests their final bindings.
///
/// Holds configuration only; every run builds its own evaluator and
/// namespace.
#[derive(Debug, Clone, Default)]
pub struct ScriptInterpreterBridge {
    config: ScriptConfig,
}

impl ScriptInterpreterBridge {
    pub fn new(config: ScriptConfig) -> Self {
        Self { config }
    }

    /// Run `text` with `arguments` bound as strings.
    ///
    /// Absent or blank text is a no-op returning an empty result.
    pub fn run(
        &self,
        arguments: &CallArguments,
        text: Option<&str>,
    ) -> Result<RawResult, ActionError> {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            tracing::debug!("empty action script, nothing to run");
            return Ok(RawResult::new());
        };

        let program = parser::parse(text)?;
        let mut namespace = binder::bind_as_strings(arguments);
        tracing::debug!(
            statements = program.len(),
            inputs = namespace.len(),
            "running action script"
        );

        self.execute(&program, &mut namespace)?;

        Ok(namespace.into_iter().collect())
    }

    fn execute(
        &self,
        program: &[Statement],
        namespace: &mut Map<String, Value>,
    ) -> Result<(), ScriptError> {
        let evaluator = ScriptEvaluator::new();

        for statement in program {
            let line = statement.line;
            let value = match statement.kind.expression() {
                Some(expr) => Some(evaluate(&evaluator, expr, namespace, line)?),
                None => None,
            };

            match (&statement.kind, value) {
                (StatementKind::Assign { name, .. }, Some(value)) => {
                    namespace.insert(name.clone(), value);
                }
                (StatementKind::Print { .. }, Some(value)) => {
                    if self.config.log_print {
                        let text = to_output_string(&value).unwrap_or_else(|| "null".to_string());
                        tracing::info!(target: "stepbridge::script", line, "{text}");
                    }
                }
                (StatementKind::Delete { name }, _) => {
                    if namespace.remove(name).is_none() {
                        return Err(ScriptError::UndefinedName {
                            line,
                            name: name.clone(),
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn evaluate(
    evaluator: &ScriptEvaluator,
    expr: &str,
    namespace: &Map<String, Value>,
    line: usize,
) -> Result<Value, ScriptError> {
    if let Some(name) = parser::free_names(expr)
        .into_iter()
        .find(|name| !namespace.contains_key(name))
    {
        return Err(ScriptError::UndefinedName { line, name });
    }
    evaluator
        .evaluate(expr, namespace)
        .map_err(|source| ScriptError::Evaluation { line, source })
}
