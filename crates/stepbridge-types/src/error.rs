use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while executing a single action.
///
/// None of these escape the executor: each is converted into an
/// `ActionError` event followed by `ActionEnded`, with empty outputs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("action type '{type_name}' could not be resolved")]
    ClassResolution { type_name: String },

    #[error("no action method '{method_name}' on '{type_name}'")]
    ActionNotFound {
        type_name: String,
        method_name: String,
    },

    #[error(
        "action method '{type_name}::{method_name}' returns {found}, expected a map of string to string"
    )]
    InvalidReturnType {
        type_name: String,
        method_name: String,
        found: String,
    },

    #[error("script error at line {line}: {message}")]
    ScriptRuntime { line: usize, message: String },

    #[error("action method '{type_name}::{method_name}' failed: {message}")]
    InvocationFailed {
        type_name: String,
        method_name: String,
        message: String,
    },
}

impl ActionError {
    pub fn kind(&self) -> ActionErrorKind {
        match self {
            ActionError::ClassResolution { .. } => ActionErrorKind::ClassResolution,
            ActionError::ActionNotFound { .. } => ActionErrorKind::ActionNotFound,
            ActionError::InvalidReturnType { .. } => ActionErrorKind::InvalidReturnType,
            ActionError::ScriptRuntime { .. } => ActionErrorKind::ScriptRuntime,
            ActionError::InvocationFailed { .. } => ActionErrorKind::InvocationFailed,
        }
    }
}

/// Discriminant of [`ActionError`], carried in error events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionErrorKind {
    ClassResolution,
    ActionNotFound,
    InvalidReturnType,
    ScriptRuntime,
    InvocationFailed,
}

impl fmt::Display for ActionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionErrorKind::ClassResolution => "class_resolution",
            ActionErrorKind::ActionNotFound => "action_not_found",
            ActionErrorKind::InvalidReturnType => "invalid_return_type",
            ActionErrorKind::ScriptRuntime => "script_runtime",
            ActionErrorKind::InvocationFailed => "invocation_failed",
        };
        write!(f, "{s}")
    }
}

/// Errors from session store access made by actions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no transient session object named '{0}'")]
    MissingTransient(String),
}
