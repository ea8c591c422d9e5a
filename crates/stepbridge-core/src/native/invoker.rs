//! Reflective invocation of native actions.
//!
//! Resolution runs in a fixed order and stops at the first failure:
//! provider by type name, marked method by name, declared result shape,
//! then the call itself. Handler errors and panics are both reported as
//! `InvocationFailed`.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use stepbridge_types::config::UnmarkedActionPolicy;
use stepbridge_types::error::ActionError;
use stepbridge_types::run::CallArguments;

use crate::binder;
use crate::collector::RawResult;
use crate::session::{
    PersistedSession, PersistedSessionStore, TransientSession, TransientSessionStore,
};

use super::context::ActionContext;
use super::registry::{ActionMethod, ActionRegistry, ReturnShape};

/// Resolves and invokes native actions from an [`ActionRegistry`].
pub struct ReflectiveInvoker<'r> {
    registry: &'r ActionRegistry,
    unmarked_policy: UnmarkedActionPolicy,
}

impl<'r> ReflectiveInvoker<'r> {
    pub fn new(registry: &'r ActionRegistry, unmarked_policy: UnmarkedActionPolicy) -> Self {
        Self {
            registry,
            unmarked_policy,
        }
    }

    /// Resolve `type_name::method_name` and invoke it with `arguments`.
    pub fn invoke(
        &self,
        type_name: &str,
        method_name: &str,
        arguments: &CallArguments,
        transient: &mut dyn TransientSessionStore,
        persisted: &mut dyn PersistedSessionStore,
    ) -> Result<RawResult, ActionError> {
        let provider =
            self.registry
                .resolve(type_name)
                .ok_or_else(|| ActionError::ClassResolution {
                    type_name: type_name.to_string(),
                })?;

        let Some(method) = provider.find_action(method_name) else {
            if provider.has_method_named(method_name)
                && self.unmarked_policy == UnmarkedActionPolicy::Silent
            {
                tracing::debug!(
                    type_name,
                    method_name,
                    "method lacks the action marker, treating as not found"
                );
                return Ok(RawResult::default());
            }
            return Err(ActionError::ActionNotFound {
                type_name: type_name.to_string(),
                method_name: method_name.to_string(),
            });
        };

        if let ReturnShape::Other(found) = method.return_shape() {
            return Err(ActionError::InvalidReturnType {
                type_name: type_name.to_string(),
                method_name: method_name.to_string(),
                found: found.clone(),
            });
        }

        let result = call_method(method, arguments, transient, persisted).map_err(|message| {
            ActionError::InvocationFailed {
                type_name: type_name.to_string(),
                method_name: method_name.to_string(),
                message,
            }
        })?;

        Ok(into_raw_result(result))
    }
}

fn call_method(
    method: &ActionMethod,
    arguments: &CallArguments,
    transient: &mut dyn TransientSessionStore,
    persisted: &mut dyn PersistedSessionStore,
) -> Result<Option<HashMap<String, Option<String>>>, String> {
    let args = binder::bind(method.input_names(), arguments);
    let transient = if method.wants_transient() {
        Some(TransientSession::new(transient))
    } else {
        None
    };
    let persisted = if method.wants_persisted() {
        Some(PersistedSession::new(persisted))
    } else {
        None
    };
    let mut ctx = ActionContext::new(args, transient, persisted);

    let handler = method.handler();
    match panic::catch_unwind(AssertUnwindSafe(|| handler(&mut ctx))) {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(payload) => Err(format!("action panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn into_raw_result(result: Option<HashMap<String, Option<String>>>) -> RawResult {
    result
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name, value.map(Value::String).unwrap_or(Value::Null)))
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
