//! Action strategies.
//!
//! Native and script actions share one contract: given the call arguments
//! and both session stores, produce a raw result or an [`ActionError`]. The
//! executor selects the strategy from the descriptor's kind.

use stepbridge_types::action::ActionKind;
use stepbridge_types::error::ActionError;
use stepbridge_types::run::CallArguments;

use crate::collector::RawResult;
use crate::native::ReflectiveInvoker;
use crate::script::ScriptInterpreterBridge;
use crate::session::{PersistedSessionStore, TransientSessionStore};

/// Everything a strategy may touch during one invocation.
pub struct ActionCall<'a> {
    pub arguments: &'a CallArguments,
    pub transient: &'a mut dyn TransientSessionStore,
    pub persisted: &'a mut dyn PersistedSessionStore,
}

pub trait ActionStrategy {
    fn kind(&self) -> ActionKind;

    fn run(&self, call: ActionCall<'_>) -> Result<RawResult, ActionError>;
}

/// Invokes a registered native method.
pub struct NativeStrategy<'r> {
    invoker: ReflectiveInvoker<'r>,
    type_name: &'r str,
    method_name: &'r str,
}

impl<'r> NativeStrategy<'r> {
    pub fn new(invoker: ReflectiveInvoker<'r>, type_name: &'r str, method_name: &'r str) -> Self {
        Self {
            invoker,
            type_name,
            method_name,
        }
    }
}

impl ActionStrategy for NativeStrategy<'_> {
    fn kind(&self) -> ActionKind {
        ActionKind::Native
    }

    fn run(&self, call: ActionCall<'_>) -> Result<RawResult, ActionError> {
        self.invoker.invoke(
            self.type_name,
            self.method_name,
            call.arguments,
            call.transient,
            call.persisted,
        )
    }
}

/// Runs an action script. Scripts see only the call arguments.
pub struct ScriptStrategy<'r> {
    bridge: &'r ScriptInterpreterBridge,
    text: Option<&'r str>,
}

impl<'r> ScriptStrategy<'r> {
    pub fn new(bridge: &'r ScriptInterpreterBridge, text: Option<&'r str>) -> Self {
        Self { bridge, text }
    }
}

impl ActionStrategy for ScriptStrategy<'_> {
    fn kind(&self) -> ActionKind {
        ActionKind::Script
    }

    fn run(&self, call: ActionCall<'_>) -> Result<RawResult, ActionError> {
        self.bridge.run(call.arguments, self.text)
    }
}
