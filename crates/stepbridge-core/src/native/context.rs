//! Invocation context handed to native action handlers.

use serde_json::Value;

use crate::binder::BoundArguments;
use crate::session::{PersistedSession, TransientSession};

/// What a native action sees: its bound inputs and, where declared, the
/// session handles.
pub struct ActionContext<'a> {
    args: BoundArguments,
    transient: Option<TransientSession<'a>>,
    persisted: Option<PersistedSession<'a>>,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        args: BoundArguments,
        transient: Option<TransientSession<'a>>,
        persisted: Option<PersistedSession<'a>>,
    ) -> Self {
        Self {
            args,
            transient,
            persisted,
        }
    }

    pub fn args(&self) -> &BoundArguments {
        &self.args
    }

    /// Bound input `name`; null when not supplied.
    pub fn input(&self, name: &str) -> &Value {
        self.args.get(name)
    }

    /// Bound input `name` in its output string form; `None` when null.
    pub fn input_string(&self, name: &str) -> Option<String> {
        self.args.get_string(name)
    }

    /// The transient session handle, present when the method declared it.
    pub fn transient(&mut self) -> anyhow::Result<&mut TransientSession<'a>> {
        self.transient
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("action did not declare a transient session parameter"))
    }

    /// The persisted session handle, present when the method declared it.
    pub fn persisted(&mut self) -> anyhow::Result<&mut PersistedSession<'a>> {
        self.persisted
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("action did not declare a persisted session parameter"))
    }
}
