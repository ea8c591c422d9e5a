//! Run environment shared between the flow scheduler and the executor.
//!
//! `RunEnvironment` carries the call arguments into an action, the return
//! values out of it, and the persisted session store. It is serializable so
//! the scheduler can checkpoint it; transient session objects are never part
//! of it.

use serde::{Deserialize, Serialize};
use stepbridge_types::run::{CallArguments, ReturnValues};
use stepbridge_types::session::PersistedStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunEnvironment {
    #[serde(default)]
    call_arguments: CallArguments,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    return_values: Option<ReturnValues>,
    #[serde(default)]
    serializable_data: PersistedStore,
}

impl RunEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the call arguments for the next action.
    pub fn put_call_arguments(&mut self, arguments: CallArguments) {
        self.call_arguments = arguments;
    }

    pub fn call_arguments(&self) -> &CallArguments {
        &self.call_arguments
    }

    /// Store the outputs of the action that just ran, replacing any values
    /// not yet retrieved.
    pub fn put_return_values(&mut self, return_values: ReturnValues) {
        if self.return_values.is_some() {
            tracing::debug!("overwriting return values that were never retrieved");
        }
        self.return_values = Some(return_values);
    }

    /// Take the pending return values. A second call returns `None`.
    pub fn remove_return_values(&mut self) -> Option<ReturnValues> {
        self.return_values.take()
    }

    pub fn has_return_values(&self) -> bool {
        self.return_values.is_some()
    }

    /// The persisted session store.
    pub fn serializable_data(&self) -> &PersistedStore {
        &self.serializable_data
    }

    pub fn serializable_data_mut(&mut self) -> &mut PersistedStore {
        &mut self.serializable_data
    }

    /// Borrow the call arguments and the persisted store at the same time.
    pub(crate) fn action_scope(&mut self) -> (&CallArguments, &mut PersistedStore) {
        (&self.call_arguments, &mut self.serializable_data)
    }
}
