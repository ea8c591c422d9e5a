//! Action lifecycle events.
//!
//! Every invocation emits `ActionStarted`, then `ActionError` if the action
//! failed, then exactly one `ActionEnded`. Failure is discoverable only
//! through these events; the executor never returns an error.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::ActionKind;
use crate::error::ActionErrorKind;
use crate::run::Outputs;

/// Wire tag of an action start event.
pub const EVENT_ACTION_START: &str = "ACTION_START";

/// Wire tag of an action end event.
pub const EVENT_ACTION_END: &str = "ACTION_END";

/// Wire tag of an action error event.
pub const EVENT_ACTION_ERROR: &str = "ACTION_ERROR";

/// Events emitted while executing a single action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionEvent {
    /// The executor accepted the action and is about to dispatch it.
    ActionStarted {
        execution_id: Uuid,
        kind: ActionKind,
        action: String,
        /// Names of the supplied call arguments (values are not copied).
        input_names: Vec<String>,
    },

    /// The action failed. Always followed by `ActionEnded`.
    ActionError {
        execution_id: Uuid,
        kind: ActionKind,
        action: String,
        error_kind: ActionErrorKind,
        message: String,
    },

    /// The action finished, successfully or not.
    ActionEnded {
        execution_id: Uuid,
        kind: ActionKind,
        action: String,
        succeeded: bool,
        outputs: Outputs,
        duration_ms: u64,
    },
}

impl ActionEvent {
    /// The wire tag of this event (`ACTION_START`, `ACTION_ERROR`, `ACTION_END`).
    pub fn event_type(&self) -> &'static str {
        match self {
            ActionEvent::ActionStarted { .. } => EVENT_ACTION_START,
            ActionEvent::ActionError { .. } => EVENT_ACTION_ERROR,
            ActionEvent::ActionEnded { .. } => EVENT_ACTION_END,
        }
    }

    pub fn execution_id(&self) -> Uuid {
        match self {
            ActionEvent::ActionStarted { execution_id, .. }
            | ActionEvent::ActionError { execution_id, .. }
            | ActionEvent::ActionEnded { execution_id, .. } => *execution_id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ActionEvent::ActionError { .. })
    }
}
