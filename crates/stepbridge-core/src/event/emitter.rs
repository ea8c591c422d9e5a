//! Per-invocation event emitter.

use std::time::Instant;

use stepbridge_types::action::ActionKind;
use stepbridge_types::error::ActionError;
use stepbridge_types::event::ActionEvent;
use stepbridge_types::run::Outputs;
use uuid::Uuid;

use super::sink::EventSink;

/// Emits the lifecycle events of one action invocation onto a sink, tagged
/// with a shared execution id.
pub struct EventEmitter<'s> {
    sink: &'s dyn EventSink,
    execution_id: Uuid,
    kind: ActionKind,
    action: String,
    started_at: Instant,
}

impl<'s> EventEmitter<'s> {
    pub fn new(sink: &'s dyn EventSink, kind: ActionKind, action: impl Into<String>) -> Self {
        Self {
            sink,
            execution_id: Uuid::now_v7(),
            kind,
            action: action.into(),
            started_at: Instant::now(),
        }
    }

    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    pub fn started(&self, mut input_names: Vec<String>) {
        input_names.sort();
        tracing::debug!(
            execution_id = %self.execution_id,
            kind = %self.kind,
            action = %self.action,
            "action started"
        );
        self.sink.push(ActionEvent::ActionStarted {
            execution_id: self.execution_id,
            kind: self.kind,
            action: self.action.clone(),
            input_names,
        });
    }

    pub fn errored(&self, error: &ActionError) {
        tracing::warn!(
            execution_id = %self.execution_id,
            kind = %self.kind,
            action = %self.action,
            error_kind = %error.kind(),
            "action failed: {error}"
        );
        self.sink.push(ActionEvent::ActionError {
            execution_id: self.execution_id,
            kind: self.kind,
            action: self.action.clone(),
            error_kind: error.kind(),
            message: error.to_string(),
        });
    }

    pub fn ended(&self, succeeded: bool, outputs: &Outputs) {
        let duration_ms = u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            execution_id = %self.execution_id,
            kind = %self.kind,
            action = %self.action,
            succeeded,
            outputs = outputs.len(),
            duration_ms,
            "action ended"
        );
        self.sink.push(ActionEvent::ActionEnded {
            execution_id: self.execution_id,
            kind: self.kind,
            action: self.action.clone(),
            succeeded,
            outputs: outputs.clone(),
            duration_ms,
        });
    }
}
