//! Event sinks.

use std::sync::{Mutex, MutexGuard};

use stepbridge_types::event::ActionEvent;

/// Destination for action lifecycle events.
pub trait EventSink: Send + Sync {
    fn push(&self, event: ActionEvent);
}

/// The runtime event list of one run, in emission order.
#[derive(Debug, Default)]
pub struct RuntimeEvents {
    events: Mutex<Vec<ActionEvent>>,
}

impl RuntimeEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events pushed so far.
    pub fn events(&self) -> Vec<ActionEvent> {
        self.lock().clone()
    }

    /// Events whose wire tag is `event_type` (e.g. `ACTION_ERROR`).
    pub fn of_type(&self, event_type: &str) -> Vec<ActionEvent> {
        self.lock()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect()
    }

    /// Take every event, leaving the list empty.
    pub fn drain(&self) -> Vec<ActionEvent> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the Vec half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<ActionEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for RuntimeEvents {
    fn push(&self, event: ActionEvent) {
        self.lock().push(event);
    }
}
