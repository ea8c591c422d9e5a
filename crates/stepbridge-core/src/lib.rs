//! Action execution bridge for stepbridge.
//!
//! Executes a single workflow step's action, either a native method resolved
//! through the [`native::ActionRegistry`] or an embedded action script, and
//! reconciles both into one output contract: a [`ReturnValues`] written into
//! the [`RunEnvironment`] and lifecycle events pushed onto an [`EventSink`].
//!
//! [`ReturnValues`]: stepbridge_types::run::ReturnValues
//! [`RunEnvironment`]: environment::RunEnvironment
//! [`EventSink`]: event::EventSink

pub mod binder;
pub mod collector;
pub mod environment;
pub mod event;
pub mod executor;
pub mod native;
pub mod script;
pub mod session;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_actions;

pub use environment::RunEnvironment;
pub use executor::ActionExecutor;
