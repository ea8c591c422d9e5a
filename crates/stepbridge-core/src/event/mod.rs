//! Action lifecycle event delivery.
//!
//! The executor pushes `ActionEvent`s onto an [`EventSink`]. Two sinks are
//! provided: [`RuntimeEvents`], an ordered in-memory collection owned by one
//! run, and [`EventBus`], a `tokio::sync::broadcast` fan-out for live
//! subscribers.

pub mod bus;
pub mod emitter;
pub mod sink;

pub use bus::EventBus;
pub use emitter::EventEmitter;
pub use sink::{EventSink, RuntimeEvents};
