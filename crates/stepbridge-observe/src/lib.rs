//! Observability setup for stepbridge.

pub mod tracing_setup;
