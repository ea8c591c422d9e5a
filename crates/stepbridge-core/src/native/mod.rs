//! Native actions: registry, invocation context and reflective invoker.
//!
//! - `registry` -- providers, marked methods, declared parameters and result shapes
//! - `context` -- the `ActionContext` passed to handlers
//! - `invoker` -- resolution and invocation with named-parameter binding

pub mod context;
pub mod invoker;
pub mod registry;

pub use context::ActionContext;
pub use invoker::ReflectiveInvoker;
pub use registry::{ActionMethod, ActionProvider, ActionRegistry, ParamSpec, ReturnShape, StringMap};
