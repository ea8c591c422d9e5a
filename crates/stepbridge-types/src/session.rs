//! Session object types.
//!
//! Actions share state through two stores keyed by name:
//! - the transient store holds [`SessionObject`] wrappers around opaque,
//!   non-serializable resources (connections, handles) owned by the caller;
//! - the persisted store holds [`SerializableSessionObject`] entries that
//!   travel with the run environment across execution boundaries.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transient session store: name → wrapper around a mutable resource.
pub type TransientStore = HashMap<String, SessionObject>;

/// Persisted session store: name → serializable session entry.
pub type PersistedStore = HashMap<String, SerializableSessionObject>;

/// Wrapper around a non-serializable session resource.
///
/// The resource is opaque to the runtime; actions downcast it to the
/// concrete type they expect.
#[derive(Default)]
pub struct SessionObject {
    resource: Option<Box<dyn Any + Send>>,
}

impl SessionObject {
    /// Create an empty wrapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a wrapper holding `resource`.
    pub fn with_resource<T: Any + Send>(resource: T) -> Self {
        Self {
            resource: Some(Box::new(resource)),
        }
    }

    pub fn resource(&self) -> Option<&(dyn Any + Send)> {
        self.resource.as_deref()
    }

    pub fn resource_mut(&mut self) -> Option<&mut (dyn Any + Send)> {
        self.resource.as_deref_mut()
    }

    /// The resource downcast to `T`, if present and of that type.
    pub fn resource_as<T: Any>(&self) -> Option<&T> {
        self.resource.as_deref().and_then(|r| r.downcast_ref::<T>())
    }

    pub fn resource_as_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.resource
            .as_deref_mut()
            .and_then(|r| r.downcast_mut::<T>())
    }

    /// Replace the held resource.
    pub fn set_resource(&mut self, resource: Box<dyn Any + Send>) {
        self.resource = Some(resource);
    }

    pub fn take_resource(&mut self) -> Option<Box<dyn Any + Send>> {
        self.resource.take()
    }

    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }
}

impl fmt::Debug for SessionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionObject")
            .field("has_resource", &self.resource.is_some())
            .finish()
    }
}

/// Serializable session entry holding one settable scalar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializableSessionObject {
    #[serde(default)]
    value: Option<Value>,
}

impl SerializableSessionObject {
    pub fn new(value: Option<Value>) -> Self {
        Self { value }
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<Value>) {
        self.value = value;
    }
}
