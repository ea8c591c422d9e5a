//! Session context resolution for actions.
//!
//! Two store capabilities are passed explicitly into every action that
//! declares them:
//! - [`TransientSessionStore`] over non-serializable session objects;
//! - [`PersistedSessionStore`] over serializable session entries.
//!
//! The `HashMap` implementations carry the store policies: transient `set`
//! operates only on an existing wrapper, and persisted `get` auto-creates a
//! null entry on a miss without ever overwriting an existing one.

use std::any::Any;

use serde_json::Value;
use stepbridge_types::error::SessionError;
use stepbridge_types::session::{
    PersistedStore, SerializableSessionObject, TransientStore,
};

// ---------------------------------------------------------------------------
// Store capabilities
// ---------------------------------------------------------------------------

/// Access to the transient (non-serializable) session store.
pub trait TransientSessionStore {
    /// The resource held by the named wrapper, or `None` if the name is
    /// absent. Never creates an entry.
    fn get(&self, name: &str) -> Option<&(dyn Any + Send)>;

    fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Any + Send)>;

    /// Replace the resource of an existing wrapper.
    fn set(&mut self, name: &str, resource: Box<dyn Any + Send>) -> Result<(), SessionError>;

    fn contains(&self, name: &str) -> bool;
}

/// Access to the persisted (serializable) session store.
pub trait PersistedSessionStore {
    /// The stored scalar for `name`. A miss creates a null entry.
    fn get(&mut self, name: &str) -> Option<Value>;

    /// Create or overwrite the named entry's scalar.
    fn set(&mut self, name: &str, value: Option<Value>);

    fn contains(&self, name: &str) -> bool;
}

impl TransientSessionStore for TransientStore {
    fn get(&self, name: &str) -> Option<&(dyn Any + Send)> {
        self.get(name).and_then(|obj| obj.resource())
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Any + Send)> {
        self.get_mut(name).and_then(|obj| obj.resource_mut())
    }

    fn set(&mut self, name: &str, resource: Box<dyn Any + Send>) -> Result<(), SessionError> {
        match self.get_mut(name) {
            Some(obj) => {
                obj.set_resource(resource);
                Ok(())
            }
            None => Err(SessionError::MissingTransient(name.to_string())),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl PersistedSessionStore for PersistedStore {
    fn get(&mut self, name: &str) -> Option<Value> {
        if !self.contains_key(name) {
            tracing::debug!(name, "creating persisted session entry on first read");
        }
        self.entry(name.to_string())
            .or_default()
            .value()
            .cloned()
    }

    fn set(&mut self, name: &str, value: Option<Value>) {
        self.entry(name.to_string())
            .or_insert_with(SerializableSessionObject::default)
            .set_value(value);
    }

    fn contains(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

// ---------------------------------------------------------------------------
// Handles given to actions
// ---------------------------------------------------------------------------

/// Transient session handle with typed resource helpers.
pub struct TransientSession<'a> {
    store: &'a mut dyn TransientSessionStore,
}

impl<'a> TransientSession<'a> {
    pub fn new(store: &'a mut dyn TransientSessionStore) -> Self {
        Self { store }
    }

    pub fn get(&self, name: &str) -> Option<&(dyn Any + Send)> {
        self.store.get(name)
    }

    /// The named resource downcast to `T`.
    pub fn resource<T: Any>(&self, name: &str) -> Option<&T> {
        self.store.get(name).and_then(|r| r.downcast_ref::<T>())
    }

    pub fn resource_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.store.get_mut(name).and_then(|r| r.downcast_mut::<T>())
    }

    /// Replace the resource of the existing wrapper `name`.
    pub fn set_resource<T: Any + Send>(&mut self, name: &str, resource: T) -> Result<(), SessionError> {
        self.store.set(name, Box::new(resource))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }
}

/// Persisted session handle.
pub struct PersistedSession<'a> {
    store: &'a mut dyn PersistedSessionStore,
}

impl<'a> PersistedSession<'a> {
    pub fn new(store: &'a mut dyn PersistedSessionStore) -> Self {
        Self { store }
    }

    pub fn get(&mut self, name: &str) -> Option<Value> {
        self.store.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.store.set(name, Some(value.into()));
    }

    pub fn clear(&mut self, name: &str) {
        self.store.set(name, None);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }
}
