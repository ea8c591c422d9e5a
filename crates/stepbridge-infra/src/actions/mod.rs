//! Built-in native action providers.
//!
//! - `session` -- read and write both session stores by key
//! - `text` -- small string actions useful for wiring and smoke tests

pub mod session;
pub mod text;

use stepbridge_core::native::ActionRegistry;

pub use session::SESSION_ACTIONS;
pub use text::TEXT_ACTIONS;

/// Register every built-in provider on `registry`.
pub fn register_builtin_actions(registry: &mut ActionRegistry) {
    registry.register(session::provider());
    registry.register(text::provider());
}

/// A registry holding only the built-in providers.
pub fn builtin_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    register_builtin_actions(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_resolves_providers() {
        let registry = builtin_registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.resolve(SESSION_ACTIONS).is_some());
        assert!(registry.resolve(TEXT_ACTIONS).is_some());
    }
}
