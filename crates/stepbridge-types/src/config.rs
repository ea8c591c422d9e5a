//! Configuration types for stepbridge.
//!
//! `BridgeConfig` represents the `stepbridge.toml` file that controls how
//! the action executor treats unmarked methods, script printing, and event
//! bus sizing.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the action executor.
///
/// All fields have sensible defaults; an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// How a method that matches by name but is not marked as an action is
    /// treated.
    #[serde(default)]
    pub unmarked_action_policy: UnmarkedActionPolicy,

    /// Script interpreter settings.
    #[serde(default)]
    pub script: ScriptConfig,

    /// Capacity of the broadcast event bus.
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
}

fn default_event_bus_capacity() -> usize {
    1024
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            unmarked_action_policy: UnmarkedActionPolicy::default(),
            script: ScriptConfig::default(),
            event_bus_capacity: default_event_bus_capacity(),
        }
    }
}

/// Policy for a method found by name that lacks the action marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmarkedActionPolicy {
    /// Treat it exactly like a missing method: `ActionNotFound` is raised and
    /// an error event is emitted.
    #[default]
    Report,
    /// Treat it as not found without an error event; outputs stay empty.
    Silent,
}

/// Settings for the action script interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Emit `print` statements on the log.
    #[serde(default = "default_log_print")]
    pub log_print: bool,
}

fn default_log_print() -> bool {
    true
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            log_print: default_log_print(),
        }
    }
}
