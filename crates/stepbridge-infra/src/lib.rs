//! Infrastructure layer for stepbridge.
//!
//! Loads `stepbridge.toml` from the config directory and provides the
//! built-in native action providers.

pub mod actions;
pub mod config;
