//! Shared domain types for stepbridge.
//!
//! This crate contains the data model of the action-execution bridge: action
//! descriptors, call arguments and return values, session objects, lifecycle
//! events, the error taxonomy and configuration.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod action;
pub mod config;
pub mod error;
pub mod event;
pub mod run;
pub mod session;
pub mod value;
