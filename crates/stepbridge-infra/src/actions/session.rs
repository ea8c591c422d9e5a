//! Session store actions.
//!
//! Each method takes the session key in the `key` input. Transient values are
//! stored as `String` resources; a transient entry must already exist before
//! it can be written.

use anyhow::Context;
use stepbridge_core::native::{ActionContext, ActionMethod, ActionProvider, StringMap};
use stepbridge_types::value::to_output_string;

pub const SESSION_ACTIONS: &str = "stepbridge.builtin.Session";

fn key(ctx: &ActionContext<'_>) -> anyhow::Result<String> {
    ctx.input_string("key").context("missing required input 'key'")
}

fn output(key: String, value: Option<String>) -> StringMap {
    [(key, value)].into()
}

pub fn provider() -> ActionProvider {
    ActionProvider::new(SESSION_ACTIONS)
        .method(
            ActionMethod::action("get_persisted", |ctx| {
                let key = key(ctx)?;
                let value = ctx.persisted()?.get(&key);
                Ok(Some(output(key, value.as_ref().and_then(to_output_string))))
            })
            .input("key")
            .persisted_session(),
        )
        .method(
            ActionMethod::action("set_persisted", |ctx| {
                let key = key(ctx)?;
                let value = ctx.input("value").clone();
                let session = ctx.persisted()?;
                if value.is_null() {
                    session.clear(&key);
                } else {
                    session.set(&key, value.clone());
                }
                Ok(Some(output(key, to_output_string(&value))))
            })
            .input("key")
            .input("value")
            .persisted_session(),
        )
        .method(
            ActionMethod::action("get_transient", |ctx| {
                let key = key(ctx)?;
                let value = ctx.transient()?.resource::<String>(&key).cloned();
                Ok(Some(output(key, value)))
            })
            .input("key")
            .transient_session(),
        )
        .method(
            ActionMethod::action("set_transient", |ctx| {
                let key = key(ctx)?;
                let value = ctx.input_string("value").unwrap_or_default();
                ctx.transient()?.set_resource(&key, value.clone())?;
                Ok(Some(output(key, Some(value))))
            })
            .input("key")
            .input("value")
            .transient_session(),
        )
}
