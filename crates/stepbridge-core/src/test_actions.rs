//! Native action fixtures shared by unit tests.

use anyhow::bail;

use stepbridge_types::session::SessionObject;

use crate::native::{ActionMethod, ActionProvider, ActionRegistry, ReturnShape, StringMap};

pub const CONTENT_TEST_ACTIONS: &str = "stepbridge.test.ContentTestActions";
pub const SESSION_TEST_ACTIONS: &str = "stepbridge.test.SessionTestActions";

/// Resource kept in the transient session by the session fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub name: String,
}

pub fn employee(name: &str) -> SessionObject {
    SessionObject::with_resource(Employee {
        name: name.to_string(),
    })
}

fn one(name: &str, value: Option<String>) -> StringMap {
    [(name.to_string(), value)].into()
}

pub fn registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(content_actions());
    registry.register(session_actions());
    registry
}

fn content_actions() -> ActionProvider {
    ActionProvider::new(CONTENT_TEST_ACTIONS)
        .method(
            ActionMethod::action("do_sample_action", |ctx| {
                Ok(Some(
                    [
                        ("name".to_string(), ctx.input_string("name")),
                        ("role".to_string(), ctx.input_string("role")),
                    ]
                    .into(),
                ))
            })
            .input("name")
            .input("role"),
        )
        .method(
            ActionMethod::unmarked("do_action_missing_marker", |ctx| {
                Ok(Some(one("name", ctx.input_string("name"))))
            })
            .input("name"),
        )
        .method(
            ActionMethod::action("do_action_wrong_return_type", |_| {
                panic!("must not be invoked")
            })
            .returns(ReturnShape::Other("String".into())),
        )
        .method(ActionMethod::action("do_failing_action", |_| {
            bail!("nothing to do")
        }))
        .method(ActionMethod::action("do_panicking_action", |_| panic!("boom")))
        .method(ActionMethod::action("do_nothing", |_| Ok(None)))
        .method(ActionMethod::action("read_session_without_declaring", |ctx| {
            let present = ctx.transient()?.contains("name");
            Ok(Some(one("present", Some(present.to_string()))))
        }))
}

fn session_actions() -> ActionProvider {
    ActionProvider::new(SESSION_TEST_ACTIONS)
        .method(
            ActionMethod::action("get_name_from_transient", |ctx| {
                let name = ctx
                    .transient()?
                    .resource::<Employee>("name")
                    .map(|e| e.name.clone());
                Ok(Some(one("name", name)))
            })
            .transient_session(),
        )
        .method(
            ActionMethod::action("set_name_in_transient", |ctx| {
                let value = ctx.input_string("value").unwrap_or_default();
                ctx.transient()?
                    .set_resource("name", Employee { name: value.clone() })?;
                Ok(Some(one("name", Some(value))))
            })
            .input("value")
            .transient_session(),
        )
        .method(
            ActionMethod::action("get_name_from_persisted", |ctx| {
                let name = ctx
                    .persisted()?
                    .get("name")
                    .and_then(|v| stepbridge_types::value::to_output_string(&v));
                Ok(Some(one("name", name)))
            })
            .persisted_session(),
        )
        .method(
            ActionMethod::action("set_name_in_persisted", |ctx| {
                let value = ctx.input_string("value");
                let session = ctx.persisted()?;
                match value {
                    Some(value) => session.set("name", value),
                    None => session.clear("name"),
                }
                Ok(None)
            })
            .input("value")
            .persisted_session(),
        )
}
