use stepbridge_core::native::{ActionMethod, ActionProvider, StringMap};

pub const TEXT_ACTIONS: &str = "stepbridge.builtin.Text";

fn output(name: &str, value: Option<String>) -> StringMap {
    [(name.to_string(), value)].into()
}

pub fn provider() -> ActionProvider {
    ActionProvider::new(TEXT_ACTIONS)
        .method(
            ActionMethod::action("echo", |ctx| {
                Ok(Some(output("message", ctx.input_string("message"))))
            })
            .input("message"),
        )
        .method(
            ActionMethod::action("concat", |ctx| {
                let joined = match (ctx.input_string("left"), ctx.input_string("right")) {
                    (None, None) => None,
                    (left, right) => Some(left.unwrap_or_default() + &right.unwrap_or_default()),
                };
                Ok(Some(output("result", joined)))
            })
            .input("left")
            .input("right"),
        )
        .method(
            ActionMethod::action("upper", |ctx| {
                let upper = ctx.input_string("text").map(|t| t.to_uppercase());
                Ok(Some(output("result", upper)))
            })
            .input("text"),
        )
}
