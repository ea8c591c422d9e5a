//! Action executor.
//!
//! `ActionExecutor` is the single entry point for running one action. It
//! selects a strategy from the descriptor, runs it against the run
//! environment and session stores, normalizes the result, and records the
//! outcome in both the run environment and the event sink.
//!
//! Every invocation, successful or not, ends with:
//! - a [`ReturnValues`] installed in the run environment (empty on failure);
//! - an `ActionEnded` event, preceded by an `ActionError` event on failure.
//!
//! No error is ever returned or propagated to the caller.

use std::sync::Arc;

use stepbridge_types::action::{ActionDescriptor, ActionKind};
use stepbridge_types::config::BridgeConfig;
use stepbridge_types::run::{Outputs, ReturnValues};

use crate::collector;
use crate::environment::RunEnvironment;
use crate::event::{EventEmitter, EventSink};
use crate::native::{ActionRegistry, ReflectiveInvoker};
use crate::script::ScriptInterpreterBridge;
use crate::session::TransientSessionStore;
use crate::strategy::{ActionCall, ActionStrategy, NativeStrategy, ScriptStrategy};

/// Executes native and script actions.
///
/// Holds only shared, read-only state, so one executor can serve any number
/// of concurrent runs as long as each run brings its own environment and
/// stores.
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    registry: Arc<ActionRegistry>,
    config: BridgeConfig,
    scripts: ScriptInterpreterBridge,
}

impl ActionExecutor {
    pub fn new(registry: Arc<ActionRegistry>, config: BridgeConfig) -> Self {
        let scripts = ScriptInterpreterBridge::new(config.script.clone());
        Self {
            registry,
            config,
            scripts,
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Run `action` with the call arguments currently in `run_env`.
    pub fn execute(
        &self,
        run_env: &mut RunEnvironment,
        transient: &mut dyn TransientSessionStore,
        action: &ActionDescriptor,
        events: &dyn EventSink,
    ) {
        let emitter = EventEmitter::new(events, action.kind(), action.label());
        emitter.started(run_env.call_arguments().keys().cloned().collect());

        let strategy = self.strategy(action);
        tracing::trace!(kind = %strategy.kind(), "dispatching action strategy");
        let (arguments, persisted) = run_env.action_scope();
        let result = strategy.run(ActionCall {
            arguments,
            transient,
            persisted,
        });

        let (succeeded, outputs) = match result {
            Ok(raw) => (true, collector::collect(raw)),
            Err(err) => {
                emitter.errored(&err);
                (false, Outputs::new())
            }
        };

        run_env.put_return_values(ReturnValues::new(outputs.clone()));
        emitter.ended(succeeded, &outputs);
    }

    /// Flat call form used by flow steps. Only the fields relevant to `kind`
    /// are read.
    #[allow(clippy::too_many_arguments)]
    pub fn do_action(
        &self,
        run_env: &mut RunEnvironment,
        transient: &mut dyn TransientSessionStore,
        kind: ActionKind,
        type_name: &str,
        method_name: &str,
        events: &dyn EventSink,
        script_text: Option<&str>,
    ) {
        let action = ActionDescriptor::from_parts(kind, type_name, method_name, script_text);
        self.execute(run_env, transient, &action, events);
    }

    fn strategy<'a>(&'a self, action: &'a ActionDescriptor) -> Box<dyn ActionStrategy + 'a> {
        match action {
            ActionDescriptor::Native {
                type_name,
                method_name,
            } => {
                let invoker =
                    ReflectiveInvoker::new(&self.registry, self.config.unmarked_action_policy);
                Box::new(NativeStrategy::new(invoker, type_name, method_name))
            }
            ActionDescriptor::Script { text } => {
                Box::new(ScriptStrategy::new(&self.scripts, text.as_deref()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventBus, RuntimeEvents};
    use crate::test_actions::{self, CONTENT_TEST_ACTIONS, Employee, SESSION_TEST_ACTIONS};
    use serde_json::{Value, json};
    use stepbridge_types::config::{ScriptConfig, UnmarkedActionPolicy};
    use stepbridge_types::error::ActionErrorKind;
    use stepbridge_types::event::{ActionEvent, EVENT_ACTION_END, EVENT_ACTION_ERROR, EVENT_ACTION_START};
    use stepbridge_types::run::CallArguments;
    use stepbridge_types::session::{SerializableSessionObject, TransientStore};

    const SCRIPT: &str = "\
url = 'http://' + host + ':' + port
url2 = url + '/oo'
port = 8081
another = 'just a string'
";

    fn executor_with(policy: UnmarkedActionPolicy) -> ActionExecutor {
        let config = BridgeConfig {
            unmarked_action_policy: policy,
            script: ScriptConfig { log_print: false },
            ..BridgeConfig::default()
        };
        ActionExecutor::new(Arc::new(test_actions::registry()), config)
    }

    fn executor() -> ActionExecutor {
        executor_with(UnmarkedActionPolicy::Report)
    }

    fn env_with(args: &[(&str, Value)]) -> RunEnvironment {
        let mut env = RunEnvironment::new();
        env.put_call_arguments(
            args.iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<CallArguments>(),
        );
        env
    }

    fn run_native(
        executor: &ActionExecutor,
        env: &mut RunEnvironment,
        transient: &mut TransientStore,
        type_name: &str,
        method_name: &str,
    ) -> RuntimeEvents {
        let events = RuntimeEvents::new();
        executor.execute(
            env,
            transient,
            &ActionDescriptor::native(type_name, method_name),
            &events,
        );
        events
    }

    fn run_script(env: &mut RunEnvironment, text: Option<&str>) -> RuntimeEvents {
        let events = RuntimeEvents::new();
        executor().execute(
            env,
            &mut TransientStore::new(),
            &ActionDescriptor::script(text),
            &events,
        );
        events
    }

    fn event_types(events: &RuntimeEvents) -> Vec<&'static str> {
        events.events().iter().map(ActionEvent::event_type).collect()
    }

    fn error_kind(events: &RuntimeEvents) -> ActionErrorKind {
        match events.of_type(EVENT_ACTION_ERROR).first() {
            Some(ActionEvent::ActionError { error_kind, .. }) => *error_kind,
            other => panic!("expected an error event, got {other:?}"),
        }
    }

    fn assert_failed_with_empty_outputs(env: &mut RunEnvironment, events: &RuntimeEvents) {
        assert_eq!(
            event_types(events),
            vec![EVENT_ACTION_START, EVENT_ACTION_ERROR, EVENT_ACTION_END]
        );
        let rv = env.remove_return_values().expect("return values installed");
        assert!(rv.is_empty());
    }

    // -- native actions -------------------------------------------------------

    #[test]
    fn test_native_pass_through() {
        let mut env = env_with(&[("name", json!("nameTest")), ("role", json!("roleTest"))]);
        let events = run_native(
            &executor(),
            &mut env,
            &mut TransientStore::new(),
            CONTENT_TEST_ACTIONS,
            "do_sample_action",
        );

        let rv = env.remove_return_values().unwrap();
        assert_eq!(rv.outputs().len(), 2);
        assert_eq!(rv.get("name"), Some("nameTest"));
        assert_eq!(rv.get("role"), Some("roleTest"));
        assert_eq!(event_types(&events), vec![EVENT_ACTION_START, EVENT_ACTION_END]);
    }

    #[test]
    fn test_native_missing_input_binds_null() {
        let mut env = env_with(&[("name", json!("nameTest"))]);
        let events = run_native(
            &executor(),
            &mut env,
            &mut TransientStore::new(),
            CONTENT_TEST_ACTIONS,
            "do_sample_action",
        );

        let rv = env.remove_return_values().unwrap();
        assert_eq!(rv.get("name"), Some("nameTest"));
        assert!(rv.contains("role"));
        assert_eq!(rv.get("role"), None);
        assert!(events.of_type(EVENT_ACTION_ERROR).is_empty());
    }

    #[test]
    fn test_native_missing_type_emits_error_and_end() {
        let mut env = env_with(&[("name", json!("nameTest")), ("role", json!("roleTest"))]);
        let events = run_native(
            &executor(),
            &mut env,
            &mut TransientStore::new(),
            "MissingClassName",
            "do_sample_action",
        );
        assert_eq!(error_kind(&events), ActionErrorKind::ClassResolution);
        assert_failed_with_empty_outputs(&mut env, &events);
    }

    #[test]
    fn test_native_wrong_return_type_emits_error_and_end() {
        let mut env = env_with(&[("name", json!("nameTest")), ("role", json!("roleTest"))]);
        let events = run_native(
            &executor(),
            &mut env,
            &mut TransientStore::new(),
            CONTENT_TEST_ACTIONS,
            "do_action_wrong_return_type",
        );
        assert_eq!(error_kind(&events), ActionErrorKind::InvalidReturnType);
        assert_failed_with_empty_outputs(&mut env, &events);
    }

    #[test]
    fn test_native_missing_method_yields_empty_outputs() {
        let mut env = env_with(&[("name", json!("nameTest"))]);
        let events = run_native(
            &executor(),
            &mut env,
            &mut TransientStore::new(),
            CONTENT_TEST_ACTIONS,
            "do_sample_action_NOT_FOUND",
        );
        assert_eq!(error_kind(&events), ActionErrorKind::ActionNotFound);
        assert_failed_with_empty_outputs(&mut env, &events);
    }

    #[test]
    fn test_native_unmarked_method_reported_by_default() {
        let mut env = env_with(&[("name", json!("nameTest"))]);
        let events = run_native(
            &executor(),
            &mut env,
            &mut TransientStore::new(),
            CONTENT_TEST_ACTIONS,
            "do_action_missing_marker",
        );
        assert_eq!(error_kind(&events), ActionErrorKind::ActionNotFound);
        assert_failed_with_empty_outputs(&mut env, &events);
    }

    #[test]
    fn test_native_unmarked_method_silent_policy() {
        let mut env = env_with(&[("name", json!("nameTest"))]);
        let events = run_native(
            &executor_with(UnmarkedActionPolicy::Silent),
            &mut env,
            &mut TransientStore::new(),
            CONTENT_TEST_ACTIONS,
            "do_action_missing_marker",
        );
        assert_eq!(event_types(&events), vec![EVENT_ACTION_START, EVENT_ACTION_END]);
        assert!(env.remove_return_values().unwrap().is_empty());
    }

    #[test]
    fn test_native_panic_is_contained() {
        let mut env = RunEnvironment::new();
        let events = run_native(
            &executor(),
            &mut env,
            &mut TransientStore::new(),
            CONTENT_TEST_ACTIONS,
            "do_panicking_action",
        );
        assert_eq!(error_kind(&events), ActionErrorKind::InvocationFailed);
        assert_failed_with_empty_outputs(&mut env, &events);
    }

    // -- session stores -------------------------------------------------------

    #[test]
    fn test_transient_session_get_and_set() {
        let executor = executor();
        let mut transient = TransientStore::new();
        transient.insert("name".into(), test_actions::employee("John"));

        let mut env = RunEnvironment::new();
        run_native(&executor, &mut env, &mut transient, SESSION_TEST_ACTIONS, "get_name_from_transient");
        assert_eq!(env.remove_return_values().unwrap().get("name"), Some("John"));

        env.put_call_arguments([("value".to_string(), json!("David"))].into());
        let events = run_native(
            &executor,
            &mut env,
            &mut transient,
            SESSION_TEST_ACTIONS,
            "set_name_in_transient",
        );
        assert!(events.of_type(EVENT_ACTION_ERROR).is_empty());
        assert_eq!(env.remove_return_values().unwrap().get("name"), Some("David"));
        assert_eq!(
            transient["name"].resource_as::<Employee>().map(|e| e.name.as_str()),
            Some("David")
        );
    }

    #[test]
    fn test_transient_session_miss_returns_present_null() {
        let mut env = RunEnvironment::new();
        let mut transient = TransientStore::new();
        let events = run_native(
            &executor(),
            &mut env,
            &mut transient,
            SESSION_TEST_ACTIONS,
            "get_name_from_transient",
        );

        assert_eq!(event_types(&events), vec![EVENT_ACTION_START, EVENT_ACTION_END]);
        let rv = env.remove_return_values().unwrap();
        assert!(rv.contains("name"));
        assert_eq!(rv.get("name"), None);
        assert!(transient.is_empty());
    }

    #[test]
    fn test_transient_session_set_without_wrapper_fails() {
        let mut env = env_with(&[("value", json!("David"))]);
        let mut transient = TransientStore::new();
        let events = run_native(&executor(), &mut env, &mut transient, SESSION_TEST_ACTIONS, "set_name_in_transient");
        assert_eq!(error_kind(&events), ActionErrorKind::InvocationFailed);
        assert!(transient.is_empty());
    }

    #[test]
    fn test_persisted_session_miss_auto_creates_entry() {
        let mut env = RunEnvironment::new();
        let events = run_native(
            &executor(),
            &mut env,
            &mut TransientStore::new(),
            SESSION_TEST_ACTIONS,
            "get_name_from_persisted",
        );

        assert!(events.of_type(EVENT_ACTION_ERROR).is_empty());
        let rv = env.remove_return_values().unwrap();
        assert!(rv.contains("name"));
        assert_eq!(rv.get("name"), None);
        assert!(env.serializable_data().contains_key("name"));
        assert_eq!(env.serializable_data()["name"].value(), None);
    }

    #[test]
    fn test_persisted_session_get_and_set() {
        let executor = executor();
        let mut env = env_with(&[("value", json!("David"))]);
        env.serializable_data_mut().insert(
            "name".into(),
            SerializableSessionObject::new(Some(json!("John"))),
        );

        let mut transient = TransientStore::new();
        run_native(&executor, &mut env, &mut transient, SESSION_TEST_ACTIONS, "get_name_from_persisted");
        assert_eq!(env.remove_return_values().unwrap().get("name"), Some("John"));

        run_native(&executor, &mut env, &mut transient, SESSION_TEST_ACTIONS, "set_name_in_persisted");
        assert_eq!(env.serializable_data()["name"].value(), Some(&json!("David")));
    }

    // -- scripts --------------------------------------------------------------

    #[test]
    fn test_script_harvests_namespace() {
        let mut env = env_with(&[("host", json!("localhost")), ("port", json!("8080"))]);
        let events = run_script(&mut env, Some(SCRIPT));

        assert_eq!(event_types(&events), vec![EVENT_ACTION_START, EVENT_ACTION_END]);
        let rv = env.remove_return_values().unwrap();
        assert_eq!(rv.outputs().len(), 5);
        assert_eq!(rv.get("host"), Some("localhost"));
        assert_eq!(rv.get("port"), Some("8081"));
        assert_eq!(rv.get("url"), Some("http://localhost:8080"));
        assert_eq!(rv.get("url2"), Some("http://localhost:8080/oo"));
        assert_eq!(rv.get("another"), Some("just a string"));
    }

    #[test]
    fn test_script_missing_inputs_emits_error() {
        let mut env = RunEnvironment::new();
        let events = run_script(&mut env, Some(SCRIPT));
        assert_eq!(error_kind(&events), ActionErrorKind::ScriptRuntime);
        assert_failed_with_empty_outputs(&mut env, &events);
    }

    #[test]
    fn test_script_numeric_edge_cases() {
        let mut env = env_with(&[("host", json!("localhost")), ("port", json!("8080"))]);
        let events = run_script(&mut env, Some("x = -1"));
        assert_eq!(event_types(&events), vec![EVENT_ACTION_START, EVENT_ACTION_END]);
        assert_eq!(env.remove_return_values().unwrap().get("x"), Some("-1"));

        for text in ["x = 1 / 0", "x = 5 % 0"] {
            let events = run_script(&mut env, Some(text));
            assert_eq!(error_kind(&events), ActionErrorKind::ScriptRuntime);
            assert_failed_with_empty_outputs(&mut env, &events);
        }
    }

    #[test]
    fn test_script_empty_or_absent_is_noop() {
        for text in [None, Some(""), Some("   ")] {
            let mut env = env_with(&[("host", json!("localhost"))]);
            let events = run_script(&mut env, text);
            assert_eq!(event_types(&events), vec![EVENT_ACTION_START, EVENT_ACTION_END]);
            assert!(env.remove_return_values().unwrap().is_empty());
        }
    }

    #[test]
    fn test_script_cannot_touch_session_stores() {
        let mut env = env_with(&[("host", json!("localhost"))]);
        env.serializable_data_mut().insert(
            "name".into(),
            SerializableSessionObject::new(Some(json!("John"))),
        );
        let events = run_script(&mut env, Some("who = name"));
        assert_eq!(error_kind(&events), ActionErrorKind::ScriptRuntime);
    }

    // -- contract ---------------------------------------------------------------

    #[test]
    fn test_return_values_are_read_once() {
        let mut env = env_with(&[("name", json!("a")), ("role", json!("b"))]);
        run_native(&executor(), &mut env, &mut TransientStore::new(), CONTENT_TEST_ACTIONS, "do_sample_action");
        assert!(env.remove_return_values().is_some());
        assert!(env.remove_return_values().is_none());
    }

    #[test]
    fn test_events_share_execution_id_and_end_reports_outputs() {
        let mut env = env_with(&[("name", json!("a")), ("role", json!("b"))]);
        let events = run_native(&executor(), &mut env, &mut TransientStore::new(), CONTENT_TEST_ACTIONS, "do_sample_action");

        let all = events.events();
        let id = all[0].execution_id();
        assert!(all.iter().all(|e| e.execution_id() == id));
        match all.last() {
            Some(ActionEvent::ActionEnded {
                succeeded,
                outputs,
                action,
                ..
            }) => {
                assert!(*succeeded);
                assert_eq!(outputs.len(), 2);
                assert_eq!(action, &format!("{CONTENT_TEST_ACTIONS}::do_sample_action"));
            }
            other => panic!("expected end event, got {other:?}"),
        }
        match &all[0] {
            ActionEvent::ActionStarted { input_names, .. } => {
                assert_eq!(input_names, &vec!["name".to_string(), "role".to_string()]);
            }
            other => panic!("expected start event, got {other:?}"),
        }
    }

    #[test]
    fn test_do_action_flat_form_ignores_irrelevant_fields() {
        let executor = executor();
        let mut env = env_with(&[("host", json!("localhost")), ("port", json!("8080"))]);
        let events = RuntimeEvents::new();
        executor.do_action(
            &mut env,
            &mut TransientStore::new(),
            ActionKind::Script,
            "ignored.Type",
            "ignored",
            &events,
            Some(SCRIPT),
        );
        assert_eq!(env.remove_return_values().unwrap().get("url2"), Some("http://localhost:8080/oo"));

        env.put_call_arguments([("name".to_string(), json!("n"))].into());
        executor.do_action(
            &mut env,
            &mut TransientStore::new(),
            ActionKind::Native,
            CONTENT_TEST_ACTIONS,
            "do_sample_action",
            &events,
            Some("ignored = missing"),
        );
        assert_eq!(env.remove_return_values().unwrap().get("name"), Some("n"));
        assert!(events.of_type(EVENT_ACTION_ERROR).is_empty());
    }

    #[test]
    fn test_executor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ActionExecutor>();

        let executor = executor();
        std::thread::scope(|scope| {
            for i in 0..8 {
                let executor = &executor;
                scope.spawn(move || {
                    let name = format!("name-{i}");
                    let mut env = env_with(&[("name", json!(name.clone())), ("role", json!("r"))]);
                    let events = RuntimeEvents::new();
                    executor.execute(
                        &mut env,
                        &mut TransientStore::new(),
                        &ActionDescriptor::native(CONTENT_TEST_ACTIONS, "do_sample_action"),
                        &events,
                    );
                    let rv = env.remove_return_values().unwrap();
                    assert_eq!(rv.get("name"), Some(name.as_str()));
                    assert_eq!(events.len(), 2);
                });
            }
        });
    }

    #[tokio::test]
    async fn test_event_bus_sink_receives_lifecycle() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let mut env = RunEnvironment::new();
        executor().execute(
            &mut env,
            &mut TransientStore::new(),
            &ActionDescriptor::native("MissingClassName", "x"),
            &bus,
        );

        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event.event_type());
        }
        assert_eq!(received, vec![EVENT_ACTION_START, EVENT_ACTION_ERROR, EVENT_ACTION_END]);
    }
}
