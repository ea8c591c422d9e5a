//! `stepb run` commands: execute one script or native action.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use serde_json::Value;

use tokio::sync::broadcast::{self, error::TryRecvError};

use stepbridge_core::event::EventBus;
use stepbridge_core::{ActionExecutor, RunEnvironment};
use stepbridge_types::action::ActionDescriptor;
use stepbridge_types::event::ActionEvent;
use stepbridge_types::run::{CallArguments, Outputs};
use stepbridge_types::session::{PersistedStore, TransientStore};

use super::RunInputs;

/// Run the script at `file`.
pub async fn run_script(
    executor: &ActionExecutor,
    file: &Path,
    inputs: RunInputs,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read script {}", file.display()))?;
    run_action(executor, &ActionDescriptor::script(Some(text)), inputs, json, quiet).await
}

/// Run `type_name::method_name` from the registry.
pub async fn run_native(
    executor: &ActionExecutor,
    type_name: &str,
    method_name: &str,
    inputs: RunInputs,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let action = ActionDescriptor::native(type_name, method_name);
    run_action(executor, &action, inputs, json, quiet).await
}

async fn run_action(
    executor: &ActionExecutor,
    action: &ActionDescriptor,
    inputs: RunInputs,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let mut env = RunEnvironment::new();
    env.put_call_arguments(call_arguments(inputs.args));
    if let Some(path) = &inputs.state {
        *env.serializable_data_mut() = load_state(path).await?;
    }

    let bus = EventBus::new(executor.config().event_bus_capacity);
    let mut receiver = bus.subscribe();
    // The CLI has no host objects to offer, so the transient store starts empty.
    let mut transient = TransientStore::new();
    executor.execute(&mut env, &mut transient, action, &bus);

    let outputs = env
        .remove_return_values()
        .map(|rv| rv.into_outputs())
        .unwrap_or_default();
    let events = drain_events(&mut receiver);

    if let Some(path) = &inputs.state {
        save_state(path, env.serializable_data()).await?;
    }

    let succeeded = events
        .iter()
        .any(|e| matches!(e, ActionEvent::ActionEnded { succeeded: true, .. }));
    let failure = (!succeeded).then(|| {
        events
            .iter()
            .find_map(|e| match e {
                ActionEvent::ActionError { message, .. } => Some(message.clone()),
                _ => None,
            })
            .unwrap_or_else(|| format!("{} failed", action.label()))
    });

    if json {
        let report = serde_json::json!({
            "action": action.label(),
            "succeeded": failure.is_none(),
            "outputs": outputs,
            "events": events,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !quiet {
        print_outputs(&action.label(), &outputs, failure.is_none());
    }

    match failure {
        Some(message) => anyhow::bail!(message),
        None => Ok(()),
    }
}

fn drain_events(receiver: &mut broadcast::Receiver<ActionEvent>) -> Vec<ActionEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event bus lagged; raise event_bus_capacity");
            }
            Err(_) => break,
        }
    }
    events
}

fn call_arguments(args: Vec<(String, String)>) -> CallArguments {
    args.into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect()
}

async fn load_state(path: &Path) -> Result<PersistedStore> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse session state {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No session state at {}, starting empty", path.display());
            Ok(PersistedStore::new())
        }
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

async fn save_state(path: &Path, store: &PersistedStore) -> Result<()> {
    let content = serde_json::to_string_pretty(store)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("failed to write session state {}", path.display()))
}

fn print_outputs(label: &str, outputs: &Outputs, succeeded: bool) {
    println!();
    let mark = if succeeded {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    println!("  {mark} {}", style(label).bold());

    if outputs.is_empty() {
        println!();
        println!("  {} No outputs", style("i").blue().bold());
        println!();
        return;
    }

    let mut names: Vec<&String> = outputs.keys().collect();
    names.sort();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Output").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);

    for name in names {
        let value = match outputs.get(name).and_then(|v| v.as_deref()) {
            Some(v) => Cell::new(v),
            None => Cell::new("null").fg(Color::DarkGrey),
        };
        table.add_row(vec![Cell::new(name).fg(Color::Cyan), value]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} output{}",
        style(outputs.len()).bold(),
        if outputs.len() == 1 { "" } else { "s" }
    );
    println!();
}
