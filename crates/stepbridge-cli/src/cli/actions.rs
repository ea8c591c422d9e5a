//! `stepb actions`: list registered native actions.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use serde_json::json;

use stepbridge_core::native::{ActionMethod, ActionRegistry, ParamSpec};

fn describe_params(method: &ActionMethod) -> String {
    let params: Vec<String> = method
        .params()
        .iter()
        .map(|p| match p {
            ParamSpec::Input(name) => name.clone(),
            ParamSpec::TransientSession => "<transient>".to_string(),
            ParamSpec::PersistedSession => "<persisted>".to_string(),
        })
        .collect();
    params.join(", ")
}

pub fn list_actions(registry: &ActionRegistry, json: bool) -> Result<()> {
    let providers = registry.providers();

    if json {
        let entries: Vec<_> = providers
            .iter()
            .flat_map(|provider| {
                provider.methods().iter().filter(|m| m.is_marked()).map(move |m| {
                    json!({
                        "type_name": provider.type_name(),
                        "method_name": m.name(),
                        "inputs": m.input_names().collect::<Vec<_>>(),
                        "transient_session": m.wants_transient(),
                        "persisted_session": m.wants_persisted(),
                        "returns": m.return_shape().to_string(),
                    })
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Type").fg(Color::White),
        Cell::new("Method").fg(Color::White),
        Cell::new("Parameters").fg(Color::White),
    ]);

    let mut count = 0usize;
    for provider in &providers {
        for method in provider.methods().iter().filter(|m| m.is_marked()) {
            table.add_row(vec![
                Cell::new(provider.type_name()).fg(Color::DarkGrey),
                Cell::new(method.name()).fg(Color::Cyan),
                Cell::new(describe_params(method)),
            ]);
            count += 1;
        }
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} action{}",
        style(count).bold(),
        if count == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}
