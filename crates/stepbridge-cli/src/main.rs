//! stepbridge CLI entry point.
//!
//! Binary name: `stepb`
//!
//! Parses CLI arguments, loads `stepbridge.toml`, registers the built-in
//! actions, then dispatches to the command handler.

mod cli;

use std::sync::Arc;

use clap::Parser;

use cli::{Cli, Commands, RunCommand};
use stepbridge_core::ActionExecutor;
use stepbridge_infra::actions::builtin_registry;
use stepbridge_infra::config::{default_config_dir, load_bridge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,stepbridge=debug",
        _ => "trace",
    };
    stepbridge_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = dispatch(cli).await;

    stepbridge_observe::tracing_setup::shutdown_tracing();
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config_dir = cli.config_dir.clone().unwrap_or_else(default_config_dir);
    let config = load_bridge_config(&config_dir).await;
    tracing::debug!(config_dir = %config_dir.display(), ?config, "loaded bridge config");

    let registry = Arc::new(builtin_registry());

    match cli.command {
        Commands::Run { action } => {
            let executor = ActionExecutor::new(Arc::clone(&registry), config);
            match action {
                RunCommand::Script { file, inputs } => {
                    cli::run::run_script(&executor, &file, inputs, cli.json, cli.quiet).await?;
                }
                RunCommand::Native {
                    type_name,
                    method_name,
                    inputs,
                } => {
                    cli::run::run_native(
                        &executor,
                        &type_name,
                        &method_name,
                        inputs,
                        cli.json,
                        cli.quiet,
                    )
                    .await?;
                }
            }
        }

        Commands::Actions => {
            cli::actions::list_actions(&registry, cli.json)?;
        }
    }

    Ok(())
}
