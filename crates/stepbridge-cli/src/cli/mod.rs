//! CLI command definitions for the `stepb` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `stepb run script deploy.step`, `stepb actions`).

pub mod actions;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Run workflow step actions outside a flow.
#[derive(Parser)]
#[command(name = "stepb", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding `stepbridge.toml`.
    #[arg(long, global = true, env = "STEPBRIDGE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a single action.
    Run {
        #[command(subcommand)]
        action: RunCommand,
    },

    /// List registered native actions.
    #[command(alias = "ls")]
    Actions,
}

#[derive(Subcommand)]
pub enum RunCommand {
    /// Run an action script file.
    Script {
        /// Path to the script.
        file: PathBuf,

        #[command(flatten)]
        inputs: RunInputs,
    },

    /// Run a registered native action.
    Native {
        /// Qualified type name of the action provider.
        type_name: String,

        /// Action method name.
        method_name: String,

        #[command(flatten)]
        inputs: RunInputs,
    },
}

/// Arguments shared by every `run` subcommand.
#[derive(clap::Args)]
pub struct RunInputs {
    /// Call argument as NAME=VALUE (repeatable). Values are strings.
    #[arg(short, long = "arg", value_name = "NAME=VALUE", value_parser = parse_call_argument)]
    pub args: Vec<(String, String)>,

    /// JSON file holding the persisted session store; read before the run
    /// and written back after it.
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,
}

/// Parse `NAME=VALUE`. The value may be empty or contain further `=`.
pub fn parse_call_argument(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("argument name is empty in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
