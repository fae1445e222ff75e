//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse `--set KEY=VALUE` override pairs.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load `.env` files (see `main()`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "envscope")]
#[command(about = "Inspect environment configuration with .env discovery and scoped overrides", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  envscope locate\n  envscope get DATABASE_URL PORT --default unset\n  envscope get PORT --set PORT=9090\n  envscope check --require DATABASE_URL --require API_TOKEN\n"
)]
pub struct Cli {
    /// Directory to start the `.env` search from (defaults to the working directory)
    #[arg(long, global = true, env = "ENVSCOPE_DIR", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Do not load any `.env` file
    #[arg(long, global = true)]
    pub no_dotenv: bool,

    /// Emit logs as JSON instead of human-readable text
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the path of the nearest `.env` file
    Locate,

    /// Resolve variables and print them as NAME=VALUE
    Get {
        /// Variable names to resolve
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,

        /// Value reported for variables that are not defined
        #[arg(long, value_name = "VALUE")]
        default: Option<String>,

        /// Override a variable for this invocation (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        overrides: Vec<(String, String)>,
    },

    /// Fail when any required variable is missing or empty
    Check {
        /// Variable that must be defined and non-empty (repeatable)
        #[arg(long = "require", required = true, value_name = "NAME")]
        required: Vec<String>,

        /// Override a variable for this invocation (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        overrides: Vec<(String, String)>,
    },
}

/// Parse a `KEY=VALUE` pair. The value may itself contain `=`.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    if key.trim().is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
