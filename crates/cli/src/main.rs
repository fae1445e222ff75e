//! envscope - inspect environment configuration from the command line.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Load the nearest `.env` file into the process environment.
//! - Run the requested command and translate failures into exit codes.
//!
//! Does NOT handle:
//! - `.env` parsing, override scopes, or typed population (see `crates/config`).
//!
//! Invariants:
//! - Logs go to stderr; stdout carries command output only.
//! - `.env` loading happens once, outside any override scope, before dispatch.

mod args;
mod commands;
mod dispatch;
mod error;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(cli.log_json.then(|| fmt::layer().json().with_writer(io::stderr)))
        .with((!cli.log_json).then(|| fmt::layer().with_writer(io::stderr)))
        .init();

    let start_dir = match resolve_start_dir(cli.dir.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    if cli.no_dotenv {
        tracing::debug!("--no-dotenv given; skipping .env loading");
    } else if let Err(e) = envscope_config::load_from(&start_dir) {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let mut stdout = io::stdout().lock();
    let exit_code = match run_command(cli.command, &start_dir, &mut stdout) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    // process::exit skips destructors, so flush explicitly.
    let _ = stdout.flush();
    std::process::exit(exit_code.as_i32());
}

/// The directory `.env` discovery starts from.
fn resolve_start_dir(dir: Option<&Path>) -> Result<PathBuf> {
    match dir {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.to_path_buf()),
        _ => std::env::current_dir().context("Unable to determine the current directory"),
    }
}
