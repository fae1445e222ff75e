//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the command handlers.
//! - Open the override scope built from `--set` pairs around commands that read variables.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - `.env` loading (see `main()`).

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use envscope_config::with_overrides;

use crate::args::Commands;
use crate::commands;

/// Dispatch a parsed subcommand, writing its output to `out`.
pub(crate) fn run_command(command: Commands, start_dir: &Path, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Locate => commands::locate::run(start_dir, out),
        Commands::Get {
            names,
            default,
            overrides,
        } => with_overrides(overrides, |ctx| {
            commands::get::run(ctx, &names, default.as_deref(), out)
        }),
        Commands::Check {
            required,
            overrides,
        } => with_overrides(overrides, |ctx| commands::check::run(ctx, &required, out)),
    }
}
