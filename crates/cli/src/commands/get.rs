//! Get command: resolve variables through the active override scope.
//!
//! Responsibilities:
//! - Print `NAME=VALUE` for every defined variable.
//! - Print `NAME=DEFAULT` for undefined variables when a default is given,
//!   and `NAME is not defined` otherwise.
//!
//! Does NOT handle:
//! - Building the override scope (see `dispatch`).

use std::io::Write;

use anyhow::Result;
use envscope_config::EnvContext;
use tracing::debug;

pub fn run(
    ctx: &EnvContext,
    names: &[String],
    default: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    for name in names {
        let (value, defined) = ctx.lookup(name, default);
        let overridden = ctx.overrides().is_some_and(|o| o.contains(name));
        debug!(name = name.as_str(), defined, overridden, "resolved variable");

        if defined || default.is_some() {
            writeln!(out, "{name}={value}")?;
        } else {
            writeln!(out, "{name} is not defined")?;
        }
    }
    Ok(())
}
