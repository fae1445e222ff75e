//! Check command: verify that required variables are defined and non-empty.
//!
//! Every name is validated, so a single run reports all failures at once.

use std::io::Write;

use anyhow::Result;
use envscope_config::{EnvContext, FieldKind, FieldSpec, Schema};

use crate::error::CommandError;

fn requirement(name: &str) -> Schema {
    Schema::new().field(
        FieldSpec::new(name, name, FieldKind::String)
            .required()
            .not_empty(),
    )
}

pub fn run(ctx: &EnvContext, required: &[String], out: &mut impl Write) -> Result<()> {
    let source = ctx.source();
    let failures: Vec<String> = required
        .iter()
        .filter_map(|name| requirement(name).parse(&source).err())
        .map(|e| e.to_string())
        .collect();

    if !failures.is_empty() {
        tracing::debug!(count = failures.len(), "required variables failed validation");
        return Err(CommandError::RequiredMissing { failures }.into());
    }

    writeln!(out, "ok: {} required variable(s) present", required.len())?;
    Ok(())
}
