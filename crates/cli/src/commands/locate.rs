//! Locate command: print the `.env` file discovery would use.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use envscope_config::find_env_file;

use crate::error::CommandError;

pub fn run(start_dir: &Path, out: &mut impl Write) -> Result<()> {
    let path = find_env_file(start_dir).ok_or_else(|| CommandError::EnvFileNotFound {
        dir: start_dir.to_path_buf(),
    })?;
    writeln!(out, "{}", path.display())?;
    Ok(())
}
