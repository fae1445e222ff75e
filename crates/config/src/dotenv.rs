//! `.env` file discovery and loading.
//!
//! Responsibilities:
//! - Find the nearest `.env` file from a directory upwards.
//! - Read a `.env` file into a map without touching the process environment.
//! - Merge a `.env` file into the process environment.
//! - Enforce the `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Override scopes themselves (see `scope`); loading only asks whether one is active.
//!
//! Invariants / Assumptions:
//! - A missing `.env` file is not an error.
//! - Outside an override scope file values replace existing variables; inside
//!   one, only undefined variables are set.
//! - Errors never include raw `.env` line contents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::{DOTENV_DISABLED_VAR, ENV_FILE_NAME};
use crate::error::ConfigError;
use crate::scope::EnvContext;

/// How a `.env` file is merged into the process environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// File values replace variables that are already defined.
    Overwrite,
    /// Only variables that are not yet defined are set.
    KeepExisting,
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Find `.env` in `start` or the nearest ancestor directory that has one.
pub fn find_env_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(ENV_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Read `path` as a `.env` file.
pub fn read_env_file(path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
    dotenvy::from_path_iter(path)
        .and_then(|iter| iter.collect::<Result<BTreeMap<_, _>, _>>())
        .map_err(|e| ConfigError::from_dotenv(path.to_path_buf(), e))
}

/// Load the `.env` file found from the working directory upwards.
///
/// Returns the path of the loaded file, or `None` if there was none or
/// loading is disabled.
pub fn load() -> Result<Option<PathBuf>, ConfigError> {
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    load_from(&cwd)
}

/// Load the `.env` file found from `dir` upwards, honouring the override
/// scope of the current call path.
pub fn load_from(dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    EnvContext::current().load_from(dir)
}

/// Load the `.env` file found from `dir` upwards with an explicit merge mode.
pub fn load_with_mode(dir: &Path, mode: LoadMode) -> Result<Option<PathBuf>, ConfigError> {
    if dotenv_disabled() {
        tracing::debug!("DOTENV_DISABLED is set; skipping .env loading");
        return Ok(None);
    }

    let Some(path) = find_env_file(dir) else {
        tracing::debug!(dir = %dir.display(), "no .env file found");
        return Ok(None);
    };

    let result = match mode {
        LoadMode::Overwrite => dotenvy::from_path_override(&path),
        LoadMode::KeepExisting => dotenvy::from_path(&path),
    };
    result.map_err(|e| ConfigError::from_dotenv(path.clone(), e))?;

    tracing::debug!(path = %path.display(), ?mode, "loaded .env file");
    Ok(Some(path))
}
