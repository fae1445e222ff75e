//! Centralized constants for the envscope workspace.

/// File name searched for by `.env` discovery.
pub const ENV_FILE_NAME: &str = ".env";

/// Variable that disables `.env` loading when set to `1` or `true`.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

/// Separator used for string list fields without an explicit delimiter.
pub const DEFAULT_LIST_DELIMITER: &str = ",";
