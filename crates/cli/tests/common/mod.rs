//! Shared test utilities for envscope integration tests.
//!
//! Invariants / Assumptions:
//! - Commands built here never load a `.env` unless a test removes `DOTENV_DISABLED`.
//! - Test variables use the `ENVSCOPE_CLI_` prefix and are cleared from the host environment.

use assert_cmd::Command;

/// Variables the CLI tests set; removed so the host cannot leak values in.
pub const TEST_VARS: [&str; 4] = [
    "ENVSCOPE_CLI_HOST",
    "ENVSCOPE_CLI_PORT",
    "ENVSCOPE_CLI_TOKEN",
    "ENVSCOPE_CLI_UNSET",
];

/// Returns a hermetic `envscope` command for integration testing.
pub fn envscope_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("envscope");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("ENVSCOPE_DIR").env_remove("RUST_LOG");
    for var in TEST_VARS {
        cmd.env_remove(var);
    }

    cmd
}

/// Returns an `envscope` command that loads `.env` files again.
pub fn envscope_cmd_with_dotenv() -> Command {
    let mut cmd = envscope_cmd();
    cmd.env_remove("DOTENV_DISABLED");
    cmd
}
