//! Environment-based configuration with scoped overrides.
//!
//! This crate loads `.env` files into the process environment, populates
//! typed configuration from environment variables, and lets callers override
//! variables for the duration of a callback without touching the real
//! environment. Overrides nest and stay isolated between threads.

pub mod constants;
pub mod dotenv;
mod error;
mod lookup;
pub mod schema;
mod scope;
pub mod store;
pub mod value;

pub use dotenv::{LoadMode, find_env_file, load, load_from, load_with_mode, read_env_file};
pub use error::{ConfigError, OverrideError, ValueError};
pub use lookup::{env_var_or_none, lookup, resolve};
pub use schema::{
    FieldKind, FieldSpec, FromEnv, FromValue, ParsedConfig, Schema, Value, load_and_parse, parse,
};
pub use scope::{
    EnvContext, Overlay, Overrides, current_override, run_with_override, with_overrides,
};
pub use store::{EnvSource, MemoryEnv, ProcessEnv};
pub use value::RawValue;
