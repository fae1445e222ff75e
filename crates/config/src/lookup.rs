//! Variable resolution for configuration fields.
//!
//! Responsibilities:
//! - Resolve a variable through the override scope that applies to the caller.
//! - Report whether the variable was defined, separately from its value, so
//!   "defined as empty" and "not defined" stay distinguishable.
//!
//! Does NOT handle:
//! - Type conversion (see `value.rs`) or required/non-empty checks (see `schema`).
//!
//! Invariants:
//! - Overrides are consulted before the store; the default only when neither
//!   defines the variable.

use crate::scope::EnvContext;
use crate::store::EnvSource;
use crate::value::RawValue;

/// Resolve `name` in `source`, falling back to `default` (or an empty value).
pub fn resolve<S: EnvSource + ?Sized>(
    source: &S,
    name: &str,
    default: Option<&str>,
) -> (RawValue, bool) {
    match source.get(name) {
        Some(value) => (RawValue::from(value), true),
        None => (RawValue::from(default.unwrap_or_default()), false),
    }
}

/// Resolve `name` for the current call path: the nearest override scope,
/// then the process environment, then `default`.
pub fn lookup(name: &str, default: Option<&str>) -> (RawValue, bool) {
    EnvContext::current().lookup(name, default)
}

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(name: &str) -> Option<String> {
    match lookup(name, None) {
        (value, true) if !value.is_zero() => Some(value.as_str().trim().to_owned()),
        _ => None,
    }
}
