//! Read access to environment stores.
//!
//! Responsibilities:
//! - Define the `EnvSource` trait the lookup adapter reads through.
//! - Provide the real process environment (`ProcessEnv`) and an owned,
//!   hermetic map (`MemoryEnv`).
//!
//! Does NOT handle:
//! - Writing the process environment (only `.env` loading does that, via `dotenvy`).
//! - Override scopes (see `scope`).
//!
//! Invariants:
//! - Variables whose name or value is not valid Unicode are treated as undefined.

use std::collections::BTreeMap;

/// A read-only view of a name to string mapping.
pub trait EnvSource {
    /// Returns the value of `name`, or `None` when it is not defined.
    fn get(&self, name: &str) -> Option<String>;

    /// Returns true if `name` is defined, including when defined as empty.
    fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns every defined variable.
    fn snapshot(&self) -> BTreeMap<String, String>;
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        (**self).snapshot()
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// An owned environment, detached from the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: BTreeMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Remove `name`. Removing an undefined variable is a no-op.
    pub fn unset(&mut self, name: &str) {
        self.vars.remove(name);
    }

    /// Builder-style `set`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MemoryEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn exists(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.vars.clone()
    }
}
