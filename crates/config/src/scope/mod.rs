//! Scoped overriding of environment variables.
//!
//! Responsibilities:
//! - Run a callback with a set of variable overrides active for its duration.
//! - Hand the callback an explicit `EnvContext` that can be threaded anywhere,
//!   including onto other threads.
//! - Answer "which override applies to the current call path?" for code that
//!   does not receive the context explicitly.
//!
//! Does NOT handle:
//! - Writing the process environment. Overrides are an overlay; the real
//!   environment is never modified.
//! - Propagating scopes to threads spawned inside a callback. Such threads
//!   only observe the override through a cloned `EnvContext`.
//!
//! Invariants:
//! - The innermost scope wins. A scope that does not name a variable falls
//!   through to the real environment, never to an enclosing scope.
//! - A scope is deregistered exactly once, after the callback returns or unwinds.
//! - Scopes on different threads never observe each other.

mod context;
mod registry;


use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::Arc;

pub use context::{EnvContext, Overlay};

use crate::error::OverrideError;
use registry::Registration;

/// The variables overridden by one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    vars: BTreeMap<String, String>,
}

impl Overrides {
    /// Returns the override for `name`, if this scope names it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Later pairs replace earlier pairs with the same name.
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Overrides {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.vars
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<'a> IntoIterator for &'a Overrides {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

/// Run `callback` with `pairs` overriding the environment.
///
/// Every lookup made through the `EnvContext` passed to the callback, or made
/// implicitly (e.g. [`crate::lookup`], [`crate::parse`]) on this thread while
/// the callback runs, sees the overrides. The scope is removed when the
/// callback returns, and also when it panics; the panic then continues to the
/// caller unchanged.
///
/// ```
/// use envscope_config::{lookup, with_overrides};
///
/// let port = with_overrides([("APP_PORT", "9000")], |_ctx| lookup("APP_PORT", None));
/// assert_eq!(port.0.as_str(), "9000");
/// assert!(port.1);
/// ```
pub fn with_overrides<I, K, V, F, R>(pairs: I, callback: F) -> R
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
    F: FnOnce(&EnvContext) -> R,
{
    run_scope(pairs.into_iter().collect(), callback)
}

/// Register `overrides` on the current call path for the duration of `callback`.
fn run_scope<F, R>(overrides: Overrides, callback: F) -> R
where
    F: FnOnce(&EnvContext) -> R,
{
    let overrides = Arc::new(overrides);
    let _registration = Registration::register(Arc::clone(&overrides));
    let ctx = EnvContext::with_scope(overrides);
    callback(&ctx)
}

/// Flat form of [`with_overrides`]: `kv` alternates names and values.
///
/// # Errors
///
/// Returns [`OverrideError::OddArguments`] without invoking the callback when
/// `kv` has an odd length. This is a usage error; callers should not try to
/// recover from it.
pub fn run_with_override<S, F, R>(kv: &[S], callback: F) -> Result<R, OverrideError>
where
    S: AsRef<str>,
    F: FnOnce(&EnvContext) -> R,
{
    if kv.len() % 2 != 0 {
        return Err(OverrideError::OddArguments { count: kv.len() });
    }

    let pairs = kv
        .chunks_exact(2)
        .map(|pair| (pair[0].as_ref(), pair[1].as_ref()));
    Ok(with_overrides(pairs, callback))
}

/// The overrides of the nearest scope on the current call path, or `None`
/// when the caller is not inside any scope.
pub fn current_override() -> Option<Overrides> {
    registry::resolve_current().map(|overrides| (*overrides).clone())
}
