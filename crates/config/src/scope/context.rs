//! The explicit override handle and the overlay it puts over an environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Overrides, registry};
use crate::dotenv::{self, LoadMode};
use crate::error::ConfigError;
use crate::lookup::resolve;
use crate::schema::FromEnv;
use crate::store::{EnvSource, ProcessEnv};
use crate::value::RawValue;

/// Handle to the override scope a piece of code runs in.
///
/// The handle is cheap to clone and can be sent to other threads; lookups
/// through it see the scope's overrides for as long as the handle lives, even
/// after the scope that created it has ended.
#[derive(Debug, Clone, Default)]
pub struct EnvContext {
    overrides: Option<Arc<Overrides>>,
}

impl EnvContext {
    /// A context with no overrides: lookups read the environment directly.
    pub fn root() -> Self {
        Self::default()
    }

    /// The context of the nearest override scope on the current call path.
    pub fn current() -> Self {
        Self {
            overrides: registry::resolve_current(),
        }
    }

    pub(super) fn with_scope(overrides: Arc<Overrides>) -> Self {
        Self {
            overrides: Some(overrides),
        }
    }

    /// Run `callback` in a child scope of this context on the current thread.
    ///
    /// The child sees this context's overrides with `pairs` layered on top,
    /// and implicit lookups on this thread resolve to it. A thread that was
    /// handed a context uses this to re-enter the scope.
    pub fn with_overrides<I, K, V, F, R>(&self, pairs: I, callback: F) -> R
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
        F: FnOnce(&EnvContext) -> R,
    {
        let mut overrides = self.overrides().cloned().unwrap_or_default();
        overrides.extend(pairs);
        super::run_scope(overrides, callback)
    }

    /// The overrides of this context, if any.
    pub fn overrides(&self) -> Option<&Overrides> {
        self.overrides.as_deref()
    }

    pub fn is_overridden(&self) -> bool {
        self.overrides.is_some()
    }

    /// This context layered over the process environment.
    pub fn source(&self) -> Overlay<'_, ProcessEnv> {
        self.over(ProcessEnv)
    }

    /// This context layered over an arbitrary store.
    pub fn over<S: EnvSource>(&self, store: S) -> Overlay<'_, S> {
        Overlay {
            overrides: self.overrides(),
            store,
        }
    }

    /// Resolve `name` from the overrides, then the process environment, then
    /// `default`. The flag is true only when the variable is defined.
    pub fn lookup(&self, name: &str, default: Option<&str>) -> (RawValue, bool) {
        resolve(&self.source(), name, default)
    }

    /// Like [`EnvContext::lookup`], reading `store` instead of the process environment.
    pub fn lookup_in<S: EnvSource>(
        &self,
        store: &S,
        name: &str,
        default: Option<&str>,
    ) -> (RawValue, bool) {
        resolve(&self.over(store), name, default)
    }

    /// Populate `T` from this context and the process environment.
    pub fn parse<T: FromEnv>(&self) -> Result<T, ConfigError> {
        crate::schema::parse_from(&self.source())
    }

    /// Load the `.env` file found from `dir` upwards.
    ///
    /// Inside an override scope only variables that are not yet defined are
    /// set; otherwise the file's values replace existing ones.
    pub fn load_from(&self, dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
        let mode = if self.is_overridden() {
            LoadMode::KeepExisting
        } else {
            LoadMode::Overwrite
        };
        dotenv::load_with_mode(dir, mode)
    }

    /// Load the `.env` file found from the working directory, then populate `T`.
    pub fn load_and_parse<T: FromEnv>(&self) -> Result<T, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        self.load_from(&cwd)?;
        self.parse()
    }
}

/// An override mapping consulted before an underlying store.
#[derive(Debug, Clone)]
pub struct Overlay<'a, S> {
    overrides: Option<&'a Overrides>,
    store: S,
}

impl<S: EnvSource> EnvSource for Overlay<'_, S> {
    fn get(&self, name: &str) -> Option<String> {
        match self.overrides.and_then(|o| o.get(name)) {
            Some(value) => Some(value.to_owned()),
            None => self.store.get(name),
        }
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        let mut vars = self.store.snapshot();
        if let Some(overrides) = self.overrides {
            vars.extend(overrides.iter().map(|(k, v)| (k.to_owned(), v.to_owned())));
        }
        vars
    }
}
