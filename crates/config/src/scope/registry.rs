//! Process-wide storage of active override scopes.
//!
//! Responsibilities:
//! - Allocate scope ids and derive the `ContextKey` of a scope.
//! - Keep the registry of active scopes and the per-thread call path.
//! - Resolve the nearest enclosing scope of the current call path.
//!
//! Does NOT handle:
//! - Building override mappings or running callbacks (see `scope::mod`).
//!
//! Invariants:
//! - A `Registration` inserts exactly one registry entry and pushes exactly one
//!   call-path frame; dropping it removes both, including during unwinding.
//! - The call-path frame is pushed before the registry entry is inserted, so
//!   no entry exists without a guard that removes it.
//! - The call path is thread-local: threads spawned inside a scope start empty.
//! - Registry locks are only held for map operations, never across callbacks.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use super::Overrides;

/// Process-unique identity of one override scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ScopeId(u64);

impl ScopeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of a scope registration: the thread it runs on plus the scope itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ContextKey {
    unit: ThreadId,
    scope: ScopeId,
}

impl ContextKey {
    fn on_current_thread(scope: ScopeId) -> Self {
        Self {
            unit: thread::current().id(),
            scope,
        }
    }
}

type Registry = RwLock<HashMap<ContextKey, Arc<Overrides>>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

thread_local! {
    static CALL_PATH: RefCell<Vec<ScopeId>> = const { RefCell::new(Vec::new()) };
}

/// An active scope. Dropping it deregisters the scope.
#[derive(Debug)]
pub(crate) struct Registration {
    key: ContextKey,
}

impl Registration {
    pub(crate) fn register(overrides: Arc<Overrides>) -> Self {
        let key = ContextKey::on_current_thread(ScopeId::next());
        let vars = overrides.len();

        // Panics during thread-local teardown, before anything is registered.
        let depth = CALL_PATH.with(|path| {
            let mut path = path.borrow_mut();
            path.push(key.scope);
            path.len()
        });
        let registration = Self { key };

        registry()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, overrides);

        tracing::trace!(scope = key.scope.0, depth, vars, "entered override scope");
        registration
    }

    #[cfg(test)]
    pub(crate) fn key(&self) -> ContextKey {
        self.key
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let _ = CALL_PATH.try_with(|path| {
            let mut path = path.borrow_mut();
            if let Some(pos) = path.iter().rposition(|id| *id == self.key.scope) {
                path.remove(pos);
            }
        });
        let removed = registry()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);

        tracing::trace!(
            scope = self.key.scope.0,
            removed = removed.is_some(),
            "left override scope"
        );
    }
}

/// Resolve the nearest scope registered on the current thread's call path.
///
/// A non-empty call path without any registered scope is a key mismatch: it
/// degrades to "not overridden" and is logged.
pub(crate) fn resolve_current() -> Option<Arc<Overrides>> {
    let path = CALL_PATH.with(|path| path.borrow().clone());
    if path.is_empty() {
        return None;
    }

    let unit = thread::current().id();
    let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
    let found = path
        .iter()
        .rev()
        .find_map(|scope| registry.get(&ContextKey { unit, scope: *scope }).cloned());

    if found.is_none() {
        tracing::warn!(
            depth = path.len(),
            "override scope active on this call path but not registered; falling back to the process environment"
        );
    }
    found
}

/// Number of scopes on the current thread's call path.
#[cfg(test)]
pub(crate) fn call_path_depth() -> usize {
    CALL_PATH.with(|path| path.borrow().len())
}

#[cfg(test)]
pub(crate) fn is_registered(key: &ContextKey) -> bool {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(key)
}

/// Number of registry entries owned by thread `unit`.
#[cfg(test)]
pub(crate) fn entries_on(unit: ThreadId) -> usize {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .filter(|key| key.unit == unit)
        .count()
}

/// A call-path frame with no registry entry, simulating a key mismatch.
#[cfg(test)]
pub(crate) struct UnregisteredFrame(ScopeId);

#[cfg(test)]
impl UnregisteredFrame {
    pub(crate) fn push() -> Self {
        let scope = ScopeId::next();
        CALL_PATH.with(|path| path.borrow_mut().push(scope));
        Self(scope)
    }
}

#[cfg(test)]
impl Drop for UnregisteredFrame {
    fn drop(&mut self) {
        CALL_PATH.with(|path| path.borrow_mut().retain(|id| *id != self.0));
    }
}
