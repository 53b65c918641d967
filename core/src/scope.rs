//! Scoped access to the active observer's values.
//!
//! A [`ViewportScope`] makes an observer's snapshot readable through
//! [`use_real_viewport`] for as long as the guard lives and the observer has not
//! been torn down. Scopes nest; the innermost one wins.

use core::cell::{Cell, RefCell};
use core::marker::PhantomData;

use std::rc::Weak;

use crate::error::ViewportError;
use crate::observer::{ObserverShared, ViewportObserver};
use crate::units::ViewportSnapshot;

thread_local! {
    static SCOPES: RefCell<Vec<(u64, Weak<ObserverShared>)>> = const { RefCell::new(Vec::new()) };
    static NEXT_SCOPE: Cell<u64> = const { Cell::new(0) };
}

/// Guard returned by [`ViewportObserver::provide`]. Dropping it closes the scope.
#[derive(Debug)]
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct ViewportScope {
    id: u64,
    // Scopes live in thread-local storage.
    _not_send: PhantomData<*const ()>,
}

impl ViewportObserver {
    /// Opens a scope in which [`use_real_viewport`] reads this observer.
    pub fn provide(&self) -> ViewportScope {
        let id = NEXT_SCOPE.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        let source = self.scope_source();
        SCOPES.with(|scopes| scopes.borrow_mut().push((id, source)));
        ViewportScope {
            id,
            _not_send: PhantomData,
        }
    }
}

impl Drop for ViewportScope {
    fn drop(&mut self) {
        let id = self.id;
        SCOPES.with(|scopes| scopes.borrow_mut().retain(|(scope, _)| *scope != id));
    }
}

/// Reads the innermost scope's snapshot.
///
/// # Errors
///
/// Returns [`ViewportError::ContextMisuse`] when no scope is open, or when the
/// innermost scope's observer has been torn down or dropped.
pub fn try_use_real_viewport() -> Result<ViewportSnapshot, ViewportError> {
    let source = SCOPES.with(|scopes| scopes.borrow().last().map(|(_, source)| source.clone()));
    source
        .and_then(|source| source.upgrade())
        .and_then(|shared| shared.scoped_snapshot())
        .ok_or(ViewportError::ContextMisuse)
}

/// Reads the innermost scope's snapshot.
///
/// # Panics
///
/// Panics when no scope is open, so misuse surfaces during development instead of
/// silently yielding empty values.
#[must_use]
pub fn use_real_viewport() -> ViewportSnapshot {
    match try_use_real_viewport() {
        Ok(snapshot) => snapshot,
        Err(err) => panic!("{err}"),
    }
}
