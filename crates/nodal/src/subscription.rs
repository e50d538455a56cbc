//! The observer protocol (spec §6) and the subscription handle it returns.
//!
//! Follows the ES-Observable shape: an observer exposes up to three
//! capabilities — `next`, `error`, `complete` — and `subscribe` returns a
//! `Subscription` with an idempotent `unsubscribe()` and a `closed` query.
//! `Subscription` is an RAII guard: dropping it unsubscribes, same as the
//! teacher's own subscription handle (an owner that stores its
//! `Subscription`s and is itself dropped tears down its callbacks with it,
//! matching spec §1's "teardown ... when an owner is garbage-collected").
//! `unsubscribe()` stays idempotent so calling it explicitly before drop
//! (scenario S6) and the eventual drop don't double-act.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::NodalError;

/// A subscriber of a [`crate::value::Value`]: up to three capability
/// callbacks, matching the ES-Observable `next`/`error`/`complete` shape.
pub(crate) trait ObserverLike<T> {
    fn next(&mut self, value: &T);
    fn error(&mut self, err: NodalError);
    fn complete(&mut self);
}

pub(crate) type BoxedObserver<T> = Box<dyn ObserverLike<T>>;

/// A concrete observer built from zero or more of the three capabilities.
///
/// Missing capabilities are no-ops: a bare `Observer::on_next(f)` silently
/// discards `error`/`complete` notifications, exactly like a consumer that
/// only supplied a single positional `next` callable.
pub struct Observer<T> {
    next: Option<Box<dyn FnMut(&T)>>,
    error: Option<Box<dyn FnMut(NodalError)>>,
    complete: Option<Box<dyn FnMut()>>,
}

impl<T> Default for Observer<T> {
    fn default() -> Self {
        Self {
            next: None,
            error: None,
            complete: None,
        }
    }
}

impl<T> Observer<T> {
    /// An observer that only reacts to `next`.
    #[must_use]
    pub fn on_next(f: impl FnMut(&T) + 'static) -> Self {
        Self {
            next: Some(Box::new(f)),
            ..Self::default()
        }
    }

    /// Attach an `error` capability, builder-style.
    #[must_use]
    pub fn with_error(mut self, f: impl FnMut(NodalError) + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Attach a `complete` capability, builder-style.
    #[must_use]
    pub fn with_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }
}

impl<T> ObserverLike<T> for Observer<T> {
    fn next(&mut self, value: &T) {
        if let Some(f) = self.next.as_mut() {
            f(value);
        }
    }

    fn error(&mut self, err: NodalError) {
        if let Some(f) = self.error.as_mut() {
            f(err);
        }
    }

    fn complete(&mut self) {
        if let Some(f) = self.complete.as_mut() {
            f();
        }
    }
}

/// Converts application-supplied callables into the boxed observer form the
/// sink stores internally. Implemented for [`Observer<T>`] itself and,
/// blanket, for any bare `FnMut(&T)` closure — the "one positional callable"
/// shape spec §6 allows as shorthand for "just a `next`".
pub trait IntoObserver<T> {
    #[doc(hidden)]
    fn into_observer(self) -> BoxedObserver<T>;
}

impl<T: 'static> IntoObserver<T> for Observer<T> {
    fn into_observer(self) -> BoxedObserver<T> {
        Box::new(self)
    }
}

impl<T, F> IntoObserver<T> for F
where
    F: FnMut(&T) + 'static,
{
    fn into_observer(self) -> BoxedObserver<T> {
        Box::new(Observer::on_next(self))
    }
}

/// Handle returned by `subscribe`. `unsubscribe()` is idempotent;
/// `is_closed()` reports whether it has run. Unsubscribes automatically
/// when dropped — hold onto it (e.g. in a `Vec<Subscription>`) for as long
/// as the subscription should stay live.
pub struct Subscription {
    closed: Rc<Cell<bool>>,
    action: Cell<Option<Box<dyn FnOnce()>>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.closed.get())
            .finish()
    }
}

impl Subscription {
    pub(crate) fn new(closed: Rc<Cell<bool>>, action: impl FnOnce() + 'static) -> Self {
        Self {
            closed,
            action: Cell::new(Some(Box::new(action))),
        }
    }

    /// Stop future deliveries to this subscription. Safe to call more than
    /// once; only the first call has an effect.
    pub fn unsubscribe(&self) {
        if self.closed.get() {
            return;
        }
        self.closed.set(true);
        if let Some(action) = self.action.take() {
            action();
        }
    }

    /// True once `unsubscribe()` has run (directly, or because the upstream
    /// node delivered a terminal `error`/`complete`).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
