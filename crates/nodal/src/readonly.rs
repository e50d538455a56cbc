//! A read-only view over a [`WritableValue`](crate::writable::WritableValue)
//! or [`ComputedValue`](crate::computed::ComputedValue) (spec §4.6).

use std::rc::Rc;

use crate::subscription::{IntoObserver, Subscription};
use crate::value::{DynValue, Value};

/// Wraps any node behind [`Value<T>`] so it can be handed to callers that
/// must not be able to `set()` it. There is no way to recover the
/// underlying writable/computed handle from a `ReadonlyValue` — this is an
/// API-level guarantee, not a runtime check.
pub struct ReadonlyValue<T> {
    inner: Rc<dyn DynValue<T>>,
}

impl<T> Clone for ReadonlyValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ReadonlyValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadonlyValue").finish_non_exhaustive()
    }
}

impl<T: 'static> ReadonlyValue<T> {
    pub(crate) fn new(source: impl DynValue<T> + 'static) -> Self {
        Self {
            inner: Rc::new(source),
        }
    }
}

impl<T> Value<T> for ReadonlyValue<T> {
    fn get(&self) -> T {
        self.inner.get_dyn()
    }

    fn version(&self) -> u64 {
        self.inner.version_dyn()
    }

    fn is_valid(&self) -> bool {
        self.inner.is_valid_dyn()
    }

    fn validate(&self) {
        self.inner.validate_dyn();
    }

    fn is_watched(&self) -> bool {
        self.inner.is_watched_dyn()
    }

    fn subscribe(&self, observer: impl IntoObserver<T>) -> Subscription {
        self.inner.subscribe_dyn(observer.into_observer())
    }
}
