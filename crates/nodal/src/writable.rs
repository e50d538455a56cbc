//! Source node: holds a value directly, with no dependencies of its own
//! (spec §4.5).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::erased::ErasedValue;
use crate::error::NodeId;
use crate::sink::Sink;
use crate::subscription::{BoxedObserver, IntoObserver, Subscription};
use crate::value::{DynValue, Value};

struct Inner<T> {
    id: NodeId,
    value: RefCell<T>,
    version: Cell<u64>,
    sink: Sink<T>,
}

/// A writable source node. Every [`WritableValue::set`] that changes the
/// value (per [`PartialEq`]) bumps the version counter and fans the new
/// value out to subscribers synchronously.
pub struct WritableValue<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for WritableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for WritableValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WritableValue")
            .field("id", &self.inner.id)
            .field("value", &self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> WritableValue<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: NodeId::next(),
                value: RefCell::new(initial),
                version: Cell::new(0),
                sink: Sink::new(),
            }),
        }
    }

    /// Overwrite the current value. A no-op (no version bump, no emission)
    /// if `next` equals the current value under [`PartialEq`] (spec §4.1
    /// "deep-equality predicate").
    pub fn set(&self, next: T) {
        let changed = *self.inner.value.borrow() != next;
        if !changed {
            return;
        }
        *self.inner.value.borrow_mut() = next;
        self.inner.version.set(self.inner.version.get() + 1);
        #[cfg(feature = "tracing")]
        tracing::trace!(node = %self.inner.id, version = self.inner.version.get(), "writable value changed");
        let value = self.inner.value.borrow();
        self.inner.sink.emit_next(&value);
    }

    /// Update the value via `f`, applied to a clone of the current value.
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        let current = self.inner.value.borrow().clone();
        self.set(f(current));
    }
}

impl<T: Clone + PartialEq + 'static> Value<T> for WritableValue<T> {
    fn get(&self) -> T {
        crate::context::register(self.as_erased());
        self.inner.value.borrow().clone()
    }

    fn version(&self) -> u64 {
        self.inner.version.get()
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn validate(&self) {}

    fn is_watched(&self) -> bool {
        self.inner.sink.is_watched()
    }

    fn subscribe(&self, observer: impl IntoObserver<T>) -> Subscription {
        self.subscribe_boxed(observer.into_observer())
    }
}

impl<T: Clone + PartialEq + 'static> WritableValue<T> {
    fn subscribe_boxed(&self, observer: BoxedObserver<T>) -> Subscription {
        let inner = Rc::clone(&self.inner);
        self.inner
            .sink
            .subscribe_with(observer, move || inner.value.borrow().clone())
    }

    fn as_erased(&self) -> Rc<dyn ErasedValue> {
        Rc::clone(&self.inner) as Rc<dyn ErasedValue>
    }
}

impl<T: Clone + PartialEq + 'static> DynValue<T> for WritableValue<T> {
    fn get_dyn(&self) -> T {
        Value::get(self)
    }

    fn version_dyn(&self) -> u64 {
        Value::version(self)
    }

    fn is_valid_dyn(&self) -> bool {
        Value::is_valid(self)
    }

    fn validate_dyn(&self) {
        Value::validate(self);
    }

    fn is_watched_dyn(&self) -> bool {
        Value::is_watched(self)
    }

    fn subscribe_dyn(&self, observer: BoxedObserver<T>) -> Subscription {
        self.subscribe_boxed(observer)
    }
}

impl<T: Clone + PartialEq + 'static> ErasedValue for Inner<T> {
    fn version(&self) -> u64 {
        self.version.get()
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn validate(&self) {}

    fn is_watched(&self) -> bool {
        self.sink.is_watched()
    }

    fn subscribe_erased(self: Rc<Self>, on_next: Rc<dyn Fn()>) -> Subscription {
        let this = Rc::clone(&self);
        self.sink
            .subscribe_erased(on_next, move || this.value.borrow().clone())
    }
}
