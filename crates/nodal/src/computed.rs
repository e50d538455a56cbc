//! Derived node: lazily recomputed from other nodes, memoized between
//! changes (spec §4.4).

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::context::{self, RecordingSink};
use crate::deps::DependencySet;
use crate::erased::ErasedValue;
use crate::error::{NodalError, NodeId};
use crate::sink::Sink;
use crate::subscription::{BoxedObserver, IntoObserver, Subscription};
use crate::value::{DynValue, Value};

struct Inner<T> {
    id: NodeId,
    compute: RefCell<Box<dyn FnMut() -> T>>,
    value: RefCell<Option<T>>,
    version: Cell<u64>,
    valid: Cell<bool>,
    current_sweep: Cell<u64>,
    recomputing: Cell<bool>,
    deps: DependencySet,
    sink: Sink<T>,
    on_changed: Rc<dyn Fn()>,
    self_weak: Weak<Inner<T>>,
}

/// A derived node. `compute` runs on first read (or first subscribe) and
/// on every subsequent read/notification where at least one transitive
/// dependency has changed; its result is cached until then (spec §3).
pub struct ComputedValue<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for ComputedValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ComputedValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputedValue")
            .field("id", &self.inner.id)
            .field("valid", &self.inner.valid.get())
            .field("version", &self.inner.version.get())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + 'static> ComputedValue<T> {
    pub(crate) fn new(compute: impl FnMut() -> T + 'static) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<Inner<T>>| {
            let on_changed: Rc<dyn Fn()> = {
                let weak = weak.clone();
                Rc::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_dependency_changed();
                    }
                })
            };
            let init: Weak<Inner<T>> = weak.clone();
            let teardown: Weak<Inner<T>> = weak.clone();
            Inner {
                id: NodeId::next(),
                compute: RefCell::new(Box::new(compute)),
                value: RefCell::new(None),
                version: Cell::new(0),
                valid: Cell::new(false),
                current_sweep: Cell::new(0),
                recomputing: Cell::new(false),
                deps: DependencySet::new(),
                sink: Sink::with_hooks(
                    Some(Box::new(move || {
                        if let Some(inner) = init.upgrade() {
                            inner.activate();
                        }
                    })),
                    Some(Box::new(move || {
                        if let Some(inner) = teardown.upgrade() {
                            inner.deactivate();
                        }
                    })),
                ),
                on_changed,
                self_weak: weak.clone(),
            }
        });
        Self { inner }
    }

    fn subscribe_boxed(&self, observer: BoxedObserver<T>) -> Subscription {
        let inner = Rc::clone(&self.inner);
        self.inner.sink.subscribe_with(observer, move || {
            inner
                .value
                .borrow()
                .clone()
                .expect("activate() computes a value before current() is read")
        })
    }

    fn as_erased(&self) -> Rc<dyn ErasedValue> {
        Rc::clone(&self.inner) as Rc<dyn ErasedValue>
    }
}

impl<T: Clone + PartialEq + 'static> Inner<T> {
    fn needs_recompute(&self) -> bool {
        !self.valid.get() || self.deps.revalidate()
    }

    /// Run `compute`, recording a fresh dependency sweep, and update cached
    /// state. Returns the new value and whether it differs from the
    /// previous one (per `PartialEq`). When `ensure_watch` is set, every
    /// dependency touched this sweep is subscribed to `on_changed` —
    /// idempotent for edges already watching.
    ///
    /// Re-entrant: if a `compute` closure reads this same node, directly or
    /// transitively, while it is already recomputing, that inner read fails
    /// with `NodalError::IllegalState` instead of recursing (spec §9's
    /// optional re-entrancy guard).
    fn recompute(&self, ensure_watch: bool) -> Result<(T, bool), Box<dyn std::any::Any + Send>> {
        if self.recomputing.get() {
            let err: Box<dyn std::any::Any + Send> = Box::new(NodalError::IllegalState(format!(
                "computed value {} read itself while already recomputing",
                self.id
            )));
            return Err(err);
        }

        let sweep = self.deps.begin_sweep();
        self.current_sweep.set(sweep);
        #[cfg(feature = "tracing")]
        tracing::trace!(node = %self.id, sweep, "computed value recording sweep");

        self.recomputing.set(true);
        let recorder: Weak<dyn RecordingSink> = self.self_weak.clone();
        let guard = context::push_recording(recorder);
        let result = panic::catch_unwind(AssertUnwindSafe(|| (self.compute.borrow_mut())()));
        drop(guard);
        self.recomputing.set(false);

        match result {
            Ok(new_value) => {
                self.deps
                    .prune(sweep)
                    .expect("dependency edge lifecycle invariant violated");
                if ensure_watch {
                    self.deps
                        .watch_all(&self.on_changed)
                        .expect("dependency edge lifecycle invariant violated");
                }
                // The very first compute has nothing to compare against and
                // never bumps `version` (spec scenario S2: a freshly
                // computed node reports version 0).
                let is_first = self.value.borrow().is_none();
                let changed = !is_first && self.value.borrow().as_ref() != Some(&new_value);
                *self.value.borrow_mut() = Some(new_value.clone());
                if changed {
                    self.version.set(self.version.get() + 1);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(node = %self.id, version = self.version.get(), "computed value changed");
                }
                self.valid.set(true);
                Ok((new_value, changed))
            }
            Err(payload) => {
                self.valid.set(false);
                #[cfg(feature = "tracing")]
                tracing::debug!(node = %self.id, "compute panicked, cached value retained");
                Err(payload)
            }
        }
    }

    /// Pull path (spec §7): a panicking `compute` propagates directly to
    /// the caller of `get`/`validate`.
    fn pull(&self) -> T {
        if self.needs_recompute() {
            match self.recompute(self.sink.is_watched()) {
                Ok((value, _)) => value,
                Err(payload) => panic::resume_unwind(payload),
            }
        } else {
            self.value
                .borrow()
                .clone()
                .expect("valid implies a cached value is present")
        }
    }

    /// Push path: a watched dependency just notified us. A panicking
    /// `compute` here is delivered through the observer protocol instead of
    /// propagating into the upstream write that triggered it.
    ///
    /// A node can watch more than one of its own dependencies' shared
    /// sources, so more than one edge callback can fire for the same
    /// upstream write (spec §5's diamond case). `needs_recompute()` is the
    /// short-circuit: by the time a later edge's callback runs, an earlier
    /// one may have already driven a pull-path recompute (directly, or
    /// transitively through a dependent reading this node) that refreshed
    /// every edge's `seen_version`, leaving nothing left to do here.
    fn on_dependency_changed(&self) {
        if !self.needs_recompute() {
            return;
        }
        match self.recompute(true) {
            Ok((value, changed)) => {
                if changed {
                    self.sink.emit_next(&value);
                }
            }
            Err(payload) => {
                let err = payload
                    .downcast::<NodalError>()
                    .map(|boxed| *boxed)
                    .unwrap_or_else(|payload| {
                        NodalError::compute_failure_from_panic(payload.as_ref())
                    });
                self.sink.emit_error(&err);
            }
        }
    }

    /// Sink init hook: runs once when the first subscriber attaches.
    fn activate(&self) {
        if self.needs_recompute() {
            if let Err(payload) = self.recompute(true) {
                panic::resume_unwind(payload);
            }
        } else {
            self.deps
                .watch_all(&self.on_changed)
                .expect("dependency edge lifecycle invariant violated");
        }
    }

    /// Sink teardown hook: runs once when the last subscriber leaves.
    fn deactivate(&self) {
        self.deps
            .unwatch_all()
            .expect("dependency edge lifecycle invariant violated");
    }
}

impl<T: Clone + PartialEq + 'static> Value<T> for ComputedValue<T> {
    fn get(&self) -> T {
        context::register(self.as_erased());
        self.inner.pull()
    }

    fn version(&self) -> u64 {
        ErasedValue::version(self.inner.as_ref())
    }

    fn is_valid(&self) -> bool {
        ErasedValue::is_valid(self.inner.as_ref())
    }

    fn validate(&self) {
        ErasedValue::validate(self.inner.as_ref());
    }

    fn is_watched(&self) -> bool {
        self.inner.sink.is_watched()
    }

    fn subscribe(&self, observer: impl IntoObserver<T>) -> Subscription {
        self.subscribe_boxed(observer.into_observer())
    }
}

impl<T: Clone + PartialEq + 'static> DynValue<T> for ComputedValue<T> {
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

impl<T: Clone + PartialEq + 'static> RecordingSink for Inner<T> {
    fn touch(&self, producer: Rc<dyn ErasedValue>) {
        self.deps.record(producer, self.current_sweep.get());
    }
}

impl<T: Clone + PartialEq + 'static> ErasedValue for Inner<T> {
    fn version(&self) -> u64 {
        self.version.get()
    }

    fn is_valid(&self) -> bool {
        self.valid.get() && self.deps.all_valid()
    }

    fn validate(&self) {
        let _ = self.pull();
    }

    fn is_watched(&self) -> bool {
        self.sink.is_watched()
    }

    fn subscribe_erased(self: Rc<Self>, on_next: Rc<dyn Fn()>) -> Subscription {
        let this = Rc::clone(&self);
        self.sink.subscribe_erased(on_next, move || {
            this.value
                .borrow()
                .clone()
                .expect("activate() computes a value before current() is read")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writable::WritableValue;

    #[test]
    fn memoizes_until_a_dependency_changes() {
        let source = WritableValue::new(2);
        let calls = Rc::new(Cell::new(0));
        let calls2 = Rc::clone(&calls);
        let src = source.clone();
        let doubled = ComputedValue::new(move || {
            calls2.set(calls2.get() + 1);
            src.get() * 2
        });

        assert_eq!(doubled.get(), 4);
        assert_eq!(doubled.get(), 4);
        assert_eq!(calls.get(), 1);

        source.set(3);
        assert_eq!(doubled.get(), 6);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn push_propagates_through_a_diamond_without_glitches() {
        let root = WritableValue::new(1);
        let left = {
            let r = root.clone();
            ComputedValue::new(move || r.get() + 1)
        };
        let right = {
            let r = root.clone();
            ComputedValue::new(move || r.get() * 10)
        };
        let observed = Rc::new(RefCell::new(Vec::new()));
        let observed2 = Rc::clone(&observed);
        let (l, r) = (left.clone(), right.clone());
        let sum = ComputedValue::new(move || l.get() + r.get());
        let _sub = sum.subscribe(move |v: &i32| observed2.borrow_mut().push(*v));

        root.set(2);
        assert_eq!(sum.get(), 23);
        assert_eq!(*observed.borrow(), vec![12, 23]);
    }

    #[test]
    fn diamond_dependency_recomputes_each_node_exactly_once_per_write() {
        let a = WritableValue::new(1);
        let b_calls = Rc::new(Cell::new(0));
        let b_calls2 = Rc::clone(&b_calls);
        let av = a.clone();
        let b = ComputedValue::new(move || {
            b_calls2.set(b_calls2.get() + 1);
            av.get() + 1
        });
        let c_calls = Rc::new(Cell::new(0));
        let c_calls2 = Rc::clone(&c_calls);
        let (av, bv) = (a.clone(), b.clone());
        let c = ComputedValue::new(move || {
            c_calls2.set(c_calls2.get() + 1);
            av.get() + bv.get()
        });
        let _sub = c.subscribe(|_: &i32| {});

        assert_eq!(b_calls.get(), 1);
        assert_eq!(c_calls.get(), 1);

        a.set(2);
        assert_eq!(c.get(), 5);
        assert_eq!(
            b_calls.get(),
            2,
            "b's compute must run exactly once per upstream write, not twice"
        );
        assert_eq!(c_calls.get(), 2);
    }

    #[test]
    fn reading_self_during_compute_raises_illegal_state() {
        let slot: Rc<RefCell<Option<ComputedValue<i32>>>> = Rc::new(RefCell::new(None));
        let slot2 = Rc::clone(&slot);
        let cyclic = ComputedValue::new(move || {
            slot2
                .borrow()
                .as_ref()
                .expect("set right after construction, before the first get()")
                .get()
                + 1
        });
        *slot.borrow_mut() = Some(cyclic.clone());

        let payload =
            panic::catch_unwind(AssertUnwindSafe(|| cyclic.get())).expect_err("must panic");
        let err = payload
            .downcast::<NodalError>()
            .expect("re-entrancy guard panics with a NodalError payload");
        assert!(matches!(*err, NodalError::IllegalState(_)));
    }

    #[test]
    fn conditional_dependency_switches_branch() {
        let flag = WritableValue::new(true);
        let a = WritableValue::new(1);
        let b = WritableValue::new(100);
        let (f, av, bv) = (flag.clone(), a.clone(), b.clone());
        let picked = ComputedValue::new(move || if f.get() { av.get() } else { bv.get() });

        assert_eq!(picked.get(), 1);
        b.set(200);
        assert_eq!(picked.get(), 1);

        flag.set(false);
        assert_eq!(picked.get(), 200);
        a.set(999);
        assert_eq!(picked.get(), 200);
    }
}
