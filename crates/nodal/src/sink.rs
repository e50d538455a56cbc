//! The subscription sink: per-node broadcaster (spec §4.7).
//!
//! Multiplexes one node's emissions to many observers. Runs an init hook
//! exactly once when the first subscriber arrives and a teardown hook
//! exactly once when the last one leaves — this is what couples a
//! `ComputedValue`'s dependency subscriptions to "is anyone watching me".

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::error::NodalError;
use crate::subscription::{BoxedObserver, Subscription};

struct Hooks {
    init: Option<Box<dyn FnMut()>>,
    teardown: Option<Box<dyn FnMut()>>,
    active: usize,
}

struct SubscriberSlot<T> {
    id: u64,
    live: Rc<Cell<bool>>,
    observer: Rc<RefCell<BoxedObserver<T>>>,
}

struct SinkState<T> {
    subscribers: RefCell<Vec<SubscriberSlot<T>>>,
    next_id: Cell<u64>,
    hooks: RefCell<Hooks>,
}

/// Owns the subscriber list for one node. Cheaply cloneable (an `Rc` of
/// shared state) so a [`Subscription`]'s unsubscribe closure can hold a weak
/// grip on it independent of the owning node's lifetime.
pub(crate) struct Sink<T> {
    state: Rc<SinkState<T>>,
}

impl<T> Clone for Sink<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: 'static> Sink<T> {
    /// A sink with no init/teardown hooks — used by source nodes, which are
    /// always valid and never need to lazily activate anything.
    pub(crate) fn new() -> Self {
        Self::with_hooks(None, None)
    }

    /// A sink whose `init` hook runs once when the first subscriber
    /// arrives and whose `teardown` hook runs once when the last one
    /// leaves. Used by `ComputedValue` to subscribe/unsubscribe its own
    /// dependency edges in step with its own watched-ness.
    pub(crate) fn with_hooks(
        init: Option<Box<dyn FnMut()>>,
        teardown: Option<Box<dyn FnMut()>>,
    ) -> Self {
        Self {
            state: Rc::new(SinkState {
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                hooks: RefCell::new(Hooks {
                    init,
                    teardown,
                    active: 0,
                }),
            }),
        }
    }

    pub(crate) fn is_watched(&self) -> bool {
        self.state.hooks.borrow().active > 0
    }

    /// Subscribe `observer`, replaying `current()` to it synchronously
    /// before returning. `current` is only evaluated after the init hook
    /// (if any) has had a chance to run, so a `ComputedValue`'s first
    /// subscriber sees a value that reflects its just-activated
    /// dependencies.
    pub(crate) fn subscribe_with(
        &self,
        mut observer: BoxedObserver<T>,
        current: impl FnOnce() -> T,
    ) -> Subscription {
        self.state.subscribers.borrow_mut().retain(|s| s.live.get());

        let was_unwatched = self.state.hooks.borrow().active == 0;
        if was_unwatched {
            let mut hooks = self.state.hooks.borrow_mut();
            if let Some(init) = hooks.init.as_mut() {
                init();
            }
        }

        let value = current();
        observer.next(&value);

        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        let live = Rc::new(Cell::new(true));
        self.state.subscribers.borrow_mut().push(SubscriberSlot {
            id,
            live: Rc::clone(&live),
            observer: Rc::new(RefCell::new(observer)),
        });
        self.state.hooks.borrow_mut().active += 1;

        let state = Rc::clone(&self.state);
        Subscription::new(live, move || {
            let was_live = {
                let mut subs = state.subscribers.borrow_mut();
                if let Some(slot) = subs.iter_mut().find(|s| s.id == id) {
                    let was = slot.live.get();
                    slot.live.set(false);
                    was
                } else {
                    false
                }
            };
            if was_live {
                let mut hooks = state.hooks.borrow_mut();
                hooks.active -= 1;
                if hooks.active == 0 {
                    if let Some(teardown) = hooks.teardown.as_mut() {
                        teardown();
                    }
                }
            }
        })
    }

    /// Subscribe a no-argument callback, used by [`crate::edge::Edge`] to
    /// watch a producer without caring about its value type.
    pub(crate) fn subscribe_erased(&self, on_next: Rc<dyn Fn()>, current: impl FnOnce() -> T) -> Subscription {
        let observer = move |_: &T| on_next();
        self.subscribe_with(crate::subscription::IntoObserver::into_observer(observer), current)
    }

    /// Fan out `value` to all live subscribers in registration order.
    ///
    /// A panicking subscriber does not stop the remaining ones (spec §4.7,
    /// §7 `ObserverFailure`): every live subscriber still gets the value,
    /// and the first panic encountered is re-raised once fan-out completes.
    pub(crate) fn emit_next(&self, value: &T) {
        let snapshot: Vec<_> = self
            .state
            .subscribers
            .borrow()
            .iter()
            .map(|s| (Rc::clone(&s.live), Rc::clone(&s.observer)))
            .collect();

        let mut first_panic = None;
        for (live, observer) in snapshot {
            if !live.get() {
                continue;
            }
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                observer.borrow_mut().next(value);
            }));
            if let Err(payload) = result {
                if first_panic.is_none() {
                    first_panic = Some(NodalError::observer_failure_from_panic(payload.as_ref()));
                }
            }
        }
        if let Some(err) = first_panic {
            panic::resume_unwind(Box::new(err));
        }
    }

    /// Deliver a terminal `error` to every currently-live subscriber. Each
    /// recipient is marked closed afterward — no further `next` is ever
    /// delivered to it, matching the observer protocol's "no further next
    /// after error" rule.
    pub(crate) fn emit_error(&self, err: &NodalError) {
        let snapshot: Vec<_> = self
            .state
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.live.get())
            .map(|s| (Rc::clone(&s.live), Rc::clone(&s.observer)))
            .collect();

        let mut first_panic = None;
        for (live, observer) in snapshot {
            if !live.get() {
                continue;
            }
            live.set(false);
            let err = err.clone();
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                observer.borrow_mut().error(err);
            }));
            if let Err(payload) = result {
                if first_panic.is_none() {
                    first_panic = Some(NodalError::observer_failure_from_panic(payload.as_ref()));
                }
            }
        }
        if let Some(err) = first_panic {
            panic::resume_unwind(Box::new(err));
        }
    }
}
