//! Small function-wrapping helpers ("decorators" in the distilled spec's
//! terminology): call-once memoization and single-argument memoization.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

/// Wraps a closure so it runs at most once; later calls return a clone of
/// the first result.
pub struct Once<T> {
    inner: RefCell<OnceState<T>>,
}

enum OnceState<T> {
    Pending(Box<dyn FnOnce() -> T>),
    Done(T),
    Running,
}

impl<T: Clone> Once<T> {
    #[must_use]
    pub fn new(f: impl FnOnce() -> T + 'static) -> Self {
        Self {
            inner: RefCell::new(OnceState::Pending(Box::new(f))),
        }
    }

    /// Run the wrapped closure the first time this is called; every later
    /// call returns a clone of that result without re-running it.
    pub fn call(&self) -> T {
        let state = std::mem::replace(&mut *self.inner.borrow_mut(), OnceState::Running);
        match state {
            OnceState::Done(value) => {
                *self.inner.borrow_mut() = OnceState::Done(value.clone());
                value
            }
            OnceState::Pending(f) => {
                let value = f();
                *self.inner.borrow_mut() = OnceState::Done(value.clone());
                value
            }
            OnceState::Running => unreachable!("Once::call re-entered while running"),
        }
    }
}

/// Wraps a single-argument function with a cache keyed by argument equality.
/// Unlike `ComputedValue`, this has no notion of upstream invalidation — the
/// cache only grows, matching the distilled spec's "automatic memoization
/// ... is a non-goal" for the reactive core, but a welcome convenience for
/// plain pure functions.
pub struct Memoize1<A, R> {
    f: RefCell<Box<dyn FnMut(&A) -> R>>,
    cache: RefCell<HashMap<A, R>>,
}

impl<A: Eq + Hash + Clone, R: Clone> Memoize1<A, R> {
    #[must_use]
    pub fn new(f: impl FnMut(&A) -> R + 'static) -> Self {
        Self {
            f: RefCell::new(Box::new(f)),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn call(&self, arg: A) -> R {
        if let Some(cached) = self.cache.borrow().get(&arg) {
            return cached.clone();
        }
        let result = (self.f.borrow_mut())(&arg);
        self.cache.borrow_mut().insert(arg, result.clone());
        result
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn once_runs_the_closure_a_single_time() {
        let calls = Rc::new(Cell::new(0));
        let calls2 = Rc::clone(&calls);
        let once = Once::new(move || {
            calls2.set(calls2.get() + 1);
            42
        });
        assert_eq!(once.call(), 42);
        assert_eq!(once.call(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn memoize1_caches_per_distinct_argument() {
        let calls = Rc::new(Cell::new(0));
        let calls2 = Rc::clone(&calls);
        let square = Memoize1::new(move |x: &i32| {
            calls2.set(calls2.get() + 1);
            x * x
        });
        assert_eq!(square.call(3), 9);
        assert_eq!(square.call(3), 9);
        assert_eq!(square.call(4), 16);
        assert_eq!(calls.get(), 2);
        assert_eq!(square.cached_len(), 2);
    }
}
