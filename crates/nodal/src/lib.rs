//! A single-threaded reactive value graph: writable sources, derived
//! computed nodes, and an ES-Observable-style subscription protocol, built
//! around a dependency-tracked, glitch-free propagation model.
//!
//! ```
//! use nodal::{computed, writable, Value};
//!
//! let count = writable(1);
//! let doubled = {
//!     let count = count.clone();
//!     computed(move || count.get() * 2)
//! };
//! assert_eq!(doubled.get(), 2);
//! count.set(5);
//! assert_eq!(doubled.get(), 10);
//! ```
//!
//! Nodes are `!Send`/`!Sync` by construction (they hold `Rc`/`RefCell`) —
//! confine one graph to one thread; run independent graphs on separate
//! threads if you need concurrency.

#![forbid(unsafe_code)]

mod computed;
mod context;
mod deps;
mod edge;
mod erased;
mod error;
mod readonly;
mod sink;
mod subscription;
mod value;
mod writable;

pub use computed::ComputedValue;
pub use context::untracked;
pub use error::{NodalError, NodeId};
pub use readonly::ReadonlyValue;
pub use subscription::{IntoObserver, Observer, Subscription};
pub use value::{untracked_get, Value};
pub use writable::WritableValue;

/// Construct a new writable source node holding `initial`.
#[must_use]
pub fn writable<T: Clone + PartialEq + 'static>(initial: T) -> WritableValue<T> {
    WritableValue::new(initial)
}

/// Construct a new derived node. `compute` runs lazily: on first read or
/// first subscribe, and again whenever a transitive dependency has
/// changed since the last run.
#[must_use]
pub fn computed<T: Clone + PartialEq + 'static>(
    compute: impl FnMut() -> T + 'static,
) -> ComputedValue<T> {
    ComputedValue::new(compute)
}

impl<T: Clone + PartialEq + 'static> WritableValue<T> {
    /// Wrap this node in a read-only view that exposes `get`/`subscribe`
    /// but no `set`/`update`.
    #[must_use]
    pub fn as_readonly(&self) -> ReadonlyValue<T> {
        ReadonlyValue::new(self.clone())
    }
}

impl<T: Clone + PartialEq + 'static> ComputedValue<T> {
    /// Wrap this node in a read-only view. `ComputedValue` already has no
    /// mutators, so this only matters for uniform typing at API
    /// boundaries that accept `ReadonlyValue<T>`.
    #[must_use]
    pub fn as_readonly(&self) -> ReadonlyValue<T> {
        ReadonlyValue::new(self.clone())
    }
}
