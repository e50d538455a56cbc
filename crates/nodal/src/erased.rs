//! Type-erased producer contract.
//!
//! A [`crate::edge::Edge`] records a consumer→producer relationship, but a
//! single `ComputedValue<T>` can depend on producers of many different
//! value types `U1, U2, ...`. Rust generics can't express a
//! heterogeneous collection of `Value<U>` for varying `U`, so the producer
//! side of an edge is stored as `Rc<dyn ErasedValue>`: the non-generic
//! subset of the node contract that dependency bookkeeping actually needs
//! (version, validity, and the ability to subscribe a no-argument callback
//! for push notifications). The typed, ergonomic `Value<T>` trait in
//! `crate::value` is what application code uses directly; every concrete
//! node type implements both.

use std::rc::Rc;

use crate::subscription::Subscription;

/// Object-safe producer contract used for dependency identity, validity
/// checks, and push-driven re-evaluation. See module docs for why this
/// exists alongside the typed `Value<T>` trait.
pub(crate) trait ErasedValue {
    /// Current version counter.
    fn version(&self) -> u64;

    /// True iff the node's cached state is already consistent with all of
    /// its own transitive dependencies (spec §3).
    fn is_valid(&self) -> bool;

    /// Bring the node up to date, recomputing through the dependency chain
    /// as needed.
    fn validate(&self);

    /// True iff at least one external subscriber is attached.
    fn is_watched(&self) -> bool;

    /// Subscribe a no-argument callback invoked on every emission,
    /// discarding the emitted value itself. Used by [`crate::edge::Edge`]
    /// to implement `watch(callback)` from spec §4.2.
    ///
    /// Takes `self: Rc<Self>` rather than `&self` so the returned
    /// subscription's replay-current-value closure can hold an owned,
    /// `'static` handle back onto the node instead of a borrow tied to this
    /// call's stack frame.
    fn subscribe_erased(self: Rc<Self>, on_next: Rc<dyn Fn()>) -> Subscription;
}
