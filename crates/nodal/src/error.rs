//! Error taxonomy for the reactive value graph.
//!
//! Mirrors the three failure modes a value graph can hit: a programmer
//! error in edge lifecycle management ([`NodalError::IllegalState`]), a
//! panicking user `compute` closure ([`NodalError::ComputeFailure`]), and a
//! panicking subscriber callback ([`NodalError::ObserverFailure`]).

use std::any::Any;
use std::fmt;

use thiserror::Error;

/// Errors surfaced by the reactive core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodalError {
    /// A [`crate::edge`] precondition was violated: `watch()` on an
    /// already-watched edge, or `unwatch()` on one that isn't watching.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// A `computed()` closure panicked while recomputing.
    ///
    /// Delivered to subscribers via the observer protocol's `error()`
    /// capability when the recompute was push-driven (an upstream write
    /// triggered it). When the recompute was caused by a direct `get()` or
    /// `validate()` call, the original panic is resumed instead and this
    /// variant is never constructed for that path.
    #[error("compute function panicked: {0}")]
    ComputeFailure(String),

    /// A subscriber's `next`/`error`/`complete` callback panicked.
    ///
    /// Other subscribers in the same fan-out still receive their
    /// notification; this is surfaced to the caller of the write that
    /// triggered the fan-out, after fan-out completes.
    #[error("observer callback panicked: {0}")]
    ObserverFailure(String),
}

impl NodalError {
    /// Build a [`NodalError::ComputeFailure`] from a caught panic payload.
    #[must_use]
    pub(crate) fn compute_failure_from_panic(payload: &(dyn Any + Send + 'static)) -> Self {
        Self::ComputeFailure(panic_message(payload))
    }

    /// Build a [`NodalError::ObserverFailure`] from a caught panic payload.
    #[must_use]
    pub(crate) fn observer_failure_from_panic(payload: &(dyn Any + Send + 'static)) -> Self {
        Self::ObserverFailure(panic_message(payload))
    }
}

fn panic_message(payload: &(dyn Any + Send + 'static)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Process-wide-unique identifier assigned to every node at construction,
/// used only for [`fmt::Debug`] output (not for dependency identity, which
/// uses pointer equality — see `crate::erased`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        use std::cell::Cell;
        thread_local! {
            static COUNTER: Cell<u64> = const { Cell::new(0) };
        }
        COUNTER.with(|c| {
            let id = c.get();
            c.set(id + 1);
            NodeId(id)
        })
    }
}
