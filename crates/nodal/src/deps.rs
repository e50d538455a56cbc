//! Dependency set: the minimal, sweep-pruned collection of edges a
//! `ComputedValue` currently depends on (spec §4.3).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::edge::Edge;
use crate::erased::ErasedValue;
use crate::error::NodalError;

/// Tracks which producers a computed node currently reads.
///
/// Each recompute opens a new "sweep": every producer touched during that
/// recompute either reuses its existing [`Edge`] (if already present) or
/// gets a fresh one, and anything left over from the previous sweep — a
/// producer that used to be read on some branch that wasn't taken this time
/// — is dropped. This is what keeps a conditional `if cond.get() { a.get() }
/// else { b.get() }` computed node depending on only one of `a`/`b` at a
/// time (invariant #3).
pub(crate) struct DependencySet {
    edges: RefCell<Vec<Edge>>,
    sweep: Cell<u64>,
}

impl DependencySet {
    pub(crate) fn new() -> Self {
        Self {
            edges: RefCell::new(Vec::new()),
            sweep: Cell::new(0),
        }
    }

    /// Begin a new recording sweep. Call once at the start of each
    /// recompute, before the `compute` closure runs.
    pub(crate) fn begin_sweep(&self) -> u64 {
        let next = self.sweep.get() + 1;
        self.sweep.set(next);
        next
    }

    /// Record that `producer` was read during the current sweep, reusing
    /// its edge if one already exists.
    pub(crate) fn record(&self, producer: Rc<dyn ErasedValue>, sweep: u64) {
        let mut edges = self.edges.borrow_mut();
        if let Some(edge) = edges.iter().find(|e| e.producer_ptr_eq(&producer)) {
            edge.set_record_version(sweep);
            edge.refresh();
            return;
        }
        edges.push(Edge::new(producer, sweep));
    }

    /// Drop every edge not touched during `sweep`, unwatching it first if
    /// necessary. Call once after the `compute` closure returns.
    pub(crate) fn prune(&self, sweep: u64) -> Result<(), NodalError> {
        let mut edges = self.edges.borrow_mut();
        let mut err = None;
        edges.retain(|edge| {
            if edge.record_version() == sweep {
                return true;
            }
            if edge.is_watching() {
                if let Err(e) = edge.unwatch() {
                    err.get_or_insert(e);
                }
            }
            false
        });
        match err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// True iff every current edge is valid (spec §3's "own state
    /// consistent with dependencies").
    pub(crate) fn all_valid(&self) -> bool {
        self.edges.borrow().iter().all(Edge::is_valid)
    }

    /// Validate every edge, returning true if any of them reports a version
    /// change (meaning the owning computed node must recompute).
    pub(crate) fn revalidate(&self) -> bool {
        let mut any_changed = false;
        for edge in self.edges.borrow().iter() {
            if edge.validate() {
                any_changed = true;
            }
        }
        any_changed
    }

    /// Subscribe `callback` to every edge not already watching. Idempotent:
    /// safe to call after a sweep that already watched some edges via
    /// `watch_all_if` elsewhere, or when no edges are new.
    pub(crate) fn watch_all(&self, callback: &Rc<dyn Fn()>) -> Result<(), NodalError> {
        for edge in self.edges.borrow().iter() {
            if !edge.is_watching() {
                edge.watch(Rc::clone(callback))?;
            }
        }
        Ok(())
    }

    /// Unsubscribe every watching edge.
    pub(crate) fn unwatch_all(&self) -> Result<(), NodalError> {
        for edge in self.edges.borrow().iter() {
            if edge.is_watching() {
                edge.unwatch()?;
            }
        }
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.edges.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;

    struct FakeProducer {
        version: StdCell<u64>,
    }

    impl ErasedValue for FakeProducer {
        fn version(&self) -> u64 {
            self.version.get()
        }
        fn is_valid(&self) -> bool {
            true
        }
        fn validate(&self) {}
        fn is_watched(&self) -> bool {
            false
        }
        fn subscribe_erased(self: Rc<Self>, _on_next: Rc<dyn Fn()>) -> crate::subscription::Subscription {
            crate::subscription::Subscription::new(Rc::new(StdCell::new(false)), || {})
        }
    }

    #[test]
    fn prune_drops_edges_not_touched_this_sweep() {
        let deps = DependencySet::new();
        let a: Rc<dyn ErasedValue> = Rc::new(FakeProducer {
            version: StdCell::new(0),
        });
        let b: Rc<dyn ErasedValue> = Rc::new(FakeProducer {
            version: StdCell::new(0),
        });

        let sweep1 = deps.begin_sweep();
        deps.record(Rc::clone(&a), sweep1);
        deps.record(Rc::clone(&b), sweep1);
        deps.prune(sweep1).unwrap();
        assert_eq!(deps.edges.borrow().len(), 2);

        let sweep2 = deps.begin_sweep();
        deps.record(Rc::clone(&a), sweep2);
        deps.prune(sweep2).unwrap();
        assert_eq!(deps.edges.borrow().len(), 1);
    }

    #[test]
    fn record_reuses_existing_edge_for_same_producer() {
        let deps = DependencySet::new();
        let a: Rc<dyn ErasedValue> = Rc::new(FakeProducer {
            version: StdCell::new(0),
        });

        let sweep1 = deps.begin_sweep();
        deps.record(Rc::clone(&a), sweep1);
        deps.prune(sweep1).unwrap();

        let sweep2 = deps.begin_sweep();
        deps.record(Rc::clone(&a), sweep2);
        deps.prune(sweep2).unwrap();
        assert_eq!(deps.edges.borrow().len(), 1);
    }
}
