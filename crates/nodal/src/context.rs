//! The ambient recording context (spec §4.1).
//!
//! A process-wide, stack-structured pointer to the `DependencySet` currently
//! recording reads. Reading any [`crate::value::Value`] consults the top of
//! this stack and, if present, registers itself as a dependency. The stack
//! is `thread_local` rather than a single global: this keeps the design
//! correct if a caller confines one graph to one thread while running
//! several independent graphs across threads (spec §9's per-thread
//! fallback), without requiring a context parameter threaded through every
//! call.
//!
//! Nesting is explicit: a `compute` closure that itself reads another
//! `ComputedValue` causes that value's own `record` call to push a second
//! frame. The inner recording never pollutes the outer one because `touch`
//! only ever affects the frame on top of the stack at the time of the read.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::erased::ErasedValue;

/// Implemented by the one type that owns dependency edges: `DependencySet`'s
/// owning `ComputedInner<T>`. Kept separate from [`ErasedValue`] because
/// `touch` is a write operation private to the recording machinery, not
/// part of the public node contract.
pub(crate) trait RecordingSink {
    fn touch(&self, producer: Rc<dyn ErasedValue>);
}

/// `None` marks an `untracked` scope: reads inside it must not register
/// with whatever recording was active before the scope was entered.
type Frame = Option<Weak<dyn RecordingSink>>;

thread_local! {
    static STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// RAII guard returned by [`push_recording`] / [`push_untracked`]. Pops its
/// frame on drop, including during unwinding, so a panicking `compute`
/// still leaves the stack balanced.
pub(crate) struct RecordingGuard {
    _private: (),
}

impl Drop for RecordingGuard {
    fn drop(&mut self) {
        STACK.with(|s| {
            s.borrow_mut().pop();
        });
    }
}

pub(crate) fn push_recording(sink: Weak<dyn RecordingSink>) -> RecordingGuard {
    STACK.with(|s| s.borrow_mut().push(Some(sink)));
    RecordingGuard { _private: () }
}

fn push_untracked() -> RecordingGuard {
    STACK.with(|s| s.borrow_mut().push(None));
    RecordingGuard { _private: () }
}

/// Register `producer` as a dependency of whatever is currently recording,
/// if anything. A no-op outside of any `record`/`untracked` scope.
pub(crate) fn register(producer: Rc<dyn ErasedValue>) {
    STACK.with(|s| {
        let stack = s.borrow();
        if let Some(Some(weak)) = stack.last() {
            if let Some(sink) = weak.upgrade() {
                sink.touch(producer);
            }
        }
    });
}

/// Run `f` with dependency recording suspended, regardless of whether an
/// outer `compute` is currently recording.
///
/// Corresponds to spec §4.1/§6's `untracked(fn)`. See also
/// [`crate::value::untracked_get`] for the `untracked(value)` shape.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _guard = push_untracked();
    f()
}
