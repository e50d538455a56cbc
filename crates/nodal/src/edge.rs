//! A single consumer→producer dependency edge (spec §4.2).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::NodalError;
use crate::erased::ErasedValue;
use crate::subscription::Subscription;

pub(crate) struct Edge {
    producer: Rc<dyn ErasedValue>,
    seen_version: Cell<u64>,
    record_version: Cell<u64>,
    subscription: RefCell<Option<Subscription>>,
}

impl Edge {
    pub(crate) fn new(producer: Rc<dyn ErasedValue>, sweep: u64) -> Self {
        let seen_version = producer.version();
        Self {
            producer,
            seen_version: Cell::new(seen_version),
            record_version: Cell::new(sweep),
            subscription: RefCell::new(None),
        }
    }

    pub(crate) fn producer_ptr_eq(&self, other: &Rc<dyn ErasedValue>) -> bool {
        std::rc::Rc::ptr_eq(&self.producer, other)
    }

    pub(crate) fn record_version(&self) -> u64 {
        self.record_version.get()
    }

    pub(crate) fn set_record_version(&self, sweep: u64) {
        self.record_version.set(sweep);
    }

    /// `producer.version == seen_version` and the producer is itself valid.
    pub(crate) fn is_valid(&self) -> bool {
        self.producer.version() == self.seen_version.get() && self.producer.is_valid()
    }

    /// Ask the producer to bring itself up to date, then report whether its
    /// version moved since we last saw it.
    pub(crate) fn validate(&self) -> bool {
        self.producer.validate();
        let current = self.producer.version();
        if current != self.seen_version.get() {
            self.seen_version.set(current);
            true
        } else {
            false
        }
    }

    pub(crate) fn refresh(&self) {
        self.seen_version.set(self.producer.version());
    }

    pub(crate) fn is_watching(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    /// Subscribe `callback` to the producer. Errors if already watching.
    pub(crate) fn watch(&self, callback: Rc<dyn Fn()>) -> Result<(), NodalError> {
        let mut slot = self.subscription.borrow_mut();
        if slot.is_some() {
            return Err(NodalError::IllegalState(
                "edge is already watched".to_string(),
            ));
        }
        *slot = Some(Rc::clone(&self.producer).subscribe_erased(callback));
        Ok(())
    }

    /// Cancel the edge's subscription. Errors if not currently watching.
    pub(crate) fn unwatch(&self) -> Result<(), NodalError> {
        let mut slot = self.subscription.borrow_mut();
        match slot.take() {
            Some(sub) => {
                sub.unsubscribe();
                Ok(())
            }
            None => Err(NodalError::IllegalState(
                "edge is not watched".to_string(),
            )),
        }
    }
}
