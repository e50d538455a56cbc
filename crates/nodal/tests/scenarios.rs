//! Acceptance tests for the literal scenarios in spec §8 (S1–S6).

use std::cell::RefCell;
use std::rc::Rc;

use nodal::{computed, untracked, writable, Value};

#[test]
fn s1_source_basics() {
    let a = writable(1);
    let received = Rc::new(RefCell::new(Vec::new()));
    let received2 = Rc::clone(&received);
    let _sub = a.subscribe(move |v: &i32| received2.borrow_mut().push(*v));
    assert_eq!(*received.borrow(), vec![1]);

    a.set(1);
    assert_eq!(*received.borrow(), vec![1]);

    a.set(2);
    assert_eq!(*received.borrow(), vec![1, 2]);
    assert_eq!(a.version(), 1);
}

#[test]
fn s2_derived_basics() {
    let a = writable(3);
    let a2 = a.clone();
    let b = computed(move || a2.get() * 2);
    assert_eq!(b.get(), 6);
    assert_eq!(b.version(), 0);

    a.set(4);
    assert_eq!(b.get(), 8);
    assert_eq!(b.version(), 1);
}

#[test]
fn s3_silent_convergence() {
    let a = writable(1);
    let a2 = a.clone();
    let b = computed(move || a2.get() < 10);
    assert_eq!(b.get(), true);
    assert_eq!(b.version(), 0);

    a.set(2);
    assert!(!b.is_valid());
    assert_eq!(b.get(), true);
    assert_eq!(b.version(), 0);
}

#[test]
fn s4_diamond_fires_observer_exactly_once() {
    let a = writable(1);
    let b = {
        let a = a.clone();
        computed(move || a.get() + 1)
    };
    let c = {
        let (a, b) = (a.clone(), b.clone());
        computed(move || a.get() + b.get())
    };
    let received = Rc::new(RefCell::new(Vec::new()));
    let received2 = Rc::clone(&received);
    let _sub = c.subscribe(move |v: &i32| received2.borrow_mut().push(*v));
    assert_eq!(*received.borrow(), vec![3]);

    a.set(2);
    assert_eq!(*received.borrow(), vec![3, 5]);
}

#[test]
fn s5_conditional_rewiring() {
    let a = writable(1);
    let b = writable(2);
    let cond = writable(false);
    let out = {
        let (cond, a, b) = (cond.clone(), a.clone(), b.clone());
        computed(move || if cond.get() { a.get() } else { b.get() })
    };
    let received = Rc::new(RefCell::new(Vec::new()));
    let received2 = Rc::clone(&received);
    let _sub = out.subscribe(move |v: &i32| received2.borrow_mut().push(*v));
    assert_eq!(*received.borrow(), vec![2]);

    b.set(3);
    assert_eq!(*received.borrow(), vec![2, 3]);

    cond.set(true);
    assert_eq!(*received.borrow(), vec![2, 3, 1]);

    b.set(99);
    assert_eq!(*received.borrow(), vec![2, 3, 1]);
}

#[test]
fn s6_watch_lifecycle() {
    let a = writable(1);
    let a2 = a.clone();
    let b = computed(move || a2.get() * 2);

    assert!(!a.is_watched());

    let sub = b.subscribe(|_: &i32| {});
    assert!(a.is_watched());

    sub.unsubscribe();
    assert!(!a.is_watched());
}

#[test]
fn untracked_read_does_not_register_a_dependency() {
    let a = writable(1);
    let gate = writable(10);
    let calls = Rc::new(RefCell::new(0));
    let calls2 = Rc::clone(&calls);
    let (av, gatev) = (a.clone(), gate.clone());
    let derived = computed(move || {
        *calls2.borrow_mut() += 1;
        av.get() + untracked(|| gatev.get())
    });

    assert_eq!(derived.get(), 11);
    gate.set(20);
    // `gate` was read untracked, so it never became a dependency.
    assert_eq!(derived.get(), 11);
    assert_eq!(*calls.borrow(), 1);

    a.set(2);
    assert_eq!(derived.get(), 22);
}

#[test]
fn readonly_view_exposes_get_and_subscribe_but_no_set() {
    let a = writable(5);
    let ro = a.as_readonly();
    assert_eq!(ro.get(), 5);

    let received = Rc::new(RefCell::new(Vec::new()));
    let received2 = Rc::clone(&received);
    let _sub = ro.subscribe(move |v: &i32| received2.borrow_mut().push(*v));
    a.set(6);
    assert_eq!(*received.borrow(), vec![5, 6]);
}
