//! # Mock Framework
//!
//! Utilities for asserting on state notifications.
//!
//! Create a [`MockObserver`], queue the notifications you expect with
//! [`MockObserver::expect_notification`], attach it to a cell or an actor, drive the actor,
//! then call [`MockObserver::verify`].
//!
//! ```rust
//! use state_managed::framework::mock::MockObserver;
//! use state_managed::ObservableCell;
//!
//! let cell = ObservableCell::with_value(0u32);
//! let mock = MockObserver::<u32>::new();
//! mock.expect_notification().with_value(1);
//! mock.expect_notification().matching("an even number", |v| v % 2 == 0);
//!
//! let _subscription = mock.subscribe_to(&cell);
//! cell.set(1);
//! cell.set(4);
//!
//! mock.verify(); // Ensures all expectations were met
//! ```
//!
//! An unexpected or mismatched notification panics inside the observer, which surfaces in
//! the test as a panic from the `set` or `send` that produced it.

use crate::framework::observable::{ObservableCell, Subscription};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::rc::Rc;

type Predicate<V> = Box<dyn Fn(&V) -> bool>;

/// One expected notification.
enum Expectation<V> {
    Value(V),
    Any,
    Matching {
        description: String,
        predicate: Predicate<V>,
    },
}

struct Shared<V> {
    expectations: VecDeque<Expectation<V>>,
    received: Vec<V>,
}

/// An observer with expectation tracking for fluent testing.
pub struct MockObserver<V> {
    shared: Rc<RefCell<Shared<V>>>,
}

impl<V: Clone + PartialEq + Debug + 'static> MockObserver<V> {
    /// Creates a new mock observer with no expectations.
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                expectations: VecDeque::new(),
                received: Vec::new(),
            })),
        }
    }

    /// Queues one more expected notification.
    pub fn expect_notification(&self) -> NotificationExpectationBuilder<V> {
        NotificationExpectationBuilder {
            shared: self.shared.clone(),
        }
    }

    /// The callback to register with a cell or actor.
    pub fn callback(&self) -> impl Fn(&V) + 'static {
        let shared = self.shared.clone();
        move |value: &V| {
            let expectation = shared.borrow_mut().expectations.pop_front();
            match expectation {
                Some(Expectation::Value(expected)) => {
                    assert_eq!(*value, expected, "Notification value mismatch");
                }
                Some(Expectation::Any) => {}
                Some(Expectation::Matching {
                    description,
                    predicate,
                }) => {
                    assert!(
                        predicate(value),
                        "Notification {value:?} is not {description}"
                    );
                }
                None => panic!("Unexpected notification: {value:?}"),
            }
            shared.borrow_mut().received.push(value.clone());
        }
    }

    /// Registers this mock on `cell`.
    pub fn subscribe_to(&self, cell: &ObservableCell<V>) -> Subscription {
        cell.observe(self.callback())
    }

    /// Every value received so far, in order.
    pub fn received(&self) -> Vec<V> {
        self.shared.borrow().received.clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.shared.borrow().expectations.len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

impl<V: Clone + PartialEq + Debug + 'static> Default for MockObserver<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for notification expectations.
pub struct NotificationExpectationBuilder<V> {
    shared: Rc<RefCell<Shared<V>>>,
}

impl<V> NotificationExpectationBuilder<V> {
    /// Expects exactly `value`.
    pub fn with_value(self, value: V) {
        self.push(Expectation::Value(value));
    }

    /// Expects a notification, whatever its value.
    pub fn any(self) {
        self.push(Expectation::Any);
    }

    /// Expects a value satisfying `predicate`.
    pub fn matching(self, description: impl Into<String>, predicate: impl Fn(&V) -> bool + 'static) {
        self.push(Expectation::Matching {
            description: description.into(),
            predicate: Box::new(predicate),
        });
    }

    fn push(self, expectation: Expectation<V>) {
        self.shared.borrow_mut().expectations.push_back(expectation);
    }
}
