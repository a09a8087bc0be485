//! # Observable State
//!
//! [`ObservableCell`] is the explicit-setter version of a "did set" property: every call to
//! [`ObservableCell::set`] stores the new value and then synchronously hands it to each
//! registered observer, in registration order.
//!
//! ## Reentrancy
//!
//! Observers run while no borrow of the cell or of its observer list is held, so they may
//! read the cell, write it again, subscribe new observers or cancel existing ones. The
//! notification pass walks a snapshot taken when it started:
//!
//! - observers added during the pass are not called for the value being published;
//! - observers removed during the pass (by themselves or by a neighbour) are skipped for
//!   the rest of it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Opaque key of one registered observer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObserverToken(u64);

/// One registered callback. `active` is cleared on removal so a pass that already
/// snapshotted the entry skips it.
struct Observer<V> {
    token: ObserverToken,
    active: Cell<bool>,
    callback: Box<dyn Fn(&V)>,
}

/// Ordered map from [`ObserverToken`] to callback.
pub struct ObserverRegistry<V> {
    observers: RefCell<Vec<Rc<Observer<V>>>>,
    next_token: Cell<u64>,
}

impl<V> ObserverRegistry<V> {
    pub fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
            next_token: Cell::new(0),
        }
    }

    /// Appends a callback; it will be called after every observer registered before it.
    pub fn subscribe(&self, callback: impl Fn(&V) + 'static) -> ObserverToken {
        let token = ObserverToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.observers.borrow_mut().push(Rc::new(Observer {
            token,
            active: Cell::new(true),
            callback: Box::new(callback),
        }));
        token
    }

    /// Removes a callback. Returns `false` if the token was already gone.
    pub fn unsubscribe(&self, token: ObserverToken) -> bool {
        let removed = {
            let mut observers = self.observers.borrow_mut();
            observers
                .iter()
                .position(|observer| observer.token == token)
                .map(|index| observers.remove(index))
        };
        let found = removed.is_some();
        if let Some(observer) = &removed {
            observer.active.set(false);
        }
        // The callback may own values whose destructors touch this registry.
        drop(removed);
        found
    }

    pub fn contains(&self, token: ObserverToken) -> bool {
        self.observers
            .borrow()
            .iter()
            .any(|observer| observer.token == token)
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.borrow().is_empty()
    }

    /// Calls every observer registered at the moment the pass starts.
    pub fn notify(&self, value: &V) {
        let snapshot: Vec<_> = self.observers.borrow().clone();
        trace!(observers = snapshot.len(), "Notify");
        for observer in snapshot {
            if observer.active.get() {
                (observer.callback)(value);
            }
        }
    }
}

impl<V> Default for ObserverRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ObserverRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

trait Unsubscribe {
    fn unsubscribe(&self, token: ObserverToken) -> bool;
    fn contains(&self, token: ObserverToken) -> bool;
}

impl<V> Unsubscribe for ObserverRegistry<V> {
    fn unsubscribe(&self, token: ObserverToken) -> bool {
        ObserverRegistry::unsubscribe(self, token)
    }

    fn contains(&self, token: ObserverToken) -> bool {
        ObserverRegistry::contains(self, token)
    }
}

/// Handle to one registered observer.
///
/// The observer stays registered for as long as the handle lives. Dropping it, or calling
/// [`Subscription::cancel`], removes the observer; doing so after the cell is gone, or more
/// than once, is a no-op.
#[must_use = "dropping a Subscription unsubscribes its observer immediately"]
pub struct Subscription {
    registry: Weak<dyn Unsubscribe>,
    token: ObserverToken,
    armed: bool,
}

impl Subscription {
    pub fn token(&self) -> ObserverToken {
        self.token
    }

    /// `true` while the observer is still registered with a live cell.
    pub fn is_active(&self) -> bool {
        self.armed
            && self
                .registry
                .upgrade()
                .is_some_and(|registry| registry.contains(self.token))
    }

    /// Removes the observer now.
    pub fn cancel(mut self) {
        self.disarm();
    }

    /// Leaves the observer registered for the rest of the cell's life.
    pub fn detach(mut self) {
        self.armed = false;
    }

    fn disarm(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.token);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("token", &self.token)
            .field("armed", &self.armed)
            .finish()
    }
}

struct CellInner<V> {
    value: RefCell<Option<V>>,
    observers: Rc<ObserverRegistry<V>>,
}

/// A value slot that publishes every write to its observers.
///
/// Cells start unset. Cloning a cell clones the handle, not the value: all clones read and
/// write the same slot.
pub struct ObservableCell<V> {
    inner: Rc<CellInner<V>>,
}

impl<V: 'static> ObservableCell<V> {
    /// Creates an unset cell.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(CellInner {
                value: RefCell::new(None),
                observers: Rc::new(ObserverRegistry::new()),
            }),
        }
    }

    /// Creates a cell that already holds `value`.
    pub fn with_value(value: V) -> Self {
        let cell = Self::new();
        *cell.inner.value.borrow_mut() = Some(value);
        cell
    }

    pub fn is_set(&self) -> bool {
        self.inner.value.borrow().is_some()
    }

    /// Copy of the current value, or `None` while unset.
    pub fn get(&self) -> Option<V>
    where
        V: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Runs `f` against the current value without cloning it.
    ///
    /// The cell is borrowed while `f` runs; calling [`ObservableCell::set`] from inside `f`
    /// panics.
    pub fn with<R>(&self, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.inner.value.borrow().as_ref().map(f)
    }

    /// Replaces the value, then notifies every observer with the committed value.
    pub fn set(&self, value: V)
    where
        V: Clone,
    {
        if self.inner.observers.is_empty() {
            let previous = self.inner.value.borrow_mut().replace(value);
            drop(previous);
            return;
        }
        let committed = value.clone();
        let previous = self.inner.value.borrow_mut().replace(value);
        drop(previous);
        self.inner.observers.notify(&committed);
    }

    /// Registers `callback` for every future [`ObservableCell::set`].
    ///
    /// The callback is not invoked with the current value.
    pub fn observe(&self, callback: impl Fn(&V) + 'static) -> Subscription {
        let token = self.inner.observers.subscribe(callback);
        let registry: Rc<dyn Unsubscribe> = self.inner.observers.clone();
        Subscription {
            registry: Rc::downgrade(&registry),
            token,
            armed: true,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// `true` if both handles point at the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<V: 'static> Default for ObservableCell<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for ObservableCell<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for ObservableCell<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCell")
            .field("value", &self.inner.value.borrow())
            .field("observers", &self.inner.observers.len())
            .finish()
    }
}
