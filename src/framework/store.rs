//! # Identity State Store
//!
//! Associates each actor with one [`ObservableCell`] holding its state, without owning the
//! actor. Every entry records a `Weak` to its actor:
//!
//! - entries of actors that no longer exist are reclaimed by [`purge`], and automatically
//!   every `sweep_threshold` insertions;
//! - an actor can drop its entry eagerly by calling [`release`] from its `Drop` impl.
//!
//! The store is thread-local. Actors are `Rc` handles, so the thread that creates an actor is
//! the only one that can reach its state.
//!
//! Entry values are always dropped after the store borrow is released: a cell's observers
//! may own other actors whose destructors call back into the store.

use crate::framework::identity::ActorId;
use crate::framework::observable::ObservableCell;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use tracing::{debug, info};

pub const DEFAULT_SWEEP_THRESHOLD: usize = 64;

struct Entry {
    owner: Weak<dyn Any>,
    cell: Box<dyn Any>,
}

impl Entry {
    fn is_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

struct StateStore {
    entries: HashMap<ActorId, Entry>,
    inserts_since_sweep: usize,
    sweep_threshold: usize,
}

impl StateStore {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            inserts_since_sweep: 0,
            sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
        }
    }

    fn lookup<S: 'static>(&self, id: ActorId) -> Option<ObservableCell<S>> {
        let entry = self.entries.get(&id).filter(|entry| entry.is_alive())?;
        match entry.cell.downcast_ref::<ObservableCell<S>>() {
            Some(cell) => Some(cell.clone()),
            None => panic!(
                "state cell of {id} holds {}, not the requested type",
                std::any::type_name::<S>()
            ),
        }
    }

    fn insert<S: 'static>(&mut self, id: ActorId, owner: Weak<dyn Any>) -> (ObservableCell<S>, Vec<Entry>) {
        let mut evicted: Vec<Entry> = self.entries.remove(&id).into_iter().collect();
        self.inserts_since_sweep += 1;
        if self.inserts_since_sweep >= self.sweep_threshold {
            evicted.extend(self.sweep());
        }

        let cell = ObservableCell::<S>::new();
        self.entries.insert(
            id,
            Entry {
                owner,
                cell: Box::new(cell.clone()),
            },
        );
        debug!(actor = %id, size = self.entries.len(), "State cell created");
        (cell, evicted)
    }

    fn sweep(&mut self) -> Vec<Entry> {
        self.inserts_since_sweep = 0;
        let dead: Vec<ActorId> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_alive())
            .map(|(id, _)| *id)
            .collect();
        let reclaimed: Vec<Entry> = dead
            .into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .collect();
        if !reclaimed.is_empty() {
            info!(
                reclaimed = reclaimed.len(),
                size = self.entries.len(),
                "Swept state store"
            );
        }
        reclaimed
    }
}

thread_local! {
    static STORE: RefCell<StateStore> = RefCell::new(StateStore::new());
}

/// The state cell of `actor`, created unset on first access.
pub fn cell_for<S: 'static, A: Any>(actor: &Rc<A>) -> ObservableCell<S> {
    let id = ActorId::of(actor);
    if let Some(cell) = STORE.with(|store| store.borrow().lookup::<S>(id)) {
        return cell;
    }
    let owner: Weak<A> = Rc::downgrade(actor);
    let owner: Weak<dyn Any> = owner;
    let (cell, evicted) = STORE.with(|store| store.borrow_mut().insert::<S>(id, owner));
    drop(evicted);
    cell
}

/// The state cell of `id` if one exists and its actor is alive.
pub fn existing_cell<S: 'static>(id: ActorId) -> Option<ObservableCell<S>> {
    STORE.with(|store| store.borrow().lookup::<S>(id))
}

/// Drops the entry of `id`. Returns `false` if there was none.
///
/// Safe to call from an actor's `Drop` impl, including during thread teardown or while the
/// store is in the middle of a sweep (the entry is then left for the next one).
pub fn release(id: ActorId) -> bool {
    let removed = STORE
        .try_with(|store| {
            store
                .try_borrow_mut()
                .ok()
                .and_then(|mut store| store.entries.remove(&id))
        })
        .ok()
        .flatten();
    if removed.is_some() {
        debug!(actor = %id, "State cell released");
    }
    let found = removed.is_some();
    drop(removed);
    found
}

/// Removes every entry whose actor is gone and returns how many were reclaimed.
pub fn purge() -> usize {
    let reclaimed = STORE.with(|store| store.borrow_mut().sweep());
    let count = reclaimed.len();
    drop(reclaimed);
    count
}

/// Number of entries, including dead ones not yet swept.
pub fn len() -> usize {
    STORE.with(|store| store.borrow().entries.len())
}

pub fn is_empty() -> bool {
    len() == 0
}

pub fn contains(id: ActorId) -> bool {
    STORE.with(|store| store.borrow().entries.contains_key(&id))
}

pub fn sweep_threshold() -> usize {
    STORE.with(|store| store.borrow().sweep_threshold)
}

/// Sets how many insertions happen between automatic sweeps (at least 1).
pub fn set_sweep_threshold(threshold: usize) {
    STORE.with(|store| store.borrow_mut().sweep_threshold = threshold.max(1));
}
