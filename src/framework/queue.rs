//! # Dispatch Queues
//!
//! One FIFO queue per actor identity, plus the registry that owns them.
//!
//! ## The Drain Loop
//!
//! [`submit`] appends a [`WorkItem`] to the actor's queue. If nothing is draining that queue,
//! the caller becomes the drainer and runs items one by one until the queue is empty. If a
//! drain is already running further up the call stack (the item was submitted from inside a
//! reducer, an effect or an observer of the same actor), `submit` returns right after the
//! append and the running loop picks the item up. There is never more than one active drain
//! per identity, and items always run in submission order.
//!
//! ## Lifecycle
//!
//! Queues live in a thread-local registry:
//!
//! - **created** by the first `submit` for an identity that has no queue;
//! - **destroyed** as soon as its drain empties it.
//!
//! An idle actor therefore costs no registry entry. If an item panics the drain stops, the
//! items still waiting are discarded and the entry is removed while unwinding, so later
//! submits for the same identity start from a clean queue.

use crate::framework::effect::{Deferred, Effect, LocalTask};
use crate::framework::identity::ActorId;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

/// One unit of serialized work.
pub enum WorkItem {
    /// A reducer invocation. `label` is the action's debug text when trace logging is on.
    Dispatch { label: Option<String>, run: Deferred },
    /// A synchronous deferred effect.
    Deferred(Deferred),
    /// An async effect body, spawned with `tokio::task::spawn_local` when reached.
    Task(LocalTask),
}

impl WorkItem {
    pub fn dispatch(label: Option<String>, run: impl FnOnce() + 'static) -> Self {
        WorkItem::Dispatch {
            label,
            run: Box::new(run),
        }
    }

    pub fn deferred(f: impl FnOnce() + 'static) -> Self {
        WorkItem::Deferred(Box::new(f))
    }

    pub fn task(future: impl Future<Output = ()> + 'static) -> Self {
        WorkItem::Task(Box::pin(future))
    }

    /// Work item for a reducer's effect, or `None` for [`Effect::None`].
    pub fn from_effect(effect: Effect) -> Option<Self> {
        match effect {
            Effect::None => None,
            Effect::Run(f) => Some(WorkItem::Deferred(f)),
            Effect::Task(future) => Some(WorkItem::Task(future)),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            WorkItem::Dispatch { .. } => "dispatch",
            WorkItem::Deferred(_) => "deferred",
            WorkItem::Task(_) => "task",
        }
    }

    fn execute(self) {
        match self {
            WorkItem::Dispatch { run, .. } => run(),
            WorkItem::Deferred(f) => f(),
            WorkItem::Task(future) => {
                // Panics outside a LocalSet, like any spawn_local.
                tokio::task::spawn_local(future);
            }
        }
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkItem::Dispatch { label, .. } => f
                .debug_struct("Dispatch")
                .field("label", label)
                .finish_non_exhaustive(),
            other => f.write_str(other.kind()),
        }
    }
}

/// Pending items and the draining flag of one actor.
pub struct DispatchQueue {
    items: RefCell<VecDeque<WorkItem>>,
    draining: Cell<bool>,
    // Holds the actor's allocation so its id is not reused while the queue exists.
    owner: Weak<dyn Any>,
}

impl DispatchQueue {
    fn new(owner: Weak<dyn Any>) -> Self {
        Self {
            items: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
            owner,
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn is_draining(&self) -> bool {
        self.draining.get()
    }

    /// Whether the actor this queue belongs to still exists.
    pub fn is_owner_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }

    fn push(&self, item: WorkItem) {
        self.items.borrow_mut().push_back(item);
    }

    fn pop(&self) -> Option<WorkItem> {
        self.items.borrow_mut().pop_front()
    }
}

thread_local! {
    static QUEUES: RefCell<HashMap<ActorId, Rc<DispatchQueue>>> = RefCell::new(HashMap::new());
}

/// Appends `item` to the queue of `actor` and drains it if no drain is running.
pub fn submit<A: Any>(actor: &Rc<A>, item: WorkItem) {
    let id = ActorId::of(actor);
    let queue = QUEUES.with(|queues| {
        queues
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| {
                debug!(actor = %id, "Queue created");
                let owner: Weak<A> = Rc::downgrade(actor);
                Rc::new(DispatchQueue::new(owner))
            })
            .clone()
    });

    queue.push(item);
    if queue.is_draining() {
        trace!(actor = %id, pending = queue.len(), "Queued behind running drain");
        return;
    }
    drain(id, queue);
}

#[tracing::instrument(level = "trace", skip_all, fields(actor = %id))]
fn drain(id: ActorId, queue: Rc<DispatchQueue>) {
    queue.draining.set(true);
    debug!(pending = queue.len(), "Drain started");
    let mut guard = DrainGuard {
        id,
        queue,
        processed: 0,
        completed: false,
    };

    while let Some(item) = guard.queue.pop() {
        match &item {
            WorkItem::Dispatch {
                label: Some(label), ..
            } => trace!(kind = item.kind(), action = %label, "Run item"),
            _ => trace!(kind = item.kind(), "Run item"),
        }
        item.execute();
        guard.processed += 1;
    }
    guard.completed = true;
}

/// Resets the queue and drops its registry entry however the drain ends.
struct DrainGuard {
    id: ActorId,
    queue: Rc<DispatchQueue>,
    processed: usize,
    completed: bool,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        self.queue.draining.set(false);
        if self.completed {
            debug!(
                actor = %self.id,
                processed = self.processed,
                owner_alive = self.queue.is_owner_alive(),
                "Drain finished"
            );
        } else {
            let discarded = std::mem::take(&mut *self.queue.items.borrow_mut());
            warn!(
                actor = %self.id,
                processed = self.processed,
                discarded = discarded.len(),
                "Drain aborted"
            );
            drop(discarded);
        }

        let removed = QUEUES
            .try_with(|queues| {
                let mut queues = queues.try_borrow_mut().ok()?;
                let current = queues.get(&self.id)?;
                if Rc::ptr_eq(current, &self.queue) {
                    queues.remove(&self.id)
                } else {
                    None
                }
            })
            .ok()
            .flatten();
        drop(removed);
    }
}

/// Number of identities that currently have a queue.
pub fn active_queues() -> usize {
    QUEUES.with(|queues| queues.borrow().len())
}

pub fn has_queue(id: ActorId) -> bool {
    QUEUES.with(|queues| queues.borrow().contains_key(&id))
}

/// Items waiting in the queue of `id` (not counting the one running).
pub fn pending(id: ActorId) -> usize {
    QUEUES.with(|queues| queues.borrow().get(&id).map_or(0, |queue| queue.len()))
}

pub fn is_draining(id: ActorId) -> bool {
    QUEUES.with(|queues| {
        queues
            .borrow()
            .get(&id)
            .is_some_and(|queue| queue.is_draining())
    })
}
