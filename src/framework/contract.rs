//! # The StateManaged Contract
//!
//! This module ties the pieces together. An actor type implements [`StateManaged`] (its
//! state type, its action type and a reducer) and every `Rc` handle to it gains the
//! operations of [`StateManagedExt`]:
//!
//! | Operation                | What it does                                              |
//! |--------------------------|-----------------------------------------------------------|
//! | `set_initial_state`      | Unset -> Active. Faults if already set.                   |
//! | `state` / `with_state`   | Reads the committed state. Faults while unset.            |
//! | `send`                   | Queues the action; drains now if the actor is idle.       |
//! | `run_after_process`      | Queues a callback behind everything already queued.       |
//! | `observe_state`          | Subscribes to every committed state.                      |
//! | `force_set_state`        | Overwrites the state outside the action pipeline.         |
//!
//! ## Processing an Action
//!
//! A dispatched action runs as one work item on the actor's queue:
//!
//! 1. Read a copy of the current state from the actor's cell.
//! 2. Call [`StateManaged::process`] with the copy, the action and an [`ActorContext`].
//! 3. Write the copy back, which notifies observers.
//! 4. Queue the returned [`Effect`] (if any) as the next item on the same queue.
//!
//! Actions sent from inside `process` (through the context or the actor handle) are queued
//! behind the running item, so the reducer never observes a half-applied nested action.
//!
//! ## Example
//!
//! ```rust
//! use state_managed::{ActorContext, Effect, StateManaged, StateManagedExt};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! struct Counter;
//!
//! #[derive(Debug)]
//! enum CounterAction {
//!     Increment,
//!     Batch(u32),
//! }
//!
//! impl StateManaged for Counter {
//!     type State = u32;
//!     type Action = CounterAction;
//!
//!     fn process(&self, state: &mut u32, action: CounterAction, ctx: &ActorContext<Self>) -> Effect {
//!         match action {
//!             CounterAction::Increment => *state += 1,
//!             CounterAction::Batch(n) => {
//!                 for _ in 0..n {
//!                     ctx.send(CounterAction::Increment);
//!                 }
//!             }
//!         }
//!         Effect::none()
//!     }
//! }
//!
//! let counter = Rc::new(Counter);
//! counter.set_initial_state(0);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let _subscription = counter.observe_state(move |value| sink.borrow_mut().push(*value));
//!
//! counter.send(CounterAction::Batch(2));
//! assert_eq!(counter.state(), 2);
//! assert_eq!(*seen.borrow(), vec![0, 1, 2]);
//! ```
//!
//! Observers must not own a strong handle to the actor they observe: the state cell owns its
//! observers, so that would keep the actor's state alive for as long as the thread runs.
//! Capture a `Weak` instead.

use crate::framework::effect::Effect;
use crate::framework::error::StateError;
use crate::framework::identity::{short_type_name, ActorId};
use crate::framework::observable::{ObservableCell, Subscription};
use crate::framework::queue::{self, WorkItem};
use crate::framework::store;
use std::fmt::Debug;
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, trace, Level};

/// An object that owns a piece of state and changes it only through actions.
pub trait StateManaged: Sized + 'static {
    /// The state owned by each instance.
    type State: Clone + 'static;

    /// Requests to change the state.
    type Action: Debug + 'static;

    /// The reducer: applies `action` to `state` and returns follow-up work.
    ///
    /// Runs on the actor's queue, never concurrently with another item of the same actor.
    /// `state` is a working copy; it is committed (and observers notified) when this returns.
    /// Panics propagate out of the `send` that started the drain.
    fn process(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        ctx: &ActorContext<Self>,
    ) -> Effect;
}

/// Handle given to a reducer for scheduling more work on its own actor.
pub struct ActorContext<A: StateManaged> {
    actor: Rc<A>,
}

impl<A: StateManaged> ActorContext<A> {
    pub fn actor(&self) -> &Rc<A> {
        &self.actor
    }

    pub fn id(&self) -> ActorId {
        ActorId::of(&self.actor)
    }

    /// Queues `action` behind the item being processed.
    pub fn send(&self, action: A::Action) {
        send(&self.actor, action);
    }

    /// Queues `effect` behind everything currently queued for this actor.
    pub fn run_after_process(&self, effect: impl FnOnce() + 'static) {
        run_after_process(&self.actor, effect);
    }

    pub fn run_after_process_task(&self, future: impl Future<Output = ()> + 'static) {
        run_after_process_task(&self.actor, future);
    }
}

/// Sets the first state of `actor`, failing if it already has one.
pub fn try_set_initial_state<A: StateManaged>(actor: &Rc<A>, state: A::State) -> Result<(), StateError> {
    let cell = cell_of(actor);
    if cell.is_set() {
        return Err(StateError::already_initialized::<A>(ActorId::of(actor)));
    }
    debug!(actor_type = short_type_name::<A>(), actor = %ActorId::of(actor), "Initial state set");
    cell.set(state);
    Ok(())
}

/// Copy of the committed state of `actor`.
pub fn try_state<A: StateManaged>(actor: &Rc<A>) -> Result<A::State, StateError> {
    cell_of(actor)
        .get()
        .ok_or_else(|| StateError::not_initialized::<A>(ActorId::of(actor)))
}

/// Overwrites the state of `actor` without going through its reducer.
///
/// Observers are notified as for any other write. This is an escape hatch: state written
/// here bypasses the action log a reducer would otherwise give you, and it lands
/// immediately, even between two items of a running drain.
pub fn force_set_state<A: StateManaged>(actor: &Rc<A>, state: A::State) {
    debug!(actor_type = short_type_name::<A>(), actor = %ActorId::of(actor), "Forced state");
    cell_of(actor).set(state);
}

/// Submits `action` to the queue of `actor`.
pub fn send<A: StateManaged>(actor: &Rc<A>, action: A::Action) {
    let label = tracing::enabled!(Level::TRACE).then(|| format!("{action:?}"));
    let target = actor.clone();
    queue::submit(actor, WorkItem::dispatch(label, move || process_action(&target, action)));
}

/// Submits a bare deferred callback to the queue of `actor`.
pub fn run_after_process<A: StateManaged>(actor: &Rc<A>, effect: impl FnOnce() + 'static) {
    queue::submit(actor, WorkItem::deferred(effect));
}

/// Submits an async body to the queue of `actor`; it is spawned on the current
/// `tokio::task::LocalSet` when its turn comes.
pub fn run_after_process_task<A: StateManaged>(
    actor: &Rc<A>,
    future: impl Future<Output = ()> + 'static,
) {
    queue::submit(actor, WorkItem::task(future));
}

/// Subscribes `callback` to every state committed for `actor` from now on.
pub fn observe_state<A: StateManaged>(
    actor: &Rc<A>,
    callback: impl Fn(&A::State) + 'static,
) -> Subscription {
    cell_of(actor).observe(callback)
}

/// Drops the stored state of `actor` right away instead of waiting for a sweep.
///
/// Meant for `Drop` impls:
///
/// ```rust
/// # use state_managed::{ActorContext, Effect, StateManaged};
/// struct Session;
/// # impl StateManaged for Session {
/// #     type State = ();
/// #     type Action = ();
/// #     fn process(&self, _: &mut (), _: (), _: &ActorContext<Self>) -> Effect { Effect::none() }
/// # }
///
/// impl Drop for Session {
///     fn drop(&mut self) {
///         state_managed::release_state(&*self);
///     }
/// }
/// ```
pub fn release_state<A: ?Sized>(actor: &A) -> bool {
    store::release(ActorId::of_ref(actor))
}

fn cell_of<A: StateManaged>(actor: &Rc<A>) -> ObservableCell<A::State> {
    store::cell_for::<A::State, A>(actor)
}

fn process_action<A: StateManaged>(actor: &Rc<A>, action: A::Action) {
    let id = ActorId::of(actor);
    let cell = cell_of(actor);
    let mut state = match cell.get() {
        Some(state) => state,
        None => panic!("{}", StateError::not_initialized::<A>(id)),
    };

    let ctx = ActorContext {
        actor: actor.clone(),
    };
    let effect = actor.process(&mut state, action, &ctx);
    cell.set(state);

    if let Some(item) = WorkItem::from_effect(effect) {
        trace!(actor_type = short_type_name::<A>(), actor = %id, ?item, "Effect queued");
        queue::submit(actor, item);
    }
}

/// The public operations of a [`StateManaged`] actor, available on its `Rc` handle.
pub trait StateManagedExt<A: StateManaged> {
    fn actor_id(&self) -> ActorId;

    /// Sets the first state.
    ///
    /// # Panics
    /// If the state was already set.
    fn set_initial_state(&self, state: A::State);

    fn try_set_initial_state(&self, state: A::State) -> Result<(), StateError>;

    /// Copy of the committed state.
    ///
    /// # Panics
    /// If `set_initial_state` has not been called.
    fn state(&self) -> A::State;

    fn try_state(&self) -> Result<A::State, StateError>;

    /// Runs `f` against the committed state without copying it.
    ///
    /// # Panics
    /// If `set_initial_state` has not been called.
    fn with_state<R>(&self, f: impl FnOnce(&A::State) -> R) -> R;

    fn force_set_state(&self, state: A::State);

    fn send(&self, action: A::Action);

    fn run_after_process(&self, effect: impl FnOnce() + 'static);

    fn run_after_process_task(&self, future: impl Future<Output = ()> + 'static);

    /// The returned [`Subscription`] must be kept; dropping it unsubscribes.
    fn observe_state(&self, callback: impl Fn(&A::State) + 'static) -> Subscription;
}

impl<A: StateManaged> StateManagedExt<A> for Rc<A> {
    fn actor_id(&self) -> ActorId {
        ActorId::of(self)
    }

    fn set_initial_state(&self, state: A::State) {
        if let Err(e) = try_set_initial_state(self, state) {
            panic!("{e}");
        }
    }

    fn try_set_initial_state(&self, state: A::State) -> Result<(), StateError> {
        try_set_initial_state(self, state)
    }

    fn state(&self) -> A::State {
        try_state(self).unwrap_or_else(|e| panic!("{e}"))
    }

    fn try_state(&self) -> Result<A::State, StateError> {
        try_state(self)
    }

    fn with_state<R>(&self, f: impl FnOnce(&A::State) -> R) -> R {
        cell_of(self)
            .with(f)
            .unwrap_or_else(|| panic!("{}", StateError::not_initialized::<A>(ActorId::of(self))))
    }

    fn force_set_state(&self, state: A::State) {
        force_set_state(self, state);
    }

    fn send(&self, action: A::Action) {
        send(self, action);
    }

    fn run_after_process(&self, effect: impl FnOnce() + 'static) {
        run_after_process(self, effect);
    }

    fn run_after_process_task(&self, future: impl Future<Output = ()> + 'static) {
        run_after_process_task(self, future);
    }

    fn observe_state(&self, callback: impl Fn(&A::State) + 'static) -> Subscription {
        observe_state(self, callback)
    }
}
