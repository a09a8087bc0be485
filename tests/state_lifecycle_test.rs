use state_managed::framework::{queue, store};
use state_managed::{ActorContext, Effect, StateError, StateManaged, StateManagedExt, Subscription};
use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Profile {
    name: String,
    visits: u32,
}

#[derive(Debug)]
enum ProfileAction {
    Visit,
    Rename(String),
}

struct ProfileActor;

impl StateManaged for ProfileActor {
    type State = Profile;
    type Action = ProfileAction;

    fn process(&self, state: &mut Profile, action: ProfileAction, _ctx: &ActorContext<Self>) -> Effect {
        match action {
            ProfileAction::Visit => state.visits += 1,
            ProfileAction::Rename(name) => state.name = name,
        }
        Effect::none()
    }
}

fn alice() -> Profile {
    Profile {
        name: "Alice".into(),
        visits: 0,
    }
}

/// An actor that drops its own state as soon as it is destroyed.
struct Session {
    dropped: Rc<Cell<bool>>,
}

impl StateManaged for Session {
    type State = u64;
    type Action = ();

    fn process(&self, state: &mut u64, _: (), _ctx: &ActorContext<Self>) -> Effect {
        *state += 1;
        Effect::none()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.dropped.set(true);
        state_managed::release_state(&*self);
    }
}

// --- Initialization ---

#[test]
fn test_full_state_lifecycle() {
    let actor = Rc::new(ProfileActor);

    // Unset
    assert!(matches!(
        actor.try_state(),
        Err(StateError::NotInitialized { actor_type: "ProfileActor", .. })
    ));

    // Active
    actor.set_initial_state(alice());
    actor.send(ProfileAction::Visit);
    actor.send(ProfileAction::Rename("Bob".into()));
    assert_eq!(
        actor.state(),
        Profile {
            name: "Bob".into(),
            visits: 1
        }
    );
    assert_eq!(actor.with_state(|p| p.visits), 1);
}

#[test]
#[should_panic(expected = "read before set_initial_state")]
fn test_reading_unset_state_is_a_fault() {
    let actor = Rc::new(ProfileActor);
    let _ = actor.state();
}

#[test]
#[should_panic(expected = "read before set_initial_state")]
fn test_with_state_on_unset_state_is_a_fault() {
    let actor = Rc::new(ProfileActor);
    actor.with_state(|p| p.visits);
}

#[test]
#[should_panic(expected = "already initialized")]
fn test_double_initialization_is_a_fault() {
    let actor = Rc::new(ProfileActor);
    actor.set_initial_state(alice());
    actor.set_initial_state(alice());
}

#[test]
fn test_try_set_initial_state_reports_the_actor() {
    let actor = Rc::new(ProfileActor);
    assert_eq!(actor.try_set_initial_state(alice()), Ok(()));

    let err = actor.try_set_initial_state(alice()).unwrap_err();
    assert_eq!(
        err,
        StateError::AlreadyInitialized {
            actor_type: "ProfileActor",
            actor: actor.actor_id(),
        }
    );
    assert!(err.to_string().contains(&actor.actor_id().to_string()));
    // The first value is untouched.
    assert_eq!(actor.state(), alice());
}

#[test]
fn test_send_before_initialization_faults_and_leaves_queue_clean() {
    let actor = Rc::new(ProfileActor);

    let result = catch_unwind(AssertUnwindSafe(|| actor.send(ProfileAction::Visit)));
    assert!(result.is_err());
    assert!(!queue::has_queue(actor.actor_id()));

    actor.set_initial_state(alice());
    actor.send(ProfileAction::Visit);
    assert_eq!(actor.state().visits, 1);
}

// --- Forced state ---

#[test]
fn test_force_set_state_is_seen_by_next_reducer_and_observers() {
    let actor = Rc::new(ProfileActor);
    actor.set_initial_state(alice());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let seen = seen.clone();
        actor.observe_state(move |p| seen.borrow_mut().push(p.visits))
    };

    actor.force_set_state(Profile {
        name: "Carol".into(),
        visits: 41,
    });
    actor.send(ProfileAction::Visit);

    assert_eq!(actor.state().visits, 42);
    assert_eq!(actor.state().name, "Carol");
    assert_eq!(*seen.borrow(), vec![41, 42]);
}

#[test]
fn test_force_set_state_works_before_initialization() {
    let actor = Rc::new(ProfileActor);
    actor.force_set_state(alice());
    assert_eq!(actor.state(), alice());
    assert!(actor.try_set_initial_state(alice()).is_err());
}

// --- Observation ---

#[test]
fn test_observer_cancelling_itself_does_not_disturb_neighbours() {
    let actor = Rc::new(ProfileActor);
    actor.set_initial_state(alice());

    let own: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let once_calls = Rc::new(Cell::new(0));
    let sub = {
        let own = own.clone();
        let once_calls = once_calls.clone();
        actor.observe_state(move |_| {
            once_calls.set(once_calls.get() + 1);
            if let Some(sub) = own.borrow_mut().take() {
                sub.cancel();
            }
        })
    };
    *own.borrow_mut() = Some(sub);

    let steady = Rc::new(RefCell::new(Vec::new()));
    let _steady_sub = {
        let steady = steady.clone();
        actor.observe_state(move |p| steady.borrow_mut().push(p.visits))
    };

    actor.send(ProfileAction::Visit);
    actor.send(ProfileAction::Visit);
    actor.send(ProfileAction::Visit);

    assert_eq!(once_calls.get(), 1);
    assert_eq!(*steady.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_dropped_subscription_stops_notifications() {
    let actor = Rc::new(ProfileActor);
    actor.set_initial_state(alice());
    let calls = Rc::new(Cell::new(0));
    let sub = {
        let calls = calls.clone();
        actor.observe_state(move |_| calls.set(calls.get() + 1))
    };

    actor.send(ProfileAction::Visit);
    drop(sub);
    actor.send(ProfileAction::Visit);

    assert_eq!(calls.get(), 1);
}

// --- Identity & Reclamation ---

#[test]
fn test_state_does_not_keep_actor_alive() {
    let actor = Rc::new(ProfileActor);
    actor.set_initial_state(alice());
    let id = actor.actor_id();
    let weak = Rc::downgrade(&actor);

    drop(actor);

    assert!(weak.upgrade().is_none());
    assert!(store::existing_cell::<Profile>(id).is_none());
    assert_eq!(store::purge(), 1);
    assert!(!store::contains(id));
}

#[test]
fn test_release_from_drop_reclaims_state_immediately() {
    let dropped = Rc::new(Cell::new(false));
    let session = Rc::new(Session {
        dropped: dropped.clone(),
    });
    session.set_initial_state(0);
    session.send(());
    assert_eq!(session.state(), 1);
    let id = session.actor_id();
    assert!(store::contains(id));

    drop(session);

    assert!(dropped.get());
    assert!(!store::contains(id));
    assert_eq!(store::purge(), 0);
}

#[test]
fn test_each_instance_has_its_own_state() {
    let first = Rc::new(ProfileActor);
    let second = Rc::new(ProfileActor);
    first.set_initial_state(alice());
    second.set_initial_state(Profile {
        name: "Dan".into(),
        visits: 9,
    });

    first.send(ProfileAction::Visit);

    assert_eq!(first.state().visits, 1);
    assert_eq!(second.state().visits, 9);
    assert_ne!(first.actor_id(), second.actor_id());
}
