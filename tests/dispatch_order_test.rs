use state_managed::framework::mock::MockObserver;
use state_managed::framework::queue;
use state_managed::{ActorContext, Effect, StateManaged, StateManagedExt};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// --- Test Actor ---

/// Counts and records every reducer invocation, and how deeply they nest.
#[derive(Default)]
struct Counter {
    invocations: RefCell<Vec<String>>,
    depth: Cell<usize>,
    max_depth: Cell<usize>,
}

#[derive(Debug)]
enum CounterAction {
    Increment,
    Add(i64),
    Batch,
    InspectQueue,
}

impl StateManaged for Counter {
    type State = i64;
    type Action = CounterAction;

    fn process(&self, state: &mut i64, action: CounterAction, ctx: &ActorContext<Self>) -> Effect {
        let depth = self.depth.get() + 1;
        self.depth.set(depth);
        self.max_depth.set(self.max_depth.get().max(depth));
        self.invocations.borrow_mut().push(format!("{action:?}"));

        match action {
            CounterAction::Increment => *state += 1,
            CounterAction::Add(n) => *state += n,
            CounterAction::Batch => {
                ctx.send(CounterAction::Increment);
                ctx.send(CounterAction::Increment);
                // Nothing sent above has run yet.
                assert_eq!(*state, ctx.actor().state());
            }
            CounterAction::InspectQueue => {
                assert!(queue::has_queue(ctx.id()));
                assert!(queue::is_draining(ctx.id()));
                ctx.send(CounterAction::Increment);
                assert_eq!(queue::pending(ctx.id()), 1);
            }
        }

        self.depth.set(depth - 1);
        Effect::none()
    }
}

fn counter(initial: i64) -> Rc<Counter> {
    let actor = Rc::new(Counter::default());
    actor.set_initial_state(initial);
    actor
}

// --- Test Actor with a shared trace ---

type Trace = Rc<RefCell<Vec<String>>>;

fn log(trace: &Trace, entry: impl Into<String>) {
    trace.borrow_mut().push(entry.into());
}

struct Tracer {
    trace: Trace,
}

#[derive(Debug)]
enum TraceAction {
    /// Logs its name and schedules `fx-<name>` as its effect.
    Step(&'static str),
    /// Sends two steps with a bare deferred callback between them.
    Fanout,
    /// Sends one step and logs when its own synchronous work ends.
    Nested,
    /// Logs its name, no effect.
    Plain(&'static str),
    /// Returns an effect that reads back the committed state.
    SetAndCheck(u32),
}

impl StateManaged for Tracer {
    type State = u32;
    type Action = TraceAction;

    fn process(&self, state: &mut u32, action: TraceAction, ctx: &ActorContext<Self>) -> Effect {
        match action {
            TraceAction::Step(name) => {
                log(&self.trace, name);
                let trace = self.trace.clone();
                Effect::run(move || log(&trace, format!("fx-{name}")))
            }
            TraceAction::Fanout => {
                log(&self.trace, "fanout");
                ctx.send(TraceAction::Step("a"));
                let trace = self.trace.clone();
                ctx.run_after_process(move || log(&trace, "after-a"));
                ctx.send(TraceAction::Step("b"));
                let trace = self.trace.clone();
                Effect::run(move || log(&trace, "fx-fanout"))
            }
            TraceAction::Nested => {
                log(&self.trace, "nested:start");
                ctx.send(TraceAction::Plain("inner"));
                log(&self.trace, "nested:end");
                Effect::none()
            }
            TraceAction::Plain(name) => {
                log(&self.trace, name);
                Effect::none()
            }
            TraceAction::SetAndCheck(value) => {
                *state = value;
                let trace = self.trace.clone();
                let actor = ctx.actor().clone();
                Effect::run(move || log(&trace, format!("effect saw {}", actor.state())))
            }
        }
    }
}

fn tracer() -> (Rc<Tracer>, Trace) {
    let trace = Trace::default();
    let actor = Rc::new(Tracer {
        trace: trace.clone(),
    });
    actor.set_initial_state(0);
    (actor, trace)
}

// --- Tests ---

#[test]
fn test_increment_commits_and_notifies_once() {
    let actor = counter(0);
    let mock = MockObserver::<i64>::new();
    mock.expect_notification().with_value(1);
    let _sub = actor.observe_state(mock.callback());

    actor.send(CounterAction::Increment);

    assert_eq!(actor.state(), 1);
    mock.verify();
    assert_eq!(mock.received(), vec![1]);
}

#[test]
fn test_sequential_sends_apply_in_submission_order() {
    let actor = counter(0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = actor.observe_state(move |v| sink.borrow_mut().push(*v));

    actor.send(CounterAction::Add(1));
    actor.send(CounterAction::Add(10));
    actor.send(CounterAction::Add(100));

    assert_eq!(
        *actor.invocations.borrow(),
        vec!["Add(1)", "Add(10)", "Add(100)"]
    );
    assert_eq!(*seen.borrow(), vec![1, 11, 111]);
}

#[test]
fn test_batch_sends_from_inside_reducer_without_reentrant_drain() {
    let actor = counter(0);

    actor.send(CounterAction::Batch);

    assert_eq!(actor.state(), 2);
    assert_eq!(
        *actor.invocations.borrow(),
        vec!["Batch", "Increment", "Increment"]
    );
    // No reducer ever started while another was on the stack.
    assert_eq!(actor.max_depth.get(), 1);
}

#[test]
fn test_queue_exists_only_while_draining() {
    let actor = counter(0);
    let id = actor.actor_id();
    assert!(!queue::has_queue(id));

    actor.send(CounterAction::InspectQueue);

    assert_eq!(actor.state(), 1);
    assert!(!queue::has_queue(id));
    assert_eq!(queue::pending(id), 0);
    assert_eq!(queue::active_queues(), 0);
}

#[test]
fn test_run_after_process_follows_everything_already_queued() {
    let (actor, trace) = tracer();

    actor.send(TraceAction::Fanout);

    assert_eq!(
        *trace.borrow(),
        vec!["fanout", "a", "after-a", "b", "fx-fanout", "fx-a", "fx-b"]
    );
}

#[test]
fn test_run_after_process_on_idle_actor_runs_immediately() {
    let (actor, trace) = tracer();

    let sink = trace.clone();
    actor.run_after_process(move || log(&sink, "now"));
    actor.send(TraceAction::Plain("later"));

    assert_eq!(*trace.borrow(), vec!["now", "later"]);
    assert!(!queue::has_queue(actor.actor_id()));
}

#[test]
fn test_nested_send_runs_before_later_callers() {
    let (actor, trace) = tracer();
    // An observer that reacts to the Nested commit by sending from outside the reducer.
    let weak = Rc::downgrade(&actor);
    let fired = Rc::new(Cell::new(false));
    let _sub = {
        let fired = fired.clone();
        actor.observe_state(move |_| {
            if !fired.replace(true) {
                if let Some(actor) = weak.upgrade() {
                    actor.send(TraceAction::Plain("later"));
                }
            }
        })
    };

    actor.send(TraceAction::Nested);

    assert_eq!(
        *trace.borrow(),
        vec!["nested:start", "nested:end", "inner", "later"]
    );
}

#[test]
fn test_effect_runs_after_commit_and_notification() {
    let (actor, trace) = tracer();
    let _sub = {
        let trace = trace.clone();
        actor.observe_state(move |v| log(&trace, format!("notified {v}")))
    };

    actor.send(TraceAction::SetAndCheck(7));

    assert_eq!(*trace.borrow(), vec!["notified 7", "effect saw 7"]);
}

#[test]
fn test_actors_have_independent_queues_and_state() {
    let first = counter(0);
    let second = counter(100);

    first.send(CounterAction::Increment);
    second.send(CounterAction::Add(5));
    first.send(CounterAction::Batch);

    assert_eq!(first.state(), 3);
    assert_eq!(second.state(), 105);
    assert_eq!(second.invocations.borrow().len(), 1);
}
