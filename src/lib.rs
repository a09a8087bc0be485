#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # State Managed
//!
//! > **Serialized, observable state for single-threaded actors.**
//!
//! An *actor* here is any object that owns a piece of state and changes it only by
//! processing actions. This crate guarantees that, per actor:
//!
//! - exactly one action is processed at a time, including actions sent from inside a
//!   running reducer;
//! - actions run in the order they were submitted;
//! - effects scheduled by a reducer run after its state is committed, but before work
//!   queued later;
//! - observers see every committed state.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Cooperative, not parallel
//! Everything runs on one dispatch thread. `send` never blocks and never suspends: if the
//! actor is idle, the action (and everything it triggers) is processed before `send`
//! returns; if the actor is busy further up the stack, the action is queued and the running
//! drain picks it up.
//!
//! ### State lives beside the actor
//! An actor does not store its own state. The framework keeps it in a store keyed by the
//! actor's identity that holds the actor only weakly, so the actor type stays a plain struct
//! and its state disappears with it.
//!
//! ## 🚀 Core Concepts
//!
//! ```rust
//! use state_managed::{ActorContext, Effect, StateManaged, StateManagedExt};
//! use std::rc::Rc;
//!
//! struct Counter;
//!
//! #[derive(Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! impl StateManaged for Counter {
//!     type State = i64;
//!     type Action = CounterAction;
//!
//!     fn process(&self, state: &mut i64, action: CounterAction, _ctx: &ActorContext<Self>) -> Effect {
//!         match action {
//!             CounterAction::Increment => *state += 1,
//!         }
//!         Effect::none()
//!     }
//! }
//!
//! let counter = Rc::new(Counter);
//! counter.set_initial_state(0);
//! counter.send(CounterAction::Increment);
//! assert_eq!(counter.state(), 1);
//! ```
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Per-actor queues
//! Every actor identity gets its own FIFO queue, created on the first submit and removed as
//! soon as it drains empty. Queues of different actors are independent: there is no
//! ordering between them.
//!
//! ### 2. Thread-local registries
//! Actors are `Rc` handles, so the queue registry and the state store are thread-local.
//! "Process-wide" means "per dispatch thread"; an application is expected to drive all of
//! its actors from one thread.
//!
//! ### 3. Faults
//! Reading state before `set_initial_state` and initializing twice are programmer errors and
//! panic. The `try_*` variants return [`StateError`] instead. Panics raised by a reducer are
//! not caught.
//!
//! ### 4. Observability
//! We use `tracing` with structured fields everywhere. See the [`runtime::tracing`] module.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Queues, state store, observable cells and the actor contract.
//! - **Key items**: [`StateManaged`], [`StateManagedExt`], [`Effect`], [`ObservableCell`].
//!
//! ### 2. The Runtime ([`runtime`])
//! - **Role**: Logging setup and configuration for the embedding application.
//! - **Key items**: [`setup_tracing`](runtime::setup_tracing), [`Config`](runtime::Config).
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod framework;
pub mod runtime;

pub use framework::{
    release_state, ActorContext, ActorId, Effect, ObservableCell, StateError, StateManaged,
    StateManagedExt, Subscription,
};
