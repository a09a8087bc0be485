//! Serialized state management for single-threaded actors.
//!
//! This module provides the building blocks that let an actor own a piece of state and change
//! it only through actions processed one at a time.
//!
//! # Main Components
//!
//! - [`StateManaged`] - Trait that actor types implement (state, action, reducer)
//! - [`StateManagedExt`] - The public operations, available on every `Rc<A>`
//! - [`queue`] - Per-identity FIFO dispatch queues and their registry
//! - [`store`] - Identity-keyed state cells that never keep an actor alive
//! - [`ObservableCell`] - A value slot that publishes every write
//! - [`StateError`] - Lifecycle precondition violations
//!
//! # Testing
//!
//! See [`mock`] module for utilities to assert on state notifications.

pub mod contract;
pub mod effect;
pub mod error;
pub mod identity;
pub mod mock;
pub mod observable;
pub mod queue;
pub mod store;

// Re-export core types for convenience
pub use contract::{release_state, ActorContext, StateManaged, StateManagedExt};
pub use effect::Effect;
pub use error::StateError;
pub use identity::ActorId;
pub use observable::{ObservableCell, ObserverRegistry, ObserverToken, Subscription};
