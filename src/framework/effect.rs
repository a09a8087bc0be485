//! # Effects
//!
//! What a reducer hands back besides the new state. An effect never runs inside the reducer
//! that produced it: it is queued behind the reducer's own work item and runs once the new
//! state is committed and its observers have been notified.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

pub(crate) type Deferred = Box<dyn FnOnce()>;
pub(crate) type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Deferred follow-up work produced by processing an action.
#[derive(Default)]
pub enum Effect {
    /// No side effect.
    #[default]
    None,
    /// A synchronous callback, run as its own work item on the actor's queue.
    Run(Deferred),
    /// An async body. When its work item is reached it is spawned onto the current
    /// `tokio::task::LocalSet`; the queue does not wait for it to finish.
    Task(LocalTask),
}

impl Effect {
    pub fn none() -> Self {
        Effect::None
    }

    pub fn run(f: impl FnOnce() + 'static) -> Self {
        Effect::Run(Box::new(f))
    }

    pub fn task(future: impl Future<Output = ()> + 'static) -> Self {
        Effect::Task(Box::pin(future))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => f.write_str("Effect::None"),
            Effect::Run(_) => f.write_str("Effect::Run(..)"),
            Effect::Task(_) => f.write_str("Effect::Task(..)"),
        }
    }
}
