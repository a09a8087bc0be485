//! # Framework Errors
//!
//! The only failures the framework itself reports are lifecycle precondition violations.
//! The `try_*` operations return them as values; the plain operations treat them as
//! programmer errors and panic with the same message.

use crate::framework::identity::{short_type_name, ActorId};

/// Precondition violations on an actor's state lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("state of {actor_type} ({actor}) read before set_initial_state")]
    NotInitialized {
        actor_type: &'static str,
        actor: ActorId,
    },
    #[error("state of {actor_type} ({actor}) is already initialized")]
    AlreadyInitialized {
        actor_type: &'static str,
        actor: ActorId,
    },
}

impl StateError {
    pub(crate) fn not_initialized<A>(actor: ActorId) -> Self {
        StateError::NotInitialized {
            actor_type: short_type_name::<A>(),
            actor,
        }
    }

    pub(crate) fn already_initialized<A>(actor: ActorId) -> Self {
        StateError::AlreadyInitialized {
            actor_type: short_type_name::<A>(),
            actor,
        }
    }
}
