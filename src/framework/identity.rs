//! # Actor Identity
//!
//! Every registry in the framework is keyed by [`ActorId`], a token derived from *where*
//! an actor lives rather than *what* it holds. Two actors with equal state are still two
//! different identities.

use std::fmt;
use std::rc::Rc;

/// Stable, hashable identity of one actor instance.
///
/// The id is the address of the actor inside its `Rc` allocation. It never keeps the
/// actor alive. The state store and every dispatch queue hold a `Weak` to their actor,
/// which pins the allocation (but not the value), so an id cannot be handed out to a new
/// actor while a store entry or a queue for the old one still exists.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(usize);

impl ActorId {
    /// Identity of the actor behind an `Rc` handle.
    pub fn of<A: ?Sized>(actor: &Rc<A>) -> Self {
        Self(Rc::as_ptr(actor) as *const () as usize)
    }

    /// Identity of an actor reached by plain reference.
    ///
    /// Returns the same id as [`ActorId::of`] for an actor stored in an `Rc`, which makes
    /// it usable from a `Drop` impl where only `&mut self` is available.
    pub fn of_ref<A: ?Sized>(actor: &A) -> Self {
        Self(actor as *const A as *const () as usize)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor@{:#x}", self.0)
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Last path segment of a type name, e.g. `Counter` instead of `my_app::model::Counter`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Strip generic arguments before taking the last segment.
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        _value: u8,
    }

    #[test]
    fn test_rc_and_ref_identity_agree() {
        let actor = Rc::new(Sample { _value: 1 });
        assert_eq!(ActorId::of(&actor), ActorId::of_ref(&*actor));
    }

    #[test]
    fn test_clones_share_identity_and_equal_values_do_not() {
        let a = Rc::new(Sample { _value: 1 });
        let b = Rc::new(Sample { _value: 1 });
        assert_eq!(ActorId::of(&a), ActorId::of(&a.clone()));
        assert_ne!(ActorId::of(&a), ActorId::of(&b));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Sample>(), "Sample");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }
}
