//! # Inventory Actor
//!
//! Stock management for a single warehouse, built on the state-managed contract.
//!
//! ## Structure
//!
//! - [`entity`] - [`StateManaged`](state_managed::StateManaged) implementation for [`Inventory`]
//! - [`error`] - [`InventoryError`], recorded in state when a request is rejected
//! - [`actions`] - [`InventoryAction`]
//! - [`new()`] - Factory that creates the actor and seeds its opening stock
//!
//! ## Usage
//!
//! ```rust
//! use inventory_sample::inventory_actor::{self, InventoryAction};
//! use inventory_sample::model::{InventorySettings, Sku, Stock};
//! use state_managed::StateManagedExt;
//!
//! let widget = Sku::from("widget");
//! let actor = inventory_actor::new(
//!     InventorySettings::default(),
//!     Stock::with_levels([(widget.clone(), 10)]),
//! );
//!
//! actor.send(InventoryAction::Reserve { sku: widget.clone(), quantity: 3 });
//! assert_eq!(actor.state().level(&widget), 7);
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::{InventorySettings, LowStockAlert, Stock};
use state_managed::StateManagedExt;
use std::cell::RefCell;
use std::rc::Rc;

/// The inventory actor. Its [`Stock`] lives in the state store, not in this struct.
#[derive(Debug, Default)]
pub struct Inventory {
    settings: InventorySettings,
    alerts: RefCell<Vec<LowStockAlert>>,
}

impl Inventory {
    pub fn settings(&self) -> &InventorySettings {
        &self.settings
    }

    /// Low-stock alerts raised so far, oldest first.
    pub fn alerts(&self) -> Vec<LowStockAlert> {
        self.alerts.borrow().clone()
    }
}

/// Creates a new Inventory actor holding `opening` stock.
pub fn new(settings: InventorySettings, opening: Stock) -> Rc<Inventory> {
    let actor = Rc::new(Inventory {
        settings,
        alerts: RefCell::new(Vec::new()),
    });
    actor.set_initial_state(opening);
    actor
}
