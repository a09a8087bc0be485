//! # System Lifecycle
//!
//! Wires the inventory actor, its client and an audit observer together, and tears them down.
//!
//! ## Wiring
//!
//! ```rust
//! use inventory_sample::lifecycle::InventorySystem;
//! use inventory_sample::model::{InventorySettings, Sku, Stock};
//!
//! let system = InventorySystem::new(
//!     InventorySettings::default(),
//!     Stock::with_levels([(Sku::from("widget"), 10)]),
//! );
//! system.inventory_client.reserve(&Sku::from("widget"), 2).unwrap();
//! assert_eq!(system.shutdown(), 1);
//! ```
//!
//! ## Shutdown
//!
//! Actors are plain `Rc` values, so there is no task to join. Shutdown drops the client, the
//! actor handle and the audit subscription, then purges the state store. The count it returns
//! is the number of state entries reclaimed; an effect task still holding the actor keeps its
//! entry alive until the next sweep.
//!
//! Observers registered here must not capture the actor: the store owns the observer list,
//! and an observer owning the actor would keep it alive forever.

use crate::clients::InventoryClient;
use crate::inventory_actor::{self, Inventory};
use crate::model::{InventorySettings, Stock};
use state_managed::framework::store;
use state_managed::{StateManagedExt, Subscription};
use std::rc::Rc;
use tracing::{debug, info};

pub struct InventorySystem {
    pub inventory_client: InventoryClient,
    actor: Rc<Inventory>,
    _audit: Subscription,
}

impl InventorySystem {
    pub fn new(settings: InventorySettings, opening: Stock) -> Self {
        let actor = inventory_actor::new(settings, opening);
        info!(actor = %actor.actor_id(), "Inventory actor ready");

        let audit = actor.observe_state(|stock: &Stock| {
            debug!(
                total_units = stock.total_units(),
                replenishing = stock.replenishing.len(),
                rejections = stock.rejections.len(),
                "Stock committed"
            );
        });

        Self {
            inventory_client: InventoryClient::new(actor.clone()),
            actor,
            _audit: audit,
        }
    }

    pub fn actor(&self) -> &Rc<Inventory> {
        &self.actor
    }

    /// Drops every handle and returns how many state entries were reclaimed.
    pub fn shutdown(self) -> usize {
        let id = self.actor.actor_id();
        drop(self);
        let reclaimed = store::purge();
        info!(actor = %id, reclaimed, "Inventory system shut down");
        reclaimed
    }
}
