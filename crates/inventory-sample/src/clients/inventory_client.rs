//! # Inventory Client
//!
//! Provides a request/response API on top of the [`Inventory`] actor.
//!
//! `send` does not return a value, so the client reads the outcome back from the committed
//! [`Stock`]: a request that added an entry to [`Stock::rejections`] failed with that error.
//! When called while the actor is already processing (from an observer or an effect), the
//! request is only queued and the client answers [`InventoryError::Pending`].
use crate::inventory_actor::{Inventory, InventoryAction, InventoryError};
use crate::model::{Sku, Stock};
use state_managed::framework::queue;
use state_managed::StateManagedExt;
use std::rc::Rc;
use tracing::{debug, instrument};

/// Client for interacting with the Inventory actor.
#[derive(Clone)]
pub struct InventoryClient {
    actor: Rc<Inventory>,
}

impl InventoryClient {
    pub fn new(actor: Rc<Inventory>) -> Self {
        Self { actor }
    }

    pub fn actor(&self) -> &Rc<Inventory> {
        &self.actor
    }

    /// Adds `quantity` units of `sku`.
    #[instrument(skip(self, sku), fields(sku = %sku))]
    pub fn restock(&self, sku: &Sku, quantity: u32) -> Result<u32, InventoryError> {
        debug!("Sending request");
        self.request(InventoryAction::Restock {
            sku: sku.clone(),
            quantity,
        })?;
        Ok(self.level(sku))
    }

    /// Reserves `quantity` units of `sku`.
    ///
    /// Returns the units left available on success.
    #[instrument(skip(self, sku), fields(sku = %sku))]
    pub fn reserve(&self, sku: &Sku, quantity: u32) -> Result<u32, InventoryError> {
        debug!("Sending request");
        self.request(InventoryAction::Reserve {
            sku: sku.clone(),
            quantity,
        })?;
        Ok(self.level(sku))
    }

    #[instrument(skip(self, sku), fields(sku = %sku))]
    pub fn release(&self, sku: &Sku, quantity: u32) -> Result<(), InventoryError> {
        debug!("Sending request");
        self.request(InventoryAction::Release {
            sku: sku.clone(),
            quantity,
        })
    }

    /// Reserves every line of an order.
    ///
    /// Lines are independent; the returned errors belong to the lines that were rejected,
    /// in line order.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub fn batch_reserve(&self, lines: Vec<(Sku, u32)>) -> Result<Vec<InventoryError>, InventoryError> {
        debug!("Sending request");
        let before = self.rejection_count();
        self.actor.send(InventoryAction::BatchReserve(lines));
        if queue::is_draining(self.actor.actor_id()) {
            return Err(InventoryError::Pending);
        }
        Ok(self
            .actor
            .with_state(|stock| stock.rejections[before..].to_vec()))
    }

    pub fn level(&self, sku: &Sku) -> u32 {
        self.actor.with_state(|stock| stock.level(sku))
    }

    pub fn reserved(&self, sku: &Sku) -> u32 {
        self.actor.with_state(|stock| stock.reserved(sku))
    }

    pub fn snapshot(&self) -> Stock {
        self.actor.state()
    }

    fn rejection_count(&self) -> usize {
        self.actor.with_state(|stock| stock.rejections.len())
    }

    fn request(&self, action: InventoryAction) -> Result<(), InventoryError> {
        let before = self.rejection_count();
        self.actor.send(action);
        if queue::is_draining(self.actor.actor_id()) {
            return Err(InventoryError::Pending);
        }
        self.actor.with_state(|stock| match stock.rejections.get(before) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        })
    }
}
