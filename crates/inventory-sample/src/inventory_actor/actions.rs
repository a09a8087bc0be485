//! Actions accepted by the Inventory actor.
//!
//! Every action is processed by [`Inventory::process`](super::Inventory) one at a time, in
//! submission order. [`InventoryAction::BatchReserve`] fans out into one
//! [`InventoryAction::Reserve`] per line; those run after the batch itself has been committed.

use crate::model::Sku;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryAction {
    /// Adds units to a SKU, creating it if needed.
    ///
    /// Also ends any replenishment in flight for the SKU.
    Restock { sku: Sku, quantity: u32 },
    /// Holds units for an order.
    ///
    /// # Errors
    /// Rejected with [`InventoryError`](super::InventoryError) when the SKU is unknown, the
    /// quantity is zero, or not enough units are available.
    Reserve { sku: Sku, quantity: u32 },
    /// Returns previously reserved units to stock.
    Release { sku: Sku, quantity: u32 },
    /// Reserves several lines. Each line succeeds or fails on its own.
    BatchReserve(Vec<(Sku, u32)>),
}
