//! Error types for the Inventory actor.

use crate::model::Sku;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a stock request is rejected.
///
/// Rejections never abort a drain: the reducer records them in
/// [`Stock::rejections`](crate::model::Stock::rejections) and carries on with the next action.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryError {
    /// The SKU has never been stocked.
    #[error("Unknown SKU: {0}")]
    UnknownSku(Sku),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock for {sku}: requested {requested}, available {available}")]
    InsufficientStock {
        sku: Sku,
        requested: u32,
        available: u32,
    },

    /// More units were released than are currently reserved.
    #[error("Cannot release {requested} of {sku}: only {reserved} reserved")]
    NotReserved {
        sku: Sku,
        requested: u32,
        reserved: u32,
    },

    /// The change would push a count past `u32::MAX`.
    #[error("Stock count of {sku} would overflow")]
    Overflow { sku: Sku },

    /// Quantities must be positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// The request was queued behind the action currently being processed, so its outcome is
    /// not known yet.
    #[error("Request queued behind the action in progress")]
    Pending,
}
