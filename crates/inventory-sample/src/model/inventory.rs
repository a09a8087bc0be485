//! Stock levels managed by the inventory actor.
//!
//! # State Managed
//! [`Stock`] is the `State` of the [`Inventory`](crate::inventory_actor::Inventory) actor.
//! It is never mutated directly: the actor's reducer receives a working copy, applies one
//! [`InventoryAction`](crate::inventory_actor::InventoryAction) to it, and the framework
//! commits the copy and notifies observers.

use crate::inventory_actor::InventoryError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// Type-safe stock keeping unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sku(pub String);

impl From<&str> for Sku {
    fn from(sku: &str) -> Self {
        Self(sku.to_string())
    }
}

impl Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sku_{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    /// Units available for reservation.
    pub levels: BTreeMap<Sku, u32>,
    /// Units held by reservations.
    pub reserved: BTreeMap<Sku, u32>,
    /// SKUs with a replenishment order in flight.
    pub replenishing: BTreeSet<Sku>,
    /// Every rejected request, oldest first.
    pub rejections: Vec<InventoryError>,
}

impl Stock {
    /// Creates the opening stock.
    ///
    /// # Arguments
    /// * `levels` - `(sku, units)` pairs; repeated SKUs are summed, saturating at `u32::MAX`
    pub fn with_levels(levels: impl IntoIterator<Item = (Sku, u32)>) -> Self {
        let mut stock = Self::default();
        for (sku, units) in levels {
            let level = stock.levels.entry(sku).or_insert(0);
            *level = level.saturating_add(units);
        }
        stock
    }

    pub fn level(&self, sku: &Sku) -> u32 {
        self.levels.get(sku).copied().unwrap_or(0)
    }

    pub fn reserved(&self, sku: &Sku) -> u32 {
        self.reserved.get(sku).copied().unwrap_or(0)
    }

    pub fn total_units(&self) -> u64 {
        self.levels.values().map(|&units| u64::from(units)).sum()
    }

    /// Adds `units` to the level of `sku` and returns the new level.
    ///
    /// Leaves the stock untouched if the level would exceed `u32::MAX`.
    pub fn add(&mut self, sku: Sku, units: u32) -> Result<u32, InventoryError> {
        let level = self
            .level(&sku)
            .checked_add(units)
            .ok_or_else(|| InventoryError::Overflow { sku: sku.clone() })?;
        self.levels.insert(sku, level);
        Ok(level)
    }

    /// Moves `quantity` units from available to reserved and returns what is left.
    pub fn reserve(&mut self, sku: &Sku, quantity: u32) -> Result<u32, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }
        let available = *self
            .levels
            .get(sku)
            .ok_or_else(|| InventoryError::UnknownSku(sku.clone()))?;
        if available < quantity {
            return Err(InventoryError::InsufficientStock {
                sku: sku.clone(),
                requested: quantity,
                available,
            });
        }
        let held = self
            .reserved(sku)
            .checked_add(quantity)
            .ok_or_else(|| InventoryError::Overflow { sku: sku.clone() })?;
        let remaining = available - quantity;
        self.levels.insert(sku.clone(), remaining);
        self.reserved.insert(sku.clone(), held);
        Ok(remaining)
    }

    /// Returns `quantity` reserved units to stock.
    pub fn release(&mut self, sku: &Sku, quantity: u32) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }
        let reserved = self.reserved(sku);
        if reserved < quantity {
            return Err(InventoryError::NotReserved {
                sku: sku.clone(),
                requested: quantity,
                reserved,
            });
        }
        self.add(sku.clone(), quantity)?;
        self.reserved.insert(sku.clone(), reserved - quantity);
        Ok(())
    }
}

/// How the inventory actor reacts to low stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// A reservation leaving fewer units than this raises a low-stock alert.
    pub low_stock_threshold: u32,
    /// Automatic reorder on low stock, if any.
    pub replenish: Option<Replenish>,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            replenish: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replenish {
    /// Units ordered per reorder.
    pub quantity: u32,
    /// Simulated supplier lead time.
    pub delay_ms: u64,
}

/// Raised when a reservation leaves a SKU below the low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockAlert {
    pub sku: Sku,
    pub level: u32,
}
