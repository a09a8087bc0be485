//! [`StateManaged`] implementation for the [`Inventory`] actor.
//!
//! The reducer applies one [`InventoryAction`] to the working copy of [`Stock`]. A reservation
//! that drops a SKU below the low-stock threshold raises a [`LowStockAlert`] as an effect, which
//! runs after the new stock has been committed and observers have seen it.

use super::actions::InventoryAction;
use super::error::InventoryError;
use super::Inventory;
use crate::model::{LowStockAlert, Replenish, Sku, Stock};
use state_managed::{ActorContext, Effect, StateManaged, StateManagedExt};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

impl StateManaged for Inventory {
    type State = Stock;
    type Action = InventoryAction;

    fn process(&self, stock: &mut Stock, action: InventoryAction, ctx: &ActorContext<Self>) -> Effect {
        match action {
            InventoryAction::Restock { sku, quantity } => {
                if quantity == 0 {
                    reject(stock, InventoryError::InvalidQuantity(quantity));
                    return Effect::none();
                }
                match stock.add(sku.clone(), quantity) {
                    Ok(level) => {
                        stock.replenishing.remove(&sku);
                        debug!(%sku, quantity, level, "Restocked");
                    }
                    Err(e) => reject(stock, e),
                }
                Effect::none()
            }
            InventoryAction::Reserve { sku, quantity } => match stock.reserve(&sku, quantity) {
                Ok(remaining) => {
                    debug!(%sku, quantity, remaining, "Reserved");
                    if remaining < self.settings.low_stock_threshold
                        && stock.replenishing.insert(sku.clone())
                    {
                        self.low_stock(ctx.actor(), sku, remaining)
                    } else {
                        Effect::none()
                    }
                }
                Err(e) => {
                    reject(stock, e);
                    Effect::none()
                }
            },
            InventoryAction::Release { sku, quantity } => {
                if let Err(e) = stock.release(&sku, quantity) {
                    reject(stock, e);
                } else {
                    debug!(%sku, quantity, "Released");
                }
                Effect::none()
            }
            InventoryAction::BatchReserve(lines) => {
                debug!(lines = lines.len(), "Splitting batch reservation");
                for (sku, quantity) in lines {
                    ctx.send(InventoryAction::Reserve { sku, quantity });
                }
                Effect::none()
            }
        }
    }
}

impl Inventory {
    /// Records the alert and, when configured, schedules a delayed restock.
    fn low_stock(&self, actor: &Rc<Inventory>, sku: Sku, level: u32) -> Effect {
        let actor = actor.clone();
        let replenish = self.settings.replenish.clone();
        Effect::run(move || {
            warn!(%sku, level, "Low stock");
            actor.alerts.borrow_mut().push(LowStockAlert {
                sku: sku.clone(),
                level,
            });

            if let Some(Replenish { quantity, delay_ms }) = replenish {
                info!(%sku, quantity, delay_ms, "Ordering replenishment");
                let target = actor.clone();
                actor.run_after_process_task(async move {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    target.send(InventoryAction::Restock { sku, quantity });
                });
            }
        })
    }
}

fn reject(stock: &mut Stock, error: InventoryError) {
    warn!(error = %error, "Request rejected");
    stock.rejections.push(error);
}
