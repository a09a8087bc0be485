//! # Inventory Sample
//!
//! Scripted demo of the state-managed contract.
//!
//! ## 📚 What it shows
//!
//! 1. Setting up the [`InventorySystem`] on a single dispatch thread.
//! 2. Reserving stock, including a batch that re-enters the actor's queue.
//! 3. A low-stock alert triggering an asynchronous replenishment.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p inventory-sample
//! ```

use inventory_sample::lifecycle::InventorySystem;
use inventory_sample::model::{InventorySettings, Replenish, Sku, Stock};
use state_managed::runtime::{configure, setup_tracing, Config};
use std::time::Duration;
use tokio::task::LocalSet;
use tracing::{error, info, Instrument};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    configure(&Config::from_env()?);

    info!("Starting inventory demo");

    LocalSet::new().run_until(run_demo()).await;

    info!("Application completed successfully");
    Ok(())
}

async fn run_demo() {
    let widget = Sku::from("widget");
    let gadget = Sku::from("gadget");
    let settings = InventorySettings {
        low_stock_threshold: 5,
        replenish: Some(Replenish {
            quantity: 20,
            delay_ms: 50,
        }),
    };
    let system = InventorySystem::new(
        settings,
        Stock::with_levels([(widget.clone(), 12), (gadget.clone(), 3)]),
    );
    let client = &system.inventory_client;

    let span = tracing::info_span!("single_reservation");
    span.in_scope(|| match client.reserve(&widget, 4) {
        Ok(left) => info!(sku = %widget, left, "Reservation accepted"),
        Err(e) => error!(error = %e, "Reservation failed"),
    });

    let span = tracing::info_span!("batch_reservation");
    span.in_scope(|| {
        match client.batch_reserve(vec![(widget.clone(), 5), (gadget.clone(), 10)]) {
            Ok(rejected) => {
                for e in &rejected {
                    error!(error = %e, "Batch line rejected");
                }
                info!(rejected = rejected.len(), "Batch processed");
            }
            Err(e) => error!(error = %e, "Batch failed"),
        }
    });

    let span = tracing::info_span!("replenishment");
    async {
        info!(alerts = system.actor().alerts().len(), "Waiting for supplier");
        tokio::time::sleep(Duration::from_millis(100)).await;
        info!(sku = %widget, level = client.level(&widget), "Stock after replenishment");
    }
    .instrument(span)
    .await;

    let reclaimed = system.shutdown();
    info!(reclaimed, "Demo finished");
}
