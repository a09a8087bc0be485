//! Type-safe wrappers around actor handles.

pub mod inventory_client;

pub use inventory_client::InventoryClient;
