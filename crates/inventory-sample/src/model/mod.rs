//! Domain models for the inventory sample.

pub mod inventory;

pub use inventory::*;
