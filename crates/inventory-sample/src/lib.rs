//! # Inventory Sample
//!
//! A small warehouse built on `state-managed`: one [`Inventory`](inventory_actor::Inventory)
//! actor whose stock lives in the state store, a client that turns sends into
//! request/response calls, and a lifecycle wrapper.

pub mod clients;
pub mod inventory_actor;
pub mod lifecycle;
pub mod model;
