//! Runtime setup for an embedding application.
//!
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure
//! - [`Config`] / [`configure`] - Tunes the calling thread's registries

pub mod config;
pub mod tracing;

pub use self::config::*;
pub use self::tracing::*;
