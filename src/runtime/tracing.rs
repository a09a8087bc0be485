//! # Observability & Tracing
//!
//! The framework logs through `tracing` with structured fields. Every line carries the actor
//! identity (`actor`), and reducer-level lines also carry `actor_type`, so one actor's
//! activity can be filtered out of a busy log.
//!
//! ## What Gets Traced
//!
//! - **Queues** (`debug`): creation, drain start with the pending count, drain end with the
//!   number of items processed
//! - **Work items** (`trace`): each item as it runs, with the action's `Debug` text
//! - **State cells** (`debug`): creation, initial state, forced writes, release
//! - **Store sweeps** (`info`): entries reclaimed from destroyed actors
//! - **Aborted drains** (`warn`): an item panicked and the rest of the queue was discarded
//!
//! ## Usage Examples
//!
//! ```bash
//! # Sweeps and aborted drains only
//! RUST_LOG=info cargo run
//!
//! # Queue lifecycle
//! RUST_LOG=state_managed=debug cargo run
//!
//! # Every work item, with action payloads
//! RUST_LOG=state_managed=trace cargo run
//! ```
//!
//! Action payloads are only formatted when `trace` is enabled for the framework.
//!
//! **With `RUST_LOG=debug`**:
//!
//! ```text
//! DEBUG State cell created actor=actor@0x6000024e4010 size=1
//! DEBUG Initial state set actor_type="Inventory" actor=actor@0x6000024e4010
//! DEBUG Queue created actor=actor@0x6000024e4010
//! DEBUG Drain started pending=1
//! DEBUG Drain finished actor=actor@0x6000024e4010 processed=4
//! ```

/// Initializes the tracing/logging infrastructure for the application.
///
/// - **Environment-based filtering**: controlled via the `RUST_LOG` environment variable
/// - **Compact format**: spans inline, no module path prefix
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
