//! # wattwise-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement (driven/outbound ports):
//!   - `PriceSource`: fetch quotes for a time window
//!   - `TimeProvider`: "now", the local zone and the daily horizon anchor
//!   - `StateSink`: receives computed channel values
//!   - `EventPublisher`: publishes domain events
//! - Define **driving/inbound** use-cases:
//!   - `PriceStore`: the shared price series and its refresh policy
//!   - `BestPriceHandler`: one best-price thing, deriving its channels
//! - Provide **in-process infrastructure** (event bus, system clock) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `wattwise-domain` only (plus `tokio::sync` for channels and
//! locks). Never imports adapter crates.

pub mod clock;
pub mod event_bus;
pub mod ports;
pub mod services;
