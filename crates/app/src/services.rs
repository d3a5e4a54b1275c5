//! Application services: use-case implementations.
//!
//! Services accept port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod best_price_handler;
pub mod price_store;
