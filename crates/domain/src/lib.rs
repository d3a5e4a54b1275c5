//! # wattwise-domain
//!
//! Pure domain model for wattwise, a best-price scheduler for electricity
//! spot-market prices.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, half-open time ranges
//! - Define **price quotes** and the ordered, disjoint **price series**
//! - Select the **best-price window** (consecutive or scattered) inside a horizon
//! - Derive **channel** values (start, end, hours, active, countdown, remaining)
//! - Define **events** published when channels or prices change
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod best_price;
pub mod channel;
pub mod event;
pub mod price;
pub mod price_series;

#[cfg(test)]
mod test_support;
