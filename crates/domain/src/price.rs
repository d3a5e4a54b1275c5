//! A single price quote for a fixed time range.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::TimeRange;

/// Price components for one [`TimeRange`].
///
/// Market prices come straight from the exchange, totals add the supplier's
/// base price. The `gross_*` variants include VAT. Selection uses
/// [`net_price`](Self::net_price).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub range: TimeRange,
    pub net_market: f64,
    pub gross_market: f64,
    pub net_total: f64,
    pub gross_total: f64,
}

impl PriceQuote {
    /// Create a quote with all four components.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFinitePrice`] if any component is NaN
    /// or infinite.
    pub fn new(
        range: TimeRange,
        net_market: f64,
        gross_market: f64,
        net_total: f64,
        gross_total: f64,
    ) -> Result<Self, ValidationError> {
        let all_finite = [net_market, gross_market, net_total, gross_total]
            .iter()
            .all(|p| p.is_finite());
        if !all_finite {
            return Err(ValidationError::NonFinitePrice);
        }
        Ok(Self {
            range,
            net_market,
            gross_market,
            net_total,
            gross_total,
        })
    }

    /// Create a quote where every component carries the same value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFinitePrice`] if `price` is not finite.
    pub fn flat(range: TimeRange, price: f64) -> Result<Self, ValidationError> {
        Self::new(range, price, price, price, price)
    }

    /// The price used to rank quotes against each other.
    #[must_use]
    pub fn net_price(&self) -> f64 {
        self.net_market
    }
}
