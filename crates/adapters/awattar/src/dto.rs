//! Wire format of the aWATTar market-data API.

use serde::Deserialize;

use wattwise_domain::error::ValidationError;
use wattwise_domain::price::PriceQuote;
use wattwise_domain::time::TimeRange;

use crate::config::AwattarConfig;
use crate::error::AwattarError;

/// Top-level `/v1/marketdata` document.
#[derive(Debug, Deserialize)]
pub struct MarketData {
    pub data: Vec<MarketPrice>,
}

/// One day-ahead price, in EUR/MWh.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketPrice {
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub marketprice: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

impl MarketData {
    /// Decode a response body.
    ///
    /// # Errors
    ///
    /// Returns [`AwattarError::Decode`] for malformed JSON.
    pub fn from_json(body: &str) -> Result<Self, AwattarError> {
        serde_json::from_str(body).map_err(AwattarError::Decode)
    }

    /// Convert every entry with [`MarketPrice::to_quote`].
    ///
    /// # Errors
    ///
    /// Fails on the first entry with an invalid range or price.
    pub fn into_quotes(self, config: &AwattarConfig) -> Result<Vec<PriceQuote>, AwattarError> {
        self.data
            .iter()
            .map(|entry| entry.to_quote(config))
            .collect::<Result<Vec<_>, _>>()
            .map_err(AwattarError::Domain)
    }
}

impl MarketPrice {
    /// Validity range of this price.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for unrepresentable or empty bounds.
    pub fn range(&self) -> Result<TimeRange, ValidationError> {
        TimeRange::from_millis(self.start_timestamp, self.end_timestamp)
    }

    /// Turn the exchange price into a quote in ct/kWh, adding VAT and the
    /// supplier's base price.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty range or a non-finite price.
    pub fn to_quote(&self, config: &AwattarConfig) -> Result<PriceQuote, ValidationError> {
        let vat = config.vat_factor();
        let net_market = self.marketprice / 10.0;
        let net_total = net_market + config.base_price;
        PriceQuote::new(
            self.range()?,
            net_market,
            net_market * vat,
            net_total,
            net_total * vat,
        )
    }
}
