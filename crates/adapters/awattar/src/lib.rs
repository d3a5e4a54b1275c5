//! # wattwise-adapter-awattar
//!
//! aWATTar adapter: fetches day-ahead market prices and turns them into
//! [`PriceQuote`]s.
//!
//! ## Responsibilities
//! - Query `/v1/marketdata` for a time window
//! - Decode the JSON payload ([`dto`])
//! - Convert EUR/MWh exchange prices into ct/kWh quotes with VAT and base price
//!
//! ## Dependency rule
//! Depends on `wattwise-app` (for the [`PriceSource`] port) and
//! `wattwise-domain`. Never imported by the app layer.

pub mod config;
pub mod dto;
pub mod error;

use std::future::Future;
use std::time::Duration;

use wattwise_app::ports::PriceSource;
use wattwise_domain::error::WattwiseError;
use wattwise_domain::price::PriceQuote;
use wattwise_domain::time::TimeRange;

pub use config::{AwattarConfig, Country};
pub use error::AwattarError;

use dto::MarketData;

/// [`PriceSource`] backed by the aWATTar HTTP API.
#[derive(Debug, Clone)]
pub struct AwattarApi {
    client: reqwest::Client,
    endpoint: String,
    config: AwattarConfig,
}

impl AwattarApi {
    /// Build a client for the configured country.
    ///
    /// # Errors
    ///
    /// Returns [`AwattarError::Http`] if the HTTP client cannot be built.
    pub fn new(config: AwattarConfig) -> Result<Self, AwattarError> {
        let endpoint = config.country.endpoint().to_string();
        Self::with_endpoint(config, endpoint)
    }

    /// Build a client against a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AwattarError::Http`] if the HTTP client cannot be built.
    pub fn with_endpoint(
        config: AwattarConfig,
        endpoint: impl Into<String>,
    ) -> Result<Self, AwattarError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AwattarError::Http)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            config,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_quotes(&self, window: TimeRange) -> Result<Vec<PriceQuote>, AwattarError> {
        let start = window.start().timestamp_millis();
        let end = window.end().timestamp_millis();
        tracing::debug!(endpoint = %self.endpoint, start, end, "requesting aWATTar market data");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("start", start), ("end", end)])
            .send()
            .await
            .map_err(AwattarError::Http)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "aWATTar request rejected");
            return Err(AwattarError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(AwattarError::Http)?;
        let quotes = MarketData::from_json(&body)?.into_quotes(&self.config)?;
        tracing::debug!(count = quotes.len(), "decoded aWATTar market data");
        Ok(quotes)
    }
}

impl PriceSource for AwattarApi {
    fn fetch(
        &self,
        window: TimeRange,
    ) -> impl Future<Output = Result<Vec<PriceQuote>, WattwiseError>> + Send {
        async move { self.fetch_quotes(window).await.map_err(WattwiseError::from) }
    }
}
