//! Best-price handler: one configured best-price thing bound to the shared
//! price store.
//!
//! Every refresh re-runs the selection against the current store snapshot
//! and the time provider's "now", then pushes the requested channel values
//! into a [`StateSink`]. Nothing is cached between refreshes.

use std::sync::Arc;

use wattwise_domain::best_price::{BestPriceConfig, BestPriceResult};
use wattwise_domain::channel::{ChannelId, ChannelState, ChannelUid};
use wattwise_domain::error::WattwiseError;
use wattwise_domain::time::Timestamp;

use crate::ports::{StateSink, TimeProvider};
use crate::services::price_store::PriceStore;

pub struct BestPriceHandler<T> {
    thing: String,
    config: BestPriceConfig,
    store: Arc<PriceStore>,
    time: T,
}

impl<T: TimeProvider> BestPriceHandler<T> {
    /// Bind a validated configuration to the shared store.
    ///
    /// # Errors
    ///
    /// Returns [`WattwiseError::Config`] when the configuration can never
    /// produce a window.
    pub fn new(
        thing: impl Into<String>,
        config: BestPriceConfig,
        store: Arc<PriceStore>,
        time: T,
    ) -> Result<Self, WattwiseError> {
        config.validate()?;
        Ok(Self {
            thing: thing.into(),
            config,
            store,
            time,
        })
    }

    #[must_use]
    pub fn thing(&self) -> &str {
        &self.thing
    }

    #[must_use]
    pub fn config(&self) -> &BestPriceConfig {
        &self.config
    }

    /// Run the selection at `now`.
    fn evaluate_at(&self, now: Timestamp) -> Option<BestPriceResult> {
        let anchor = self.time.start_of(self.config.range_start)?;
        let horizon = self.config.horizon(anchor, now)?;
        let series = self.store.snapshot();
        let result = self.config.select(series.quotes_within(&horizon));
        if result.is_none() {
            tracing::debug!(thing = %self.thing, %horizon, "no best-price window in horizon");
        }
        result
    }

    /// The best-price window as of the time provider's "now", if any.
    #[must_use]
    pub fn evaluate(&self) -> Option<BestPriceResult> {
        self.evaluate_at(self.time.now())
    }

    /// Current value of a single channel.
    #[must_use]
    pub fn channel_state(&self, channel: ChannelId) -> ChannelState {
        let now = self.time.now();
        self.evaluate_at(now).map_or(ChannelState::Undefined, |result| {
            result.channel_state(channel, now, &self.time.zone())
        })
    }

    /// Compute `channel` and push it to `sink`.
    pub fn refresh_channel(&self, channel: ChannelId, sink: &impl StateSink) {
        let state = self.channel_state(channel);
        sink.state_updated(&ChannelUid::new(self.thing.as_str(), channel), state);
    }

    /// Compute every channel from a single evaluation and push them to `sink`.
    pub fn refresh_all(&self, sink: &impl StateSink) {
        let now = self.time.now();
        let zone = self.time.zone();
        let result = self.evaluate_at(now);
        for channel in ChannelId::ALL {
            let state = result.as_ref().map_or(ChannelState::Undefined, |result| {
                result.channel_state(channel, now, &zone)
            });
            sink.state_updated(&ChannelUid::new(self.thing.as_str(), channel), state);
        }
    }
}
