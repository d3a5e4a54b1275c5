//! Price source port: fetches raw quotes from a market-data provider.

use std::future::Future;

use wattwise_domain::error::WattwiseError;
use wattwise_domain::price::PriceQuote;
use wattwise_domain::time::TimeRange;

/// Supplies quotes for a time window.
///
/// Implementations live in adapter crates (e.g. `wattwise-adapter-awattar`). A failed
/// fetch must return an error rather than a partial list; the store keeps
/// its previous series in that case.
pub trait PriceSource: Send + Sync {
    /// Fetch every quote the provider has inside `window`.
    fn fetch(
        &self,
        window: TimeRange,
    ) -> impl Future<Output = Result<Vec<PriceQuote>, WattwiseError>> + Send;
}

impl<T: PriceSource> PriceSource for std::sync::Arc<T> {
    fn fetch(
        &self,
        window: TimeRange,
    ) -> impl Future<Output = Result<Vec<PriceQuote>, WattwiseError>> + Send {
        (**self).fetch(window)
    }
}
