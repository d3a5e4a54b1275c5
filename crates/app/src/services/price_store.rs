//! Price store: the shared, atomically swapped price series.
//!
//! One store is shared by every best-price handler. Readers take a cheap
//! `Arc` snapshot; a refresh builds a complete new series off to the side and
//! swaps the pointer, so nobody ever observes a half-written series.
//! Refreshes are serialised by an async mutex held across the fetch.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{Days, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;

use wattwise_domain::error::WattwiseError;
use wattwise_domain::price::PriceQuote;
use wattwise_domain::price_series::PriceSeries;
use wattwise_domain::time::{TimeRange, Timestamp};

use crate::ports::{PriceSource, TimeProvider};

/// Local hour after which next-day prices are expected to be published.
pub const PUBLICATION_HOUR: u32 = 15;

/// Outcome of [`PriceStore::refresh_if_needed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The current series was still good enough.
    Skipped,
    /// A new series with this many quotes replaced the old one.
    Replaced(usize),
    /// The source returned nothing; the old series was kept.
    Empty,
}

#[derive(Default)]
pub struct PriceStore {
    series: RwLock<Arc<PriceSeries>>,
    refresh_lock: Mutex<()>,
}

impl PriceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `series`.
    #[must_use]
    pub fn with_series(series: PriceSeries) -> Self {
        Self {
            series: RwLock::new(Arc::new(series)),
            refresh_lock: Mutex::new(()),
        }
    }

    /// The current series. Later swaps do not affect the returned snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<PriceSeries> {
        let guard = self.series.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a new series wholesale.
    pub fn replace_all(&self, series: PriceSeries) {
        let mut guard = self.series.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(series);
    }

    #[must_use]
    pub fn price_for(&self, instant: Timestamp) -> Option<PriceQuote> {
        self.snapshot().price_for(instant).copied()
    }

    #[must_use]
    pub fn contains_timestamp(&self, instant: Timestamp) -> bool {
        self.snapshot().contains_timestamp(instant)
    }

    #[must_use]
    pub fn contains_range(&self, range: &TimeRange) -> bool {
        self.snapshot().contains_range(range)
    }

    /// Whether the series should be fetched again.
    ///
    /// True when there is no price for `now`, or when it is past
    /// [`PUBLICATION_HOUR`] locally and tomorrow's prices are still missing.
    #[must_use]
    pub fn needs_refresh(&self, now: Timestamp, zone: &Tz) -> bool {
        let series = self.snapshot();
        if !series.contains_timestamp(now) {
            return true;
        }
        let local = now.with_timezone(zone);
        if local.hour() < PUBLICATION_HOUR {
            return false;
        }
        local
            .checked_add_days(Days::new(1))
            .is_some_and(|tomorrow| !series.contains_timestamp(tomorrow.with_timezone(&Utc)))
    }

    /// Fetch from `source` and swap in the result.
    ///
    /// An empty answer keeps the previous series.
    ///
    /// # Errors
    ///
    /// Propagates fetch errors and rejects overlapping quotes; the previous
    /// series stays in place in both cases.
    pub async fn refresh<S: PriceSource>(
        &self,
        source: &S,
        window: TimeRange,
    ) -> Result<RefreshOutcome, WattwiseError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked(source, window).await
    }

    /// Refresh only when [`needs_refresh`](Self::needs_refresh) says so.
    ///
    /// The check is repeated after acquiring the refresh lock, so callers
    /// racing each other trigger a single fetch.
    ///
    /// # Errors
    ///
    /// Same as [`refresh`](Self::refresh).
    pub async fn refresh_if_needed<S: PriceSource, T: TimeProvider>(
        &self,
        source: &S,
        time: &T,
    ) -> Result<RefreshOutcome, WattwiseError> {
        let zone = time.zone();
        if !self.needs_refresh(time.now(), &zone) {
            return Ok(RefreshOutcome::Skipped);
        }

        let _guard = self.refresh_lock.lock().await;
        let now = time.now();
        if !self.needs_refresh(now, &zone) {
            return Ok(RefreshOutcome::Skipped);
        }
        let Some(window) = fetch_window(now, &zone) else {
            tracing::warn!(%now, "cannot compute fetch window");
            return Ok(RefreshOutcome::Skipped);
        };
        self.refresh_locked(source, window).await
    }

    async fn refresh_locked<S: PriceSource>(
        &self,
        source: &S,
        window: TimeRange,
    ) -> Result<RefreshOutcome, WattwiseError> {
        tracing::debug!(%window, "fetching prices");
        let quotes = source.fetch(window).await?;
        if quotes.is_empty() {
            tracing::warn!(%window, "price source returned no quotes, keeping previous series");
            return Ok(RefreshOutcome::Empty);
        }

        let series = PriceSeries::new(quotes)?;
        let count = series.len();
        self.replace_all(series);
        tracing::info!(count, %window, "price series replaced");
        Ok(RefreshOutcome::Replaced(count))
    }
}

/// Local midnight today through two days later: today's prices plus
/// tomorrow's once published.
#[must_use]
pub fn fetch_window(now: Timestamp, zone: &Tz) -> Option<TimeRange> {
    let today = now.with_timezone(zone).date_naive();
    let midnight = zone
        .from_local_datetime(&today.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    let end = midnight.checked_add_days(Days::new(2))?;
    TimeRange::new(midnight.with_timezone(&Utc), end.with_timezone(&Utc)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    const HOUR: i64 = 3_600_000;
    // 2024-06-15T00:00:00+02:00
    const DAY_START: i64 = 1_718_402_400_000;

    fn zone() -> Tz {
        chrono_tz::Etc::GMTMinus2
    }

    fn at(hour: i64) -> Timestamp {
        wattwise_domain::time::from_millis(DAY_START + hour * HOUR).unwrap()
    }

    fn hourly(from: i64, count: i64) -> Vec<PriceQuote> {
        (from..from + count)
            .map(|h| {
                let start = DAY_START + h * HOUR;
                let range = TimeRange::from_millis(start, start + HOUR).unwrap();
                PriceQuote::flat(range, 10.0 + h as f64).unwrap()
            })
            .collect()
    }

    struct FakeSource {
        response: StdMutex<Option<Result<Vec<PriceQuote>, WattwiseError>>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn returning(response: Result<Vec<PriceQuote>, WattwiseError>) -> Self {
            Self {
                response: StdMutex::new(Some(response)),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl PriceSource for FakeSource {
        fn fetch(
            &self,
            _window: TimeRange,
        ) -> impl Future<Output = Result<Vec<PriceQuote>, WattwiseError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = self
                .response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()));
            async { response }
        }
    }

    struct Fixed(Timestamp);

    impl TimeProvider for Fixed {
        fn now(&self) -> Timestamp {
            self.0
        }

        fn zone(&self) -> Tz {
            zone()
        }
    }

    fn source_error() -> WattwiseError {
        WattwiseError::Source(Box::new(std::io::Error::other("connection reset")))
    }

    #[test]
    fn should_answer_absent_when_empty() {
        let store = PriceStore::new();
        assert!(store.price_for(at(1)).is_none());
        assert!(!store.contains_timestamp(at(1)));
        assert!(store.needs_refresh(at(1), &zone()));
    }

    #[test]
    fn should_keep_old_snapshot_alive_after_swap() {
        let store = PriceStore::with_series(PriceSeries::new(hourly(0, 24)).unwrap());
        let before = store.snapshot();

        store.replace_all(PriceSeries::new(hourly(24, 24)).unwrap());

        assert_eq!(before.len(), 24);
        assert!(before.contains_timestamp(at(3)));
        assert!(!store.contains_timestamp(at(3)));
        assert!(store.contains_timestamp(at(30)));
    }

    #[test]
    fn should_not_need_refresh_before_publication_hour() {
        let store = PriceStore::with_series(PriceSeries::new(hourly(0, 24)).unwrap());
        assert!(!store.needs_refresh(at(14), &zone()));
    }

    #[test]
    fn should_need_refresh_after_publication_hour_without_tomorrow() {
        let store = PriceStore::with_series(PriceSeries::new(hourly(0, 24)).unwrap());
        assert!(store.needs_refresh(at(15), &zone()));
    }

    #[test]
    fn should_not_need_refresh_when_tomorrow_is_known() {
        let store = PriceStore::with_series(PriceSeries::new(hourly(0, 48)).unwrap());
        assert!(!store.needs_refresh(at(18), &zone()));
    }

    #[test]
    fn should_need_refresh_when_now_is_not_covered() {
        let store = PriceStore::with_series(PriceSeries::new(hourly(0, 24)).unwrap());
        assert!(store.needs_refresh(at(25), &zone()));
    }

    #[test]
    fn should_compute_two_day_fetch_window_from_local_midnight() {
        let window = fetch_window(at(13), &zone()).unwrap();
        assert_eq!(window.start(), at(0));
        assert_eq!(window.end(), at(48));
    }

    #[tokio::test]
    async fn should_replace_series_on_successful_refresh() {
        let store = PriceStore::new();
        let source = FakeSource::returning(Ok(hourly(0, 48)));

        let outcome = store
            .refresh(&source, TimeRange::new(at(0), at(48)).unwrap())
            .await
            .unwrap();

        assert_eq!(outcome, RefreshOutcome::Replaced(48));
        assert!(store.contains_range(&TimeRange::new(at(0), at(48)).unwrap()));
    }

    #[tokio::test]
    async fn should_keep_previous_series_when_fetch_fails() {
        let store = PriceStore::with_series(PriceSeries::new(hourly(0, 24)).unwrap());
        let source = FakeSource::returning(Err(source_error()));

        let result = store
            .refresh(&source, TimeRange::new(at(0), at(48)).unwrap())
            .await;

        assert!(matches!(result, Err(WattwiseError::Source(_))));
        assert_eq!(store.snapshot().len(), 24);
    }

    #[tokio::test]
    async fn should_keep_previous_series_when_quotes_overlap() {
        let store = PriceStore::with_series(PriceSeries::new(hourly(0, 24)).unwrap());
        let mut quotes = hourly(0, 2);
        quotes.push(
            PriceQuote::flat(
                TimeRange::new(at(0) + chrono::TimeDelta::minutes(30), at(1)).unwrap(),
                1.0,
            )
            .unwrap(),
        );
        let source = FakeSource::returning(Ok(quotes));

        let result = store
            .refresh(&source, TimeRange::new(at(0), at(48)).unwrap())
            .await;

        assert!(matches!(result, Err(WattwiseError::Validation(_))));
        assert_eq!(store.snapshot().len(), 24);
    }

    #[tokio::test]
    async fn should_keep_previous_series_when_source_returns_nothing() {
        let store = PriceStore::with_series(PriceSeries::new(hourly(0, 24)).unwrap());
        let source = FakeSource::returning(Ok(Vec::new()));

        let outcome = store
            .refresh(&source, TimeRange::new(at(0), at(48)).unwrap())
            .await
            .unwrap();

        assert_eq!(outcome, RefreshOutcome::Empty);
        assert_eq!(store.snapshot().len(), 24);
    }

    #[tokio::test]
    async fn should_skip_refresh_when_prices_are_current() {
        let store = PriceStore::with_series(PriceSeries::new(hourly(0, 48)).unwrap());
        let source = FakeSource::returning(Ok(hourly(0, 48)));

        let outcome = store
            .refresh_if_needed(&source, &Fixed(at(10)))
            .await
            .unwrap();

        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn should_fetch_once_when_refresh_is_needed() {
        let store = PriceStore::new();
        let source = FakeSource::returning(Ok(hourly(0, 48)));
        let clock = Fixed(at(10));

        let first = store.refresh_if_needed(&source, &clock).await.unwrap();
        let second = store.refresh_if_needed(&source, &clock).await.unwrap();

        assert_eq!(first, RefreshOutcome::Replaced(48));
        assert_eq!(second, RefreshOutcome::Skipped);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    /// Holds every fetch until released.
    struct GatedSource {
        quotes: Vec<PriceQuote>,
        release: tokio::sync::Notify,
        calls: AtomicUsize,
    }

    impl PriceSource for GatedSource {
        fn fetch(
            &self,
            _window: TimeRange,
        ) -> impl Future<Output = Result<Vec<PriceQuote>, WattwiseError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let quotes = self.quotes.clone();
            async move {
                self.release.notified().await;
                Ok(quotes)
            }
        }
    }

    #[tokio::test]
    async fn should_fetch_once_for_concurrent_refreshes() {
        let store = PriceStore::new();
        let source = GatedSource {
            quotes: hourly(0, 48),
            release: tokio::sync::Notify::new(),
            calls: AtomicUsize::new(0),
        };
        let clock = Fixed(at(10));

        let (first, second, ()) = tokio::join!(
            store.refresh_if_needed(&source, &clock),
            store.refresh_if_needed(&source, &clock),
            async {
                tokio::task::yield_now().await;
                source.release.notify_one();
            },
        );

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.unwrap(), RefreshOutcome::Replaced(48));
        assert_eq!(second.unwrap(), RefreshOutcome::Skipped);
        assert_eq!(store.snapshot().len(), 48);
    }
}
