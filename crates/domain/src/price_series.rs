//! Price series: an ordered set of disjoint [`PriceQuote`]s.
//!
//! Lookups use binary search over the quote boundaries, so a series holding
//! several days of hourly or quarter-hourly quotes stays cheap to query.

use crate::error::ValidationError;
use crate::price::PriceQuote;
use crate::time::{TimeRange, Timestamp};

/// Quotes sorted by range start, at most one per distinct [`TimeRange`],
/// never overlapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    quotes: Vec<PriceQuote>,
}

impl PriceSeries {
    /// Build a series from quotes in any order.
    ///
    /// A quote whose range equals an earlier quote's range replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OverlappingQuotes`] when two distinct
    /// ranges overlap.
    pub fn new(quotes: impl IntoIterator<Item = PriceQuote>) -> Result<Self, ValidationError> {
        let mut input: Vec<PriceQuote> = quotes.into_iter().collect();
        // stable: equal ranges keep insertion order, so the last one wins below
        input.sort_by_key(|quote| quote.range);

        let mut quotes: Vec<PriceQuote> = Vec::with_capacity(input.len());
        for quote in input {
            match quotes.last_mut() {
                Some(last) if last.range == quote.range => *last = quote,
                Some(last) if last.range.end() > quote.range.start() => {
                    return Err(ValidationError::OverlappingQuotes(quote.range.start()));
                }
                _ => quotes.push(quote),
            }
        }
        Ok(Self { quotes })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&PriceQuote> {
        self.quotes.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&PriceQuote> {
        self.quotes.last()
    }

    /// All quotes in chronological order.
    #[must_use]
    pub fn quotes(&self) -> &[PriceQuote] {
        &self.quotes
    }

    /// Span from the first quote's start to the last quote's end.
    ///
    /// The span may contain gaps; use [`contains_range`](Self::contains_range)
    /// to check real coverage.
    #[must_use]
    pub fn span(&self) -> Option<TimeRange> {
        let first = self.first()?;
        let last = self.last()?;
        TimeRange::new(first.range.start(), last.range.end()).ok()
    }

    fn index_of(&self, instant: Timestamp) -> Option<usize> {
        let idx = self
            .quotes
            .partition_point(|quote| quote.range.start() <= instant);
        let candidate = idx.checked_sub(1)?;
        self.quotes[candidate]
            .range
            .contains(instant)
            .then_some(candidate)
    }

    /// The quote whose range contains `instant`, if any.
    #[must_use]
    pub fn price_for(&self, instant: Timestamp) -> Option<&PriceQuote> {
        self.index_of(instant).map(|idx| &self.quotes[idx])
    }

    /// Whether some quote's range contains `instant`.
    #[must_use]
    pub fn contains_timestamp(&self, instant: Timestamp) -> bool {
        self.index_of(instant).is_some()
    }

    /// Whether `range` is fully covered by stored quote boundaries.
    ///
    /// Either a single quote subsumes `range`, or a run of adjacent quotes
    /// starting at the quote containing `range.start()` reaches `range.end()`
    /// without a gap.
    #[must_use]
    pub fn contains_range(&self, range: &TimeRange) -> bool {
        let Some(first) = self.index_of(range.start()) else {
            return false;
        };
        let mut covered_until = self.quotes[first].range.end();
        for quote in &self.quotes[first + 1..] {
            if covered_until >= range.end() {
                break;
            }
            if quote.range.start() != covered_until {
                return false;
            }
            covered_until = quote.range.end();
        }
        covered_until >= range.end()
    }

    /// Quotes lying entirely inside `horizon`, in chronological order.
    #[must_use]
    pub fn quotes_within(&self, horizon: &TimeRange) -> &[PriceQuote] {
        let lo = self
            .quotes
            .partition_point(|quote| quote.range.start() < horizon.start());
        // disjoint + sorted by start means ends are sorted too
        let hi = self
            .quotes
            .partition_point(|quote| quote.range.end() <= horizon.end());
        if hi <= lo {
            return &[];
        }
        &self.quotes[lo..hi]
    }
}
