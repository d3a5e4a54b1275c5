//! Best-price selection: the cheapest window of quotes inside a horizon.
//!
//! Two modes are supported:
//!
//! - **consecutive**: the `length` adjacent quotes with the lowest summed
//!   net price. Windows never bridge a gap in the price series.
//! - **scattered**: the `length` individually cheapest quotes, wherever they
//!   fall in the horizon.
//!
//! Ties always resolve to the earliest start. Everything here is pure: the
//! caller supplies the quotes, the horizon anchor and "now".

use chrono::{DateTime, Days, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::channel::{ChannelId, ChannelState};
use crate::error::ConfigError;
use crate::price::PriceQuote;
use crate::time::{TimeRange, Timestamp};

/// Longest horizon accepted, in hours.
pub const MAX_RANGE_DURATION: u32 = 48;

/// Parameters of one best-price thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestPriceConfig {
    /// Local hour of day the horizon starts at.
    pub range_start: u32,
    /// Horizon length in hours.
    pub range_duration: u32,
    /// Number of quotes to select.
    pub length: u32,
    /// Select adjacent quotes only.
    pub consecutive: bool,
}

impl Default for BestPriceConfig {
    fn default() -> Self {
        Self {
            range_start: 0,
            range_duration: 24,
            length: 1,
            consecutive: true,
        }
    }
}

impl BestPriceConfig {
    /// Check that the configuration can ever produce a window.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.range_start > 23 {
            return Err(ConfigError::InvalidRangeStart(self.range_start));
        }
        if self.range_duration == 0 {
            return Err(ConfigError::ZeroRangeDuration);
        }
        if self.range_duration > MAX_RANGE_DURATION {
            return Err(ConfigError::RangeDurationTooLong {
                got: self.range_duration,
                max: MAX_RANGE_DURATION,
            });
        }
        if self.length == 0 {
            return Err(ConfigError::ZeroLength);
        }
        Ok(())
    }

    /// The horizon containing or following `now`, lasting `range_duration`
    /// hours from `anchor` (today at `range_start`).
    ///
    /// Before the anchor, the previous day's horizon is used so a window
    /// running past midnight stays visible. A horizon that already ended
    /// before `now` moves one calendar day forward. Returns `None` for a zero
    /// duration or when the horizon cannot be represented.
    #[must_use]
    pub fn horizon<Tz: TimeZone>(&self, anchor: DateTime<Tz>, now: Timestamp) -> Option<TimeRange> {
        let duration = TimeDelta::try_hours(i64::from(self.range_duration))?;
        let mut start = anchor;
        if start.with_timezone(&Utc) > now {
            start = start.checked_sub_days(Days::new(1))?;
        }
        let mut end = start.with_timezone(&Utc).checked_add_signed(duration)?;
        if end < now {
            start = start.checked_add_days(Days::new(1))?;
            end = start.with_timezone(&Utc).checked_add_signed(duration)?;
        }
        TimeRange::new(start.with_timezone(&Utc), end).ok()
    }

    /// Run the selection this configuration describes over `quotes`.
    #[must_use]
    pub fn select(&self, quotes: &[PriceQuote]) -> Option<BestPriceResult> {
        let length = usize::try_from(self.length).ok()?;
        if self.consecutive {
            select_consecutive(quotes, length)
        } else {
            select_scattered(quotes, length)
        }
    }
}

/// The window chosen by a selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct BestPriceResult {
    periods: Vec<TimeRange>,
    consecutive: bool,
    price_sum: f64,
}

/// Cheapest run of `length` adjacent quotes.
#[must_use]
pub fn select_consecutive(quotes: &[PriceQuote], length: usize) -> Option<BestPriceResult> {
    if length == 0 {
        return None;
    }

    let mut best: Option<(&[PriceQuote], f64)> = None;
    for run in quotes.chunk_by(|a, b| a.range.is_followed_by(&b.range)) {
        for window in run.windows(length) {
            let sum: f64 = window.iter().map(PriceQuote::net_price).sum();
            match best {
                Some((_, best_sum)) if sum >= best_sum => {}
                _ => best = Some((window, sum)),
            }
        }
    }

    best.map(|(window, price_sum)| BestPriceResult {
        periods: window.iter().map(|quote| quote.range).collect(),
        consecutive: true,
        price_sum,
    })
}

/// The `length` individually cheapest quotes, reported chronologically.
#[must_use]
pub fn select_scattered(quotes: &[PriceQuote], length: usize) -> Option<BestPriceResult> {
    if length == 0 || quotes.len() < length {
        return None;
    }

    let mut ranked: Vec<&PriceQuote> = quotes.iter().collect();
    ranked.sort_by(|a, b| {
        a.net_price()
            .total_cmp(&b.net_price())
            .then_with(|| a.range.cmp(&b.range))
    });
    ranked.truncate(length);
    ranked.sort_by_key(|quote| quote.range);

    Some(BestPriceResult {
        price_sum: ranked.iter().map(|quote| quote.net_price()).sum(),
        periods: ranked.into_iter().map(|quote| quote.range).collect(),
        consecutive: false,
    })
}

impl BestPriceResult {
    /// Selected sub-periods in chronological order.
    #[must_use]
    pub fn periods(&self) -> &[TimeRange] {
        &self.periods
    }

    #[must_use]
    pub fn is_consecutive(&self) -> bool {
        self.consecutive
    }

    /// Summed net price of the selected sub-periods.
    #[must_use]
    pub fn price_sum(&self) -> f64 {
        self.price_sum
    }

    /// Start of the earliest sub-period.
    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.periods[0].start()
    }

    /// End of the latest sub-period.
    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.periods[self.periods.len() - 1].end()
    }

    /// Local start hour of every sub-period, comma-separated.
    #[must_use]
    pub fn hours<Tz: TimeZone>(&self, zone: &Tz) -> String {
        self.periods
            .iter()
            .map(|period| period.start().with_timezone(zone).hour().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Ranges during which the window counts as active: the whole window in
    /// consecutive mode, each sub-period otherwise.
    fn blocks(&self) -> Vec<TimeRange> {
        if self.consecutive {
            TimeRange::new(self.start(), self.end())
                .map(|range| vec![range])
                .unwrap_or_default()
        } else {
            self.periods.clone()
        }
    }

    fn active_block(&self, now: Timestamp) -> Option<TimeRange> {
        self.blocks().into_iter().find(|block| block.contains(now))
    }

    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.active_block(now).is_some()
    }

    /// Time until the next activation; zero while active or when nothing
    /// is left to activate.
    #[must_use]
    pub fn countdown(&self, now: Timestamp) -> TimeDelta {
        if self.is_active(now) {
            return TimeDelta::zero();
        }
        self.blocks()
            .into_iter()
            .find(|block| block.start() > now)
            .map_or_else(TimeDelta::zero, |block| block.start() - now)
    }

    /// Time until the active block ends; zero when not active.
    #[must_use]
    pub fn remaining(&self, now: Timestamp) -> TimeDelta {
        self.active_block(now)
            .map_or_else(TimeDelta::zero, |block| block.end() - now)
    }

    /// Derive the value of `channel` at `now`, rendering hours in `zone`.
    #[must_use]
    pub fn channel_state<Tz: TimeZone>(
        &self,
        channel: ChannelId,
        now: Timestamp,
        zone: &Tz,
    ) -> ChannelState {
        match channel {
            ChannelId::Start => ChannelState::DateTime(self.start()),
            ChannelId::End => ChannelState::DateTime(self.end()),
            ChannelId::Hours => ChannelState::Text(self.hours(zone)),
            ChannelId::Active => ChannelState::OnOff(self.is_active(now)),
            ChannelId::Countdown => ChannelState::Minutes(self.countdown(now).num_minutes()),
            ChannelId::Remaining => ChannelState::Minutes(self.remaining(now).num_minutes()),
        }
    }
}
