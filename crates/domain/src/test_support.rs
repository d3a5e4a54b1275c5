//! Shared fixtures for unit tests: 48 hourly quotes covering
//! 2024-06-15 00:00 to 2024-06-17 00:00 at UTC+2.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::price::PriceQuote;
use crate::price_series::PriceSeries;
use crate::time::{TimeRange, Timestamp, from_millis};

/// 2024-06-15T00:00:00+02:00
pub const FIXTURE_START_MS: i64 = 1_718_402_400_000;
const HOUR_MS: i64 = 3_600_000;

/// Eur/MWh, one entry per local hour starting at [`FIXTURE_START_MS`].
pub const FIXTURE_PRICES: [f64; 48] = [
    // 2024-06-15
    98.5, 92.1, 88.0, 85.3, 84.0, 86.7, 95.2, 104.3, 96.8, 72.4, 45.1, 18.6, //
    -1.0, -5.5, -8.2, -3.0, 0.5, 25.3, 78.9, 101.2, 112.4, 105.0, 97.6, 91.3, //
    // 2024-06-16
    75.0, 70.0, 62.0, 40.0, 2.19, 30.0, 55.0, 68.0, 60.0, 45.0, 22.0, 12.0, //
    3.5, 1.2, 0.8, 1.9, 4.8, 20.0, 65.0, 90.0, 110.0, 102.0, 95.0, 87.0,
];

pub fn zone() -> Tz {
    chrono_tz::Etc::GMTMinus2
}

pub fn ms(millis: i64) -> Timestamp {
    from_millis(millis).unwrap()
}

/// Local wall-clock time in the fixture zone, as UTC.
pub fn local(day: u32, hour: u32, minute: u32) -> Timestamp {
    let local: DateTime<Tz> = zone()
        .with_ymd_and_hms(2024, 6, day, hour, minute, 0)
        .unwrap();
    local.with_timezone(&Utc)
}

pub fn fixture_quotes() -> Vec<PriceQuote> {
    FIXTURE_PRICES
        .iter()
        .zip(0_i64..)
        .map(|(price, idx)| {
            let start = FIXTURE_START_MS + idx * HOUR_MS;
            let range = TimeRange::from_millis(start, start + HOUR_MS).unwrap();
            PriceQuote::flat(range, *price).unwrap()
        })
        .collect()
}

pub fn fixture_series() -> PriceSeries {
    PriceSeries::new(fixture_quotes()).unwrap()
}
