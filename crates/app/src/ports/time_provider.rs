//! Time provider port: the only source of "now" and the local zone.
//!
//! Nothing in the application reads the system clock directly, so selection
//! and channel derivation stay deterministic under test.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

use wattwise_domain::time::Timestamp;

pub trait TimeProvider: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;

    /// Zone used for local hours and day boundaries.
    fn zone(&self) -> Tz;

    /// Today at `hour`:00 local time; the anchor of a best-price horizon.
    ///
    /// Returns `None` when that local time does not exist (DST gap).
    fn start_of(&self, hour: u32) -> Option<DateTime<Tz>> {
        let zone = self.zone();
        let today = self.now().with_timezone(&zone).date_naive();
        let local = today.and_hms_opt(hour, 0, 0)?;
        zone.from_local_datetime(&local).earliest()
    }
}

impl<T: TimeProvider> TimeProvider for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn zone(&self) -> Tz {
        (**self).zone()
    }

    fn start_of(&self, hour: u32) -> Option<DateTime<Tz>> {
        (**self).start_of(hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    struct Fixed(Timestamp);

    impl TimeProvider for Fixed {
        fn now(&self) -> Timestamp {
            self.0
        }

        fn zone(&self) -> Tz {
            chrono_tz::Europe::Vienna
        }
    }

    #[test]
    fn should_anchor_on_local_day_of_now() {
        // 23:30 UTC on the 14th is already the 15th in Vienna (UTC+2)
        let now = Utc.with_ymd_and_hms(2024, 6, 14, 23, 30, 0).unwrap();
        let anchor = Fixed(now).start_of(0).unwrap();
        assert_eq!(
            anchor.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 6, 14, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn should_have_no_anchor_inside_dst_gap() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 30, 0).unwrap();
        assert!(Fixed(now).start_of(2).is_none());
    }

    #[test]
    fn should_reject_invalid_hour() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert!(Fixed(now).start_of(24).is_none());
    }
}
