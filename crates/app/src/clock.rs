//! Wall-clock [`TimeProvider`].

use chrono_tz::Tz;

use wattwise_domain::time::{Timestamp, now};

use crate::ports::TimeProvider;

/// Reads the system clock and reports a fixed zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: Tz,
}

impl SystemClock {
    #[must_use]
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl TimeProvider for SystemClock {
    fn now(&self) -> Timestamp {
        now()
    }

    fn zone(&self) -> Tz {
        self.zone
    }
}
