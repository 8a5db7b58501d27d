use chrono::Utc;
use std::time::Instant;
use timeshift_core::{EpochMillis, Timestamp};
use timeshift_ports::{Clock, TimeSource};

/// Real host time
///
/// As a [`Clock`] it reports the wall clock, unshifted. As a [`TimeSource`]
/// it is what a `VirtualClock` is anchored on in production: `Utc::now()` for
/// the wall reading and an `Instant` taken at construction for the monotonic
/// one.
pub struct SystemClock {
    /// Reference point for monotonic readings
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

impl TimeSource for SystemClock {
    fn wall_millis(&self) -> EpochMillis {
        Utc::now().timestamp_millis()
    }

    fn monotonic_nanos(&self) -> u64 {
        // u64 nanoseconds covers ~584 years of uptime
        self.origin.elapsed().as_nanos() as u64
    }
}
