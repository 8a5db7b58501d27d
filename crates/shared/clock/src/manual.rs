use chrono::Duration;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use timeshift_core::EpochMillis;
use timeshift_ports::TimeSource;

/// Hand-driven time source for deterministic tests
///
/// Wall and monotonic readings only move when told to. `advance` moves both
/// together like real time does; `set_wall` jumps the wall clock alone, the
/// way an NTP correction would.
pub struct ManualTimeSource {
    wall_millis: AtomicI64,
    monotonic_nanos: AtomicU64,
}

impl ManualTimeSource {
    /// Create a source whose wall clock reads `wall_millis`
    pub fn new(wall_millis: EpochMillis) -> Self {
        Self {
            wall_millis: AtomicI64::new(wall_millis),
            monotonic_nanos: AtomicU64::new(0),
        }
    }

    /// Let real time pass: both readings move forward by `by`
    ///
    /// Negative durations are ignored since real time never runs backwards.
    pub fn advance(&self, by: Duration) {
        let nanos = by.num_nanoseconds().unwrap_or(i64::MAX);
        if nanos <= 0 {
            return;
        }
        self.monotonic_nanos.fetch_add(nanos as u64, Ordering::AcqRel);
        self.wall_millis
            .fetch_add(by.num_milliseconds(), Ordering::AcqRel);
    }

    /// Advance only the monotonic timer by raw nanoseconds
    pub fn advance_nanos(&self, nanos: u64) {
        self.monotonic_nanos.fetch_add(nanos, Ordering::AcqRel);
    }

    /// Jump the wall clock without touching the monotonic timer
    pub fn set_wall(&self, wall_millis: EpochMillis) {
        self.wall_millis.store(wall_millis, Ordering::Release);
    }
}

impl TimeSource for ManualTimeSource {
    fn wall_millis(&self) -> EpochMillis {
        self.wall_millis.load(Ordering::Acquire)
    }

    fn monotonic_nanos(&self) -> u64 {
        self.monotonic_nanos.load(Ordering::Acquire)
    }
}
