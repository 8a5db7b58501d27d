use timeshift_core::{EpochMillis, Timestamp};

/// Port for time abstraction
///
/// Anything that needs "the current time" depends on this trait instead of
/// reading the host clock, so the time it observes can be shifted:
/// - Real system time for production
/// - A virtual clock with an offset for tests and demos
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Current time as milliseconds since the Unix epoch
    fn now_millis(&self) -> EpochMillis {
        self.now().timestamp_millis()
    }

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
