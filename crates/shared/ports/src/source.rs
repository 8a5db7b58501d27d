use timeshift_core::EpochMillis;

/// Port for the host readings a virtual clock is anchored on
///
/// Two independent readings are needed:
/// - the wall clock, read once to anchor offsets (and again when a partial
///   date or time has to be completed from "today")
/// - a monotonic timer, read on every query to measure elapsed real time
pub trait TimeSource: Send + Sync {
    /// Wall-clock time in epoch milliseconds
    fn wall_millis(&self) -> EpochMillis;

    /// Monotonic reading in nanoseconds
    ///
    /// Only differences between two readings are meaningful. Must never
    /// decrease and must ignore wall-clock adjustments.
    fn monotonic_nanos(&self) -> u64;
}
