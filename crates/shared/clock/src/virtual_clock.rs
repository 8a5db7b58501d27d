use chrono::{DateTime, Local, TimeZone, Utc};
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::SystemTime;
use timeshift_core::{EpochMillis, Timestamp, millis_to_timestamp};
use timeshift_ports::{Clock, ClockError, ClockResult, TimeSource};

use crate::SystemClock;
use crate::iso::TimeInput;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Whether a virtual clock currently differs from real time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// Offset is zero: virtual time is real time
    Unshifted,
    /// Offset is non-zero
    Shifted,
}

/// Clock whose "now" can be set, shifted and reset at runtime
///
/// Virtual time is computed as
///
/// ```text
/// now = init_wall + offset + elapsed_monotonic
/// ```
///
/// The wall clock is read exactly once, at construction. From then on time
/// advances by the monotonic timer only, so virtual time keeps a steady pace
/// even if the host clock is corrected underneath it. Setting the time only
/// recomputes `offset`; the clock keeps ticking at real speed afterwards.
///
/// Only values produced after a set call see the new time. Timestamps that
/// callers already captured are not touched.
pub struct VirtualClock {
    /// Host readings the clock is anchored on
    source: Arc<dyn TimeSource>,
    /// Wall time at construction (epoch millis)
    init_wall_millis: EpochMillis,
    /// Monotonic reading taken together with `init_wall_millis`
    init_monotonic_nanos: u64,
    /// Difference between virtual and real time
    offset_millis: AtomicI64,
}

impl VirtualClock {
    /// Create a clock tracking real host time
    pub fn new() -> Arc<Self> {
        Self::with_source(Arc::new(SystemClock::new()))
    }

    /// Create a clock tracking real time as reported by `source`
    pub fn with_source(source: Arc<dyn TimeSource>) -> Arc<Self> {
        let init_monotonic_nanos = source.monotonic_nanos();
        let init_wall_millis = source.wall_millis();

        debug!(
            "Virtual clock anchored: wall={}ms, monotonic={}ns",
            init_wall_millis, init_monotonic_nanos
        );

        Arc::new(Self {
            source,
            init_wall_millis,
            init_monotonic_nanos,
            offset_millis: AtomicI64::new(0),
        })
    }

    /// Create a host clock that starts at `epoch_millis`
    pub fn starting_at_millis(epoch_millis: EpochMillis) -> Arc<Self> {
        let clock = Self::new();
        clock.set_time_millis(epoch_millis);
        clock
    }

    /// Create a host clock that starts at the given date-time
    pub fn starting_at<Tz: TimeZone>(time: &DateTime<Tz>) -> Arc<Self> {
        let clock = Self::new();
        clock.set_time(time);
        clock
    }

    /// Create a host clock that starts at an ISO-like date and/or time
    ///
    /// See [`VirtualClock::set_time_iso`] for the accepted shapes.
    pub fn starting_at_iso(input: &str) -> ClockResult<Arc<Self>> {
        let clock = Self::new();
        clock.set_time_iso(input)?;
        Ok(clock)
    }

    /// Real milliseconds elapsed since construction (truncated)
    fn elapsed_millis(&self) -> i64 {
        let nanos = self
            .source
            .monotonic_nanos()
            .saturating_sub(self.init_monotonic_nanos);
        (nanos / NANOS_PER_MILLI) as i64
    }

    /// Current virtual time in epoch milliseconds
    pub fn now_millis(&self) -> EpochMillis {
        self.init_wall_millis
            .saturating_add(self.offset_millis.load(Ordering::Acquire))
            .saturating_add(self.elapsed_millis())
    }

    /// Current virtual time as a UTC timestamp
    ///
    /// Saturates at chrono's representable range.
    pub fn now_timestamp(&self) -> Timestamp {
        let millis = self.now_millis();
        millis_to_timestamp(millis).unwrap_or(if millis < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }

    /// Current virtual time in the host time zone
    pub fn now_local(&self) -> DateTime<Local> {
        self.now_timestamp().with_timezone(&Local)
    }

    /// Current virtual time in the given time zone
    pub fn now_in<Tz: TimeZone>(&self, zone: &Tz) -> DateTime<Tz> {
        self.now_timestamp().with_timezone(zone)
    }

    /// Set virtual "now" to `epoch_millis`
    pub fn set_time_millis(&self, epoch_millis: EpochMillis) {
        self.apply(epoch_millis);
    }

    /// Set virtual "now" to a zoned date-time
    ///
    /// The zone carried by `time` decides which instant is meant.
    pub fn set_time<Tz: TimeZone>(&self, time: &DateTime<Tz>) {
        self.apply(time.timestamp_millis());
    }

    /// Set virtual "now" to a `SystemTime`
    pub fn set_time_system(&self, time: SystemTime) {
        self.apply(DateTime::<Utc>::from(time).timestamp_millis());
    }

    /// Set virtual "now" from an ISO-like string in the host time zone
    ///
    /// - `yyyy-MM-ddTHH:mm:ss` sets date and time
    /// - `HH:mm:ss` sets the time of day, keeping today's date
    /// - `yyyy-MM-dd` sets the date, keeping the current time of day
    ///
    /// "Today" is real time, not virtual time. On error the offset is left
    /// unchanged and a warning is logged.
    pub fn set_time_iso(&self, input: &str) -> ClockResult<()> {
        self.set_time_iso_in(input, &Local)
    }

    /// Like [`VirtualClock::set_time_iso`] with an explicit time zone
    pub fn set_time_iso_in<Tz: TimeZone>(&self, input: &str, zone: &Tz) -> ClockResult<()> {
        let result = self.resolve_iso(input, zone);
        match result {
            Ok(wanted) => {
                self.apply(wanted);
                Ok(())
            }
            Err(e) => {
                warn!("Virtual clock not changed: {}", e);
                Err(e)
            }
        }
    }

    fn resolve_iso<Tz: TimeZone>(&self, input: &str, zone: &Tz) -> ClockResult<EpochMillis> {
        let parsed = TimeInput::parse(input)?;
        let today = zone
            .timestamp_millis_opt(self.source.wall_millis())
            .single()
            .ok_or_else(|| ClockError::OutOfRange {
                input: input.to_string(),
            })?;
        parsed.resolve(input, &today)
    }

    /// Go back to real time
    pub fn reset(&self) {
        let previous = self.offset_millis.swap(0, Ordering::AcqRel);
        if previous != 0 {
            info!("Virtual clock reset (offset was {}ms)", previous);
        }
    }

    /// Current offset from real time in milliseconds
    pub fn offset_millis(&self) -> i64 {
        self.offset_millis.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ClockState {
        if self.offset_millis() == 0 {
            ClockState::Unshifted
        } else {
            ClockState::Shifted
        }
    }

    pub fn is_shifted(&self) -> bool {
        self.state() == ClockState::Shifted
    }

    /// Store the offset that makes the next read return `wanted`
    fn apply(&self, wanted: EpochMillis) {
        let offset = wanted
            .saturating_sub(self.elapsed_millis())
            .saturating_sub(self.init_wall_millis);
        let previous = self.offset_millis.swap(offset, Ordering::AcqRel);

        info!(
            "Virtual clock set to {}ms (offset {}ms -> {}ms)",
            wanted, previous, offset
        );
    }
}

impl fmt::Debug for VirtualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualClock")
            .field("init_wall_millis", &self.init_wall_millis)
            .field("init_monotonic_nanos", &self.init_monotonic_nanos)
            .field("offset_millis", &self.offset_millis())
            .finish()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Timestamp {
        self.now_timestamp()
    }

    fn now_millis(&self) -> EpochMillis {
        VirtualClock::now_millis(self)
    }

    fn name(&self) -> &str {
        "VirtualClock"
    }
}
