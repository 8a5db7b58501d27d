//! ISO-8601-like time input
//!
//! Three shapes are accepted, told apart by marker characters:
//!
//! | Marker      | Shape                 | Example               |
//! |-------------|-----------------------|-----------------------|
//! | `T`         | date and time         | `2024-01-15T10:30:00` |
//! | `:` (no T)  | time of day only      | `10:30:00`            |
//! | neither     | calendar date only    | `2024-01-15`          |
//!
//! A partial input is completed from a reference "today": a time-only input
//! keeps today's date and sub-second part, a date-only input keeps today's
//! time of day.

use chrono::format::ParseErrorKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, ParseError, TimeZone, Timelike};
use timeshift_core::EpochMillis;
use timeshift_ports::{ClockError, ClockResult};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A parsed ISO-like time input, not yet tied to a time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInput {
    /// Full local date and time (seconds precision)
    DateTime(NaiveDateTime),
    /// Time of day; the date comes from the reference "today"
    TimeOnly(NaiveTime),
    /// Calendar date; the time of day comes from the reference "today"
    DateOnly(NaiveDate),
}

impl TimeInput {
    /// Parse one of the three accepted shapes
    ///
    /// Surrounding whitespace is ignored. Parsing is strict: trailing text,
    /// fractional seconds and out-of-range fields are all rejected.
    pub fn parse(input: &str) -> ClockResult<Self> {
        let trimmed = input.trim();

        if trimmed.contains('T') {
            NaiveDateTime::parse_from_str(trimmed, DATE_TIME_FORMAT)
                .map(TimeInput::DateTime)
                .map_err(|e| parse_error(input, e))
        } else if trimmed.contains(':') {
            NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
                .map(TimeInput::TimeOnly)
                .map_err(|e| parse_error(input, e))
        } else {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(TimeInput::DateOnly)
                .map_err(|e| parse_error(input, e))
        }
    }

    /// Resolve into epoch milliseconds in the zone of `today`
    ///
    /// `input` is only carried into errors. A wall time that occurs twice
    /// (DST fold) resolves to the earlier instant; one that never occurs
    /// (DST gap) is an error.
    pub fn resolve<Tz: TimeZone>(
        &self,
        input: &str,
        today: &DateTime<Tz>,
    ) -> ClockResult<EpochMillis> {
        let today_local = today.naive_local();

        let wanted = match *self {
            TimeInput::DateTime(date_time) => date_time,
            TimeInput::TimeOnly(time) => {
                let time = time
                    .with_nanosecond(today_local.nanosecond())
                    .unwrap_or(time);
                today_local.date().and_time(time)
            }
            TimeInput::DateOnly(date) => date.and_time(today_local.time()),
        };

        today
            .timezone()
            .from_local_datetime(&wanted)
            .earliest()
            .map(|resolved| resolved.timestamp_millis())
            .ok_or_else(|| ClockError::NonexistentLocalTime {
                input: input.to_string(),
            })
    }
}

fn parse_error(input: &str, error: ParseError) -> ClockError {
    match error.kind() {
        ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => ClockError::InvalidField {
            input: input.to_string(),
            reason: error.to_string(),
        },
        _ => ClockError::UnrecognizedFormat {
            input: input.to_string(),
        },
    }
}
