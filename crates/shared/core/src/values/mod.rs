use chrono::{DateTime, TimeZone, Utc};

mod duration;

pub use duration::format_millis;

/// Milliseconds since the Unix epoch (1970-01-01T00:00:00Z)
pub type EpochMillis = i64;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Convert epoch milliseconds to a UTC timestamp
///
/// Returns `None` when the value is outside chrono's representable range
/// (roughly ±262,000 years).
pub fn millis_to_timestamp(millis: EpochMillis) -> Option<Timestamp> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Convert any zoned date-time to epoch milliseconds
///
/// The zone carried by the value is honoured; no normalization happens here.
pub fn timestamp_to_millis<Tz: TimeZone>(time: &DateTime<Tz>) -> EpochMillis {
    time.timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_epoch_round_trip() {
        let ts = millis_to_timestamp(1_705_314_600_123).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00.123+00:00");
        assert_eq!(timestamp_to_millis(&ts), 1_705_314_600_123);
    }

    #[test]
    fn test_zone_is_honoured() {
        // 10:30 at UTC+02:00 is 08:30 UTC
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = tz.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        assert_eq!(timestamp_to_millis(&local), timestamp_to_millis(&utc));
    }

    #[test]
    fn test_out_of_range_millis() {
        assert!(millis_to_timestamp(i64::MAX).is_none());
        assert!(millis_to_timestamp(-1).is_some());
    }
}
