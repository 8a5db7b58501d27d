//! App - clock construction and instrumented sample jobs

use chrono::{DateTime, Datelike, Duration, Local};
use log::info;
use std::sync::Arc;
use timeshift_clock::{Clock, SystemClock, TimeSource, VirtualClock};
use timeshift_core::{EpochMillis, Timestamp};
use timeshift_instrument::{LoggedCall, Profiler};

use crate::config::{EXPIRES_AT_VAR, RunnerConfig};
use crate::error::{RunnerError, RunnerResult};

/// What one run of the sample jobs saw
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Virtual time at the start of the run
    pub virtual_now: Timestamp,
    /// Host time at the start of the run
    pub real_now: Timestamp,
    /// Offset of the clock from real time
    pub offset_millis: i64,
    /// Expiry check result, `None` when no expiry is configured
    pub expired: Option<bool>,
    /// Whether the month-end job would run today
    pub month_end_due: bool,
}

/// Application built around a virtual clock
pub struct TimeShiftApp {
    clock: Arc<VirtualClock>,
    real_clock: Arc<dyn Clock>,
    expires_at: Option<EpochMillis>,
    logged: LoggedCall,
    profiler: Profiler,
}

impl TimeShiftApp {
    /// Build the clock and wrappers from configuration
    ///
    /// `start_at` wins over `offset_millis` when both are set.
    pub fn from_config(config: &RunnerConfig) -> RunnerResult<Self> {
        let host = Arc::new(SystemClock::new());
        Self::from_config_on(config, host.clone(), host)
    }

    /// Same as `from_config`, reading time from `source` and reporting
    /// real time from `real_clock`
    pub fn from_config_on(
        config: &RunnerConfig,
        source: Arc<dyn TimeSource>,
        real_clock: Arc<dyn Clock>,
    ) -> RunnerResult<Self> {
        let clock = VirtualClock::with_source(source);
        match (&config.start_at, config.offset_millis) {
            (Some(start_at), _) => clock.set_time_iso(start_at)?,
            (None, Some(offset)) => {
                clock.set_time_millis(clock.now_millis().saturating_add(offset))
            }
            (None, None) => {}
        }

        let expires_at = config
            .expires_at
            .as_deref()
            .map(parse_expiry)
            .transpose()?;

        Ok(Self::with_clocks(clock, real_clock, expires_at, config))
    }

    /// Build around an existing clock, with the host clock as real time
    pub fn with_clock(
        clock: Arc<VirtualClock>,
        expires_at: Option<EpochMillis>,
        config: &RunnerConfig,
    ) -> Self {
        Self::with_clocks(clock, Arc::new(SystemClock::new()), expires_at, config)
    }

    /// Build around an existing virtual clock and real clock
    pub fn with_clocks(
        clock: Arc<VirtualClock>,
        real_clock: Arc<dyn Clock>,
        expires_at: Option<EpochMillis>,
        config: &RunnerConfig,
    ) -> Self {
        let port: Arc<dyn Clock> = clock.clone();
        Self {
            logged: LoggedCall::with_config(port.clone(), config.logged.clone()),
            profiler: Profiler::with_thresholds(port, config.profiling),
            clock,
            real_clock,
            expires_at,
        }
    }

    pub fn clock(&self) -> &Arc<VirtualClock> {
        &self.clock
    }

    /// Whether the configured expiry instant has passed in virtual time
    pub fn is_expired(&self) -> Option<bool> {
        let expires_at = self.expires_at?;
        let result = self.logged.call("TimeShiftApp", "is_expired", &expires_at, || {
            self.clock.now_millis() >= expires_at
        });
        Some(result.into_inner())
    }

    /// Whether virtual "today" is the last day of its month
    pub async fn month_end_due(&self) -> bool {
        self.profiler
            .profile_async("TimeShiftApp", "month_end_due", async {
                tokio::task::yield_now().await;
                is_last_day_of_month(self.clock.now_local())
            })
            .await
            .into_inner()
    }

    /// Run every sample job once
    pub async fn run(&self) -> RunReport {
        let report = RunReport {
            virtual_now: self.clock.now(),
            real_now: self.real_clock.now(),
            offset_millis: self.clock.offset_millis(),
            expired: self.is_expired(),
            month_end_due: self.month_end_due().await,
        };

        info!(
            "Run complete: virtual={}, offset={}ms, expired={:?}, month_end_due={}",
            report.virtual_now, report.offset_millis, report.expired, report.month_end_due
        );
        report
    }
}

fn parse_expiry(value: &str) -> RunnerResult<EpochMillis> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|time| time.timestamp_millis())
        .map_err(|_| RunnerError::InvalidValue {
            key: EXPIRES_AT_VAR.to_string(),
            value: value.to_string(),
        })
}

fn is_last_day_of_month(now: DateTime<Local>) -> bool {
    let date = now.date_naive();
    date.checked_add_signed(Duration::days(1))
        .is_none_or(|next| next.month() != date.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use timeshift_clock::ManualTimeSource;

    const WALL: EpochMillis = 1_705_314_600_000;

    fn app_on(config: &RunnerConfig) -> RunnerResult<TimeShiftApp> {
        let source = Arc::new(ManualTimeSource::new(WALL));
        let real_clock = VirtualClock::with_source(source.clone());
        TimeShiftApp::from_config_on(config, source, real_clock)
    }

    fn app_at(wall_millis: EpochMillis, expires_at: Option<EpochMillis>) -> TimeShiftApp {
        let source = Arc::new(ManualTimeSource::new(wall_millis));
        let clock = VirtualClock::with_source(source);
        TimeShiftApp::with_clock(clock, expires_at, &RunnerConfig::default())
    }

    #[test]
    fn test_expiry_follows_virtual_time() {
        let app = app_at(1_705_314_600_000, Some(1_705_314_600_000 + 60_000));
        assert_eq!(app.is_expired(), Some(false));

        app.clock().set_time_millis(1_705_314_600_000 + 60_000);
        assert_eq!(app.is_expired(), Some(true));

        app.clock().reset();
        assert_eq!(app.is_expired(), Some(false));
    }

    #[test]
    fn test_no_expiry_configured() {
        let app = app_at(0, None);
        assert_eq!(app.is_expired(), None);
    }

    #[test]
    fn test_last_day_of_month() {
        let jan_31 = Local.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        let feb_28 = Local.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap();
        let feb_29 = Local.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();

        assert!(is_last_day_of_month(jan_31));
        assert!(!is_last_day_of_month(feb_28));
        assert!(is_last_day_of_month(feb_29));
    }

    #[test]
    fn test_parse_expiry() {
        assert_eq!(parse_expiry("1970-01-01T00:00:01Z").unwrap(), 1_000);
        assert_eq!(parse_expiry("1970-01-01T01:00:00+01:00").unwrap(), 0);
        assert!(matches!(
            parse_expiry("tomorrow"),
            Err(RunnerError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_from_config_start_at() {
        let config = RunnerConfig {
            start_at: Some("2024-01-31T12:00:00".to_string()),
            expires_at: Some("2024-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        let app = TimeShiftApp::from_config(&config).unwrap();

        assert!(app.clock().is_shifted());
        assert_eq!(app.is_expired(), Some(true));
    }

    #[test]
    fn test_from_config_offset() {
        let config = RunnerConfig {
            offset_millis: Some(-3_600_000),
            ..Default::default()
        };
        let app = app_on(&config).unwrap();

        assert_eq!(app.clock().now_millis(), WALL - 3_600_000);
        assert_eq!(app.clock().offset_millis(), -3_600_000);
    }

    #[test]
    fn test_from_config_offset_saturates() {
        let config = RunnerConfig {
            offset_millis: Some(i64::MAX),
            ..Default::default()
        };
        let app = app_on(&config).unwrap();

        assert_eq!(app.clock().offset_millis(), i64::MAX - WALL);
    }

    #[test]
    fn test_from_config_on_host_offset() {
        let config = RunnerConfig {
            offset_millis: Some(-3_600_000),
            ..Default::default()
        };
        let app = TimeShiftApp::from_config(&config).unwrap();

        let diff = Utc::now().timestamp_millis() - app.clock().now_millis();
        assert!((diff - 3_600_000).abs() < 1000, "diff {diff}");
    }

    #[tokio::test]
    async fn test_report_uses_real_clock() {
        let config = RunnerConfig {
            start_at: Some("2024-02-29T12:00:00".to_string()),
            ..Default::default()
        };
        let app = app_on(&config).unwrap();

        let report = app.run().await;
        assert_eq!(report.real_now.timestamp_millis(), WALL);
        assert_eq!(
            report.virtual_now.timestamp_millis() - WALL,
            report.offset_millis
        );
    }

    #[test]
    fn test_from_config_bad_start_at() {
        let config = RunnerConfig {
            start_at: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            TimeShiftApp::from_config(&config),
            Err(RunnerError::Clock(_))
        ));
    }

    #[tokio::test]
    async fn test_run_on_month_end() {
        let config = RunnerConfig {
            start_at: Some("2024-02-29T12:00:00".to_string()),
            ..Default::default()
        };
        let app = TimeShiftApp::from_config(&config).unwrap();

        let report = app.run().await;
        assert!(report.month_end_due);
        assert_eq!(report.expired, None);
        assert_ne!(report.offset_millis, 0);
        assert!(report.real_now > report.virtual_now);
    }
}
