use log::{Level, log, log_enabled};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use timeshift_core::format_millis;
use timeshift_ports::Clock;

/// How bad a profiled call's duration is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileSeverity {
    /// Took no measurable time, or slow-call detection is off
    Trivial,
    /// Under the slow threshold
    Slow,
    /// Under the potential-issue threshold
    PotentialIssue,
    /// Under the needs-attention threshold
    NeedsAttention,
    /// At or over every threshold
    Embarrassing,
}

impl ProfileSeverity {
    /// Log level the profiling record is written at
    pub fn level(self) -> Level {
        match self {
            ProfileSeverity::Trivial => Level::Trace,
            ProfileSeverity::Slow => Level::Debug,
            ProfileSeverity::PotentialIssue => Level::Info,
            ProfileSeverity::NeedsAttention => Level::Warn,
            ProfileSeverity::Embarrassing => Level::Error,
        }
    }

    /// Prefix of the profiling record
    pub fn banner(self) -> &'static str {
        match self {
            ProfileSeverity::Trivial => "",
            ProfileSeverity::Slow => "* SLOW METHOD * ",
            ProfileSeverity::PotentialIssue => "** POTENTIAL ISSUE ** ",
            ProfileSeverity::NeedsAttention => "*** NEEDS ATTENTION *** ",
            ProfileSeverity::Embarrassing => "*!*!* THIS IS EMBARRASSING *!*!* ",
        }
    }
}

/// Elapsed-time thresholds in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfilingThresholds {
    /// Negative disables classification (everything is trivial)
    pub slow_millis: i64,
    pub potential_issue_millis: i64,
    pub needs_attention_millis: i64,
}

impl Default for ProfilingThresholds {
    fn default() -> Self {
        Self {
            slow_millis: 5,
            potential_issue_millis: 100,
            needs_attention_millis: 500,
        }
    }
}

impl ProfilingThresholds {
    /// Classify an elapsed time, checking thresholds from lowest to highest
    pub fn classify(&self, elapsed_millis: i64) -> ProfileSeverity {
        if self.slow_millis < 0 || elapsed_millis == 0 {
            ProfileSeverity::Trivial
        } else if elapsed_millis < self.slow_millis {
            ProfileSeverity::Slow
        } else if elapsed_millis < self.potential_issue_millis {
            ProfileSeverity::PotentialIssue
        } else if elapsed_millis < self.needs_attention_millis {
            ProfileSeverity::NeedsAttention
        } else {
            ProfileSeverity::Embarrassing
        }
    }
}

/// Result of a profiled call
#[derive(Debug, Clone, PartialEq)]
pub struct Profiled<T> {
    pub value: T,
    pub elapsed_millis: i64,
    pub severity: ProfileSeverity,
}

impl<T> Profiled<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Times operations and logs each one at a severity tied to its duration
pub struct Profiler {
    clock: Arc<dyn Clock>,
    thresholds: ProfilingThresholds,
}

impl Profiler {
    /// Create with default thresholds
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_thresholds(clock, ProfilingThresholds::default())
    }

    /// Create with custom thresholds
    pub fn with_thresholds(clock: Arc<dyn Clock>, thresholds: ProfilingThresholds) -> Self {
        Self { clock, thresholds }
    }

    pub fn thresholds(&self) -> &ProfilingThresholds {
        &self.thresholds
    }

    pub fn set_slow_millis(&mut self, millis: i64) {
        self.thresholds.slow_millis = millis;
    }

    pub fn set_potential_issue_millis(&mut self, millis: i64) {
        self.thresholds.potential_issue_millis = millis;
    }

    pub fn set_needs_attention_millis(&mut self, millis: i64) {
        self.thresholds.needs_attention_millis = millis;
    }

    /// Run `op` and log how long it took
    pub fn profile<T, F>(&self, target: &str, operation: &str, op: F) -> Profiled<T>
    where
        F: FnOnce() -> T,
    {
        let start = self.clock.now_millis();
        let value = op();
        self.finish(target, operation, start, value)
    }

    /// Async version of [`Profiler::profile`]
    pub async fn profile_async<T, F>(&self, target: &str, operation: &str, op: F) -> Profiled<T>
    where
        F: Future<Output = T>,
    {
        let start = self.clock.now_millis();
        let value = op.await;
        self.finish(target, operation, start, value)
    }

    fn finish<T>(&self, target: &str, operation: &str, start: i64, value: T) -> Profiled<T> {
        let elapsed_millis = self.clock.now_millis().saturating_sub(start);
        let severity = self.thresholds.classify(elapsed_millis);
        let level = severity.level();

        if log_enabled!(level) {
            log!(
                level,
                "{}{} to execute [{}.{}(..)]",
                severity.banner(),
                format_millis(elapsed_millis),
                target,
                operation
            );
        }

        Profiled {
            value,
            elapsed_millis,
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_thresholds() {
        let thresholds = ProfilingThresholds::default();

        assert_eq!(thresholds.classify(0), ProfileSeverity::Trivial);
        assert_eq!(thresholds.classify(4), ProfileSeverity::Slow);
        assert_eq!(thresholds.classify(5), ProfileSeverity::PotentialIssue);
        assert_eq!(thresholds.classify(99), ProfileSeverity::PotentialIssue);
        assert_eq!(thresholds.classify(100), ProfileSeverity::NeedsAttention);
        assert_eq!(thresholds.classify(499), ProfileSeverity::NeedsAttention);
        assert_eq!(thresholds.classify(500), ProfileSeverity::Embarrassing);
    }

    #[test]
    fn test_negative_slow_threshold_disables() {
        let thresholds = ProfilingThresholds {
            slow_millis: -1,
            ..Default::default()
        };
        assert_eq!(thresholds.classify(10_000), ProfileSeverity::Trivial);
    }

    #[test]
    fn test_severity_levels_escalate() {
        assert_eq!(ProfileSeverity::Trivial.level(), Level::Trace);
        assert_eq!(ProfileSeverity::Embarrassing.level(), Level::Error);
        assert!(ProfileSeverity::NeedsAttention > ProfileSeverity::PotentialIssue);
    }
}
