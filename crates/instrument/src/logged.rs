use log::{Level, error, log, log_enabled};
use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use timeshift_core::format_millis;
use timeshift_ports::Clock;

/// Level at which a logged call writes its entry/exit records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallLogLevel {
    Info,
    #[default]
    Debug,
}

impl CallLogLevel {
    /// Decide whether entry/exit records are written, and at which level
    ///
    /// Only the most verbose enabled level counts: with debug enabled only
    /// `Debug` calls are logged, otherwise with info enabled only `Info` calls.
    pub fn effective(self, debug_enabled: bool, info_enabled: bool) -> Option<Level> {
        match self {
            CallLogLevel::Debug if debug_enabled => Some(Level::Debug),
            CallLogLevel::Info if !debug_enabled && info_enabled => Some(Level::Info),
            _ => None,
        }
    }
}

/// Logged call configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggedCallConfig {
    /// Level of the entry/exit records
    pub level: CallLogLevel,
    /// Include the time taken in the exit record
    pub timed: bool,
    /// Calls slower than this are reported at error level
    pub max_time_millis: i64,
}

impl Default for LoggedCallConfig {
    fn default() -> Self {
        Self {
            level: CallLogLevel::Debug,
            timed: true,
            max_time_millis: 10,
        }
    }
}

/// Result of a logged call
#[derive(Debug, Clone, PartialEq)]
pub struct Logged<T> {
    /// Whatever the wrapped operation returned
    pub value: T,
    /// Clock time spent in the operation
    pub elapsed_millis: i64,
    /// Whether `elapsed_millis` went over `max_time_millis`
    pub exceeded: bool,
}

impl<T> Logged<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Wraps operations with entry/exit logging and a slow-call check
pub struct LoggedCall {
    clock: Arc<dyn Clock>,
    config: LoggedCallConfig,
}

impl LoggedCall {
    /// Create with default configuration
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, LoggedCallConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(clock: Arc<dyn Clock>, config: LoggedCallConfig) -> Self {
        Self { clock, config }
    }

    pub fn config(&self) -> &LoggedCallConfig {
        &self.config
    }

    /// Run `op`, logging around it
    ///
    /// `args` is rendered with `{:?}` into every record, pass a tuple or a
    /// slice for several arguments.
    pub fn call<T, F>(
        &self,
        target: &str,
        operation: &str,
        args: &(dyn fmt::Debug + Sync),
        op: F,
    ) -> Logged<T>
    where
        F: FnOnce() -> T,
    {
        let start = self.enter(target, operation, args);
        let value = op();
        self.exit(target, operation, args, start, value)
    }

    /// Async version of [`LoggedCall::call`]
    pub async fn call_async<T, F>(
        &self,
        target: &str,
        operation: &str,
        args: &(dyn fmt::Debug + Sync),
        op: F,
    ) -> Logged<T>
    where
        F: Future<Output = T>,
    {
        let start = self.enter(target, operation, args);
        let value = op.await;
        self.exit(target, operation, args, start, value)
    }

    fn record_level(&self) -> Option<Level> {
        self.config
            .level
            .effective(log_enabled!(Level::Debug), log_enabled!(Level::Info))
    }

    fn enter(&self, target: &str, operation: &str, args: &(dyn fmt::Debug + Sync)) -> i64 {
        if let Some(level) = self.record_level() {
            log!(level, ">>>> In [{}::{}({:?})]", target, operation, args);
        }
        self.clock.now_millis()
    }

    fn exit<T>(
        &self,
        target: &str,
        operation: &str,
        args: &(dyn fmt::Debug + Sync),
        start: i64,
        value: T,
    ) -> Logged<T> {
        let elapsed_millis = self.clock.now_millis().saturating_sub(start);

        if let Some(level) = self.record_level() {
            let time_taken = if self.config.timed {
                format!(" Time taken: {}", format_millis(elapsed_millis))
            } else {
                String::new()
            };
            log!(
                level,
                "<<<< Out{} [{}::{}({:?})]",
                time_taken,
                target,
                operation,
                args
            );
        }

        let exceeded = elapsed_millis > self.config.max_time_millis;
        if exceeded {
            error!(
                "Logged method took {}ms. Max expected: {}ms [{}::{}({:?})]",
                elapsed_millis, self.config.max_time_millis, target, operation, args
            );
        }

        Logged {
            value,
            elapsed_millis,
            exceeded,
        }
    }
}
