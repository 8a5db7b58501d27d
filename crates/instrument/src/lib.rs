//! Timeshift Instrument
//!
//! Wrappers that time an operation with a [`Clock`] and log about it:
//!
//! - [`LoggedCall`]: entry/exit records at a chosen level, plus an error
//!   record when the call runs longer than expected
//! - [`Profiler`]: one record per call, its severity picked from elapsed-time
//!   thresholds
//!
//! Both read "now" from the clock they are given, so timings follow a
//! virtual clock just like the rest of the application does.
//!
//! [`Clock`]: timeshift_ports::Clock

mod logged;
mod profiling;

pub use logged::{CallLogLevel, Logged, LoggedCall, LoggedCallConfig};
pub use profiling::{ProfileSeverity, Profiled, Profiler, ProfilingThresholds};
