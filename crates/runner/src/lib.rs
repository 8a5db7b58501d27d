//! Timeshift Runner
//!
//! Wires a [`VirtualClock`] into a small application:
//!
//! - **Config**: defaults, an optional JSON file and `TIMESHIFT_*` overrides
//! - **App**: builds the clock from config and runs instrumented sample jobs
//!   (an expiry check and a month-end job check) against virtual time
//!
//! ```text
//!   RunnerConfig ──► VirtualClock ──► LoggedCall / Profiler ──► sample jobs
//! ```
//!
//! [`VirtualClock`]: timeshift_clock::VirtualClock

pub mod app;
pub mod config;
pub mod error;

pub use app::{RunReport, TimeShiftApp};
pub use config::RunnerConfig;
pub use error::{RunnerError, RunnerResult};
