//! Timeshift Ports
//!
//! Port definitions (traits) for the timeshift virtual clock.
//! These define the boundaries between the clock and the things that
//! read it or feed it host time.

mod clock;
mod error;
mod source;

pub use clock::Clock;
pub use error::{ClockError, ClockResult};
pub use source::TimeSource;
