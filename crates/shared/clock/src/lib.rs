//! Timeshift Clock Infrastructure
//!
//! Provides the clocks behind the [`Clock`] port:
//!
//! ## Clocks
//!
//! ```text
//! SystemClock    real wall-clock time, nothing else
//! VirtualClock   real time + settable offset
//!     │
//!     └── TimeSource (SystemClock in production, ManualTimeSource in tests)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use timeshift_clock::{Clock, VirtualClock};
//!
//! // Tracks real time until told otherwise
//! let clock = VirtualClock::new();
//!
//! // Jump to a fixed point; the clock keeps ticking from there
//! clock.set_time_iso("2024-01-15T10:30:00")?;
//! clock.set_time_iso("10:30:00")?;    // today, at 10:30
//! clock.set_time_iso("2024-01-15")?;  // that day, current time of day
//! clock.set_time_millis(1_705_314_600_000);
//!
//! let now = clock.now();
//!
//! // Back to real time
//! clock.reset();
//! ```

mod iso;
mod manual;
mod system;
mod virtual_clock;

pub use iso::TimeInput;
pub use manual::ManualTimeSource;
pub use system::SystemClock;
pub use virtual_clock::{ClockState, VirtualClock};

// Re-export the ports for convenience
pub use timeshift_ports::{Clock, ClockError, ClockResult, TimeSource};
