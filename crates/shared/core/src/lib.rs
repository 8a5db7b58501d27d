//! Timeshift Core
//!
//! Pure value types shared by every timeshift crate.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod values;

// Re-export commonly used types at crate root
pub use values::{EpochMillis, Timestamp, format_millis, millis_to_timestamp, timestamp_to_millis};
