use thiserror::Error;

/// Errors raised when a requested time cannot be turned into an offset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("Unrecognized time format: {input:?}")]
    UnrecognizedFormat { input: String },

    #[error("Invalid time {input:?}: {reason}")]
    InvalidField { input: String, reason: String },

    #[error("Local time {input:?} does not exist in the host time zone")]
    NonexistentLocalTime { input: String },

    #[error("Time {input:?} is out of the representable range")]
    OutOfRange { input: String },
}

impl ClockError {
    /// The input that could not be applied
    pub fn input(&self) -> &str {
        match self {
            ClockError::UnrecognizedFormat { input }
            | ClockError::InvalidField { input, .. }
            | ClockError::NonexistentLocalTime { input }
            | ClockError::OutOfRange { input } => input,
        }
    }
}

pub type ClockResult<T> = std::result::Result<T, ClockError>;
