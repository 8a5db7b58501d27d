//! Error types for the runner crate

use thiserror::Error;
use timeshift_clock::ClockError;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Clock error: {0}")]
    Clock(#[from] ClockError),
}

pub type RunnerResult<T> = std::result::Result<T, RunnerError>;
