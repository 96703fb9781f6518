//! Error types for tempus operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Unknown duration unit '{unit}' in '{input}'")]
    UnknownUnit { unit: String, input: String },

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Unsupported value type: {0}")]
    UnsupportedType(String),

    #[error("Numeric overflow: {0}")]
    Overflow(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(i64),

    #[error("Invalid binary encoding: {0}")]
    InvalidBinary(String),

    #[error("Zero value: {0}")]
    Zero(String),
}

pub type Result<T> = std::result::Result<T, TimeError>;
