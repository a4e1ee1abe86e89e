use thiserror::Error;

use crate::params::ParamKind;

/// Errors a flow backend reports to the frontend
///
/// None of these reach the consumer. The frontend logs them and folds them
/// into the health flag.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    /// Bus transaction with the sensor failed
    #[error("bus error: {0}")]
    Bus(&'static str),

    /// Bring-up could not identify the sensor chip
    #[error("sensor not found")]
    DeviceNotFound,

    /// The sensor did not answer within the driver's deadline
    #[error("sensor read timed out")]
    Timeout,

    /// The reading contained NaN or infinite values
    #[error("reading contains NaN or infinite values")]
    InvalidReading,

    /// The sample is older than the last committed one
    #[error("sample timestamp {got} ms is older than last update {last} ms")]
    NonMonotonicTimestamp { last: u32, got: u32 },
}

/// Errors from binding or storing parameters
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamError {
    #[error("unknown parameter")]
    UnknownParameter,

    #[error("parameter type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch { expected: ParamKind, found: ParamKind },

    #[error("parameter name exceeds {max} characters")]
    NameTooLong { max: usize },

    #[error("parameter store is full")]
    StoreFull,
}

/// Result type for parameter operations
pub type ParamResult<T> = Result<T, ParamError>;
