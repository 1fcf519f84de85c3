use thiserror::Error;

use crate::data_source::FetchError;

/// Caller-input errors exposed by `tickcast-core`.
///
/// These are always raised to the immediate caller and are never replaced by
/// fallback data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("stock symbol cannot be null or empty")]
    EmptySymbol,

    #[error("price series cannot be empty")]
    EmptySeries,
    #[error("window {window} must be between 1 and the series length {len}")]
    InvalidWindow { window: usize, len: usize },
    #[error("smoothing factor {alpha} must lie strictly between 0 and 1")]
    InvalidAlpha { alpha: f64 },

    #[error("unknown forecast method '{value}', expected one of moving-average, linear, exponential")]
    InvalidMethod { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CoreError {
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
