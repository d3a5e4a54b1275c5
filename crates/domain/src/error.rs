//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`WattwiseError`] via `From` at the port boundaries.

use crate::time::Timestamp;

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum WattwiseError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A best-price configuration was rejected.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    /// An external collaborator (price source, transport, …) failed.
    #[error("price source error")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A time range must end strictly after it starts.
    #[error("time range must end after it starts ({start} >= {end})")]
    EmptyTimeRange { start: Timestamp, end: Timestamp },

    /// A millisecond value could not be represented as a timestamp.
    #[error("timestamp {0} ms is out of range")]
    TimestampOutOfRange(i64),

    /// Two distinct quotes cover overlapping time.
    #[error("quotes overlap at {0}")]
    OverlappingQuotes(Timestamp),

    /// A price component is NaN or infinite.
    #[error("price is not a finite number")]
    NonFinitePrice,
}

/// Best-price configuration violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("length must be at least 1")]
    ZeroLength,

    #[error("range duration must be at least 1 hour")]
    ZeroRangeDuration,

    #[error("range duration must be at most {max} hours, got {got}")]
    RangeDurationTooLong { got: u32, max: u32 },

    #[error("range start must be an hour between 0 and 23, got {0}")]
    InvalidRangeStart(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_validation_error() {
        let err: WattwiseError = ValidationError::NonFinitePrice.into();
        assert!(matches!(
            err,
            WattwiseError::Validation(ValidationError::NonFinitePrice)
        ));
    }

    #[test]
    fn should_wrap_config_error() {
        let err: WattwiseError = ConfigError::ZeroLength.into();
        assert!(matches!(err, WattwiseError::Config(ConfigError::ZeroLength)));
    }

    #[test]
    fn should_display_invalid_range_start() {
        let err = ConfigError::InvalidRangeStart(24);
        assert_eq!(
            err.to_string(),
            "range start must be an hour between 0 and 23, got 24"
        );
    }
}
