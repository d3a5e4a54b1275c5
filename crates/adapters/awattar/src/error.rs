//! aWATTar adapter error types.

use wattwise_domain::error::{ValidationError, WattwiseError};

/// Errors specific to the aWATTar adapter.
#[derive(Debug, thiserror::Error)]
pub enum AwattarError {
    /// The HTTP client could not be built or the request failed in transit.
    #[error("aWATTar request failed")]
    Http(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("aWATTar API returned status {0}")]
    Status(u16),

    /// The response body is not a valid market-data document.
    #[error("failed to decode aWATTar response")]
    Decode(#[source] serde_json::Error),

    /// A market-data entry could not be turned into a quote.
    #[error("invalid market data")]
    Domain(#[source] ValidationError),
}

impl AwattarError {
    /// Convert into a [`WattwiseError`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> WattwiseError {
        match self {
            Self::Domain(err) => WattwiseError::Validation(err),
            other => WattwiseError::Source(Box::new(other)),
        }
    }
}

impl From<AwattarError> for WattwiseError {
    fn from(err: AwattarError) -> Self {
        err.into_domain()
    }
}
