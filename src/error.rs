//! Error types for the geocoding boundary and configuration loading.

use thiserror::Error;

/// Failure talking to the postcode lookup service.
///
/// These never reach callers of the planner: the cached geocoder turns every
/// variant into a negative cache entry.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("postcode service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("postcode service returned status {0}")]
    Status(u16),
    #[error("malformed postcode service response: {0}")]
    Malformed(String),
    #[error("batch lookup returned {got} results for {expected} postcodes")]
    BatchMismatch { expected: usize, got: usize },
    #[error("batch of {size} postcodes exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid planner config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid planner config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
