use std::time::Duration;

use thiserror::Error;

use super::Resource;

/// Why a single request to the gateway did not yield a usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("connection failure: {0}")]
    ConnectionFailure(String),
    #[error("timed out after {0:?}")]
    TimeoutExceeded(Duration),
    #[error("invalid response status: {0}")]
    InvalidResponseStatus(u16),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl FetchError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return FetchError::TimeoutExceeded(timeout);
        }
        FetchError::ConnectionFailure(err.to_string())
    }
}

/// Errors that end a cycle without a result.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("gateway unreachable: {0}")]
    Unreachable(FetchError),
    #[error("failed to fetch {resource}: {source}")]
    Fetch {
        resource: Resource,
        source: FetchError,
    },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ProbeError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ProbeError::Unreachable(_))
    }
}
