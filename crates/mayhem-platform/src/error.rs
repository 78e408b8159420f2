//! Error types for the control-plane client.

use thiserror::Error;

/// Result type alias for control-plane operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors raised while talking to the control plane.
///
/// None of these are retried by the client; callers decide.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The request never produced a response (DNS, TLS, socket).
    #[error("control plane unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// A well-formed response that reports a failure.
    #[error("control plane error: {0}")]
    Api(String),

    /// The response body does not have the expected shape.
    #[error("malformed control plane response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The project or environment to operate in could not be found.
    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("not authenticated: {0}")]
    Unauthenticated(String),
}

impl PlatformError {
    pub fn is_discovery(&self) -> bool {
        matches!(self, Self::Discovery(_))
    }
}
