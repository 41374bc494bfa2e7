//! Error types for the banner renderer

use std::fmt;
use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which remote call produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The invite metadata lookup
    Invite,
    /// The guild icon download
    Icon,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Invite => f.write_str("invite"),
            Endpoint::Icon => f.write_str("icon"),
        }
    }
}

/// Errors that can occur while rendering a banner
#[derive(Error, Debug)]
pub enum Error {
    /// Fonts, locales or the HTTP client could not be set up
    #[error("Renderer initialization failed: {0}")]
    InitializationError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Transport error or non-success status from a remote endpoint
    #[error("Failed to fetch {endpoint}: {reason}")]
    FetchFailure { endpoint: Endpoint, reason: String },

    /// Response body did not carry the expected fields
    #[error("Malformed {endpoint} response: {reason}")]
    MalformedResponse { endpoint: Endpoint, reason: String },

    /// A remote call did not complete in time
    #[error("{endpoint} request timed out after {ms}ms")]
    Timeout { endpoint: Endpoint, ms: u64 },
}

impl Error {
    /// The endpoint involved, if this error came from a remote call
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Error::FetchFailure { endpoint, .. }
            | Error::MalformedResponse { endpoint, .. }
            | Error::Timeout { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }

    pub(crate) fn fetch(endpoint: Endpoint, reason: impl fmt::Display) -> Self {
        Error::FetchFailure {
            endpoint,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(endpoint: Endpoint, reason: impl fmt::Display) -> Self {
        Error::MalformedResponse {
            endpoint,
            reason: reason.to_string(),
        }
    }
}
