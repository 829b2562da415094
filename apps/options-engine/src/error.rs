//! Error taxonomy for callers of the options engine.
//!
//! Each layer has its own `thiserror` enum ([`ProviderError`],
//! [`ValidationError`], [`InsufficientDataError`], [`ConfigError`]).
//! [`EngineError`] aggregates them at the use-case boundary and maps each to
//! a stable [`ErrorCode`].
//!
//! | Code | Retryable | Source |
//! |------|-----------|--------|
//! | `PROVIDER_UNAVAILABLE` | yes | transport failure, 5xx, task failure |
//! | `PROVIDER_RATE_LIMITED` | yes | HTTP 429 |
//! | `PROVIDER_TIMEOUT` | yes | caller-side timeout |
//! | `PROVIDER_REJECTED` | no | 4xx other than 404/429 |
//! | `PROVIDER_UNAUTHORIZED` | no | 401/403 |
//! | `NOT_FOUND` | no | unknown symbol |
//! | `PROVIDER_PARSE` | no | malformed response |
//! | `INVALID_INPUT` | no | malformed leg or candidate |
//! | `INSUFFICIENT_DATA` | no | too few usable inputs |
//! | `CONFIGURATION` | no | config read/parse/validation |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::ProviderError;
use crate::config::ConfigError;
use crate::domain::shared::{InsufficientDataError, ValidationError};

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Provider unreachable or failing.
    ProviderUnavailable,
    /// Provider rate limit hit.
    ProviderRateLimited,
    /// Provider did not answer within the caller's timeout.
    ProviderTimeout,
    /// Provider rejected the request.
    ProviderRejected,
    /// Provider rejected the credentials.
    ProviderUnauthorized,
    /// Symbol or contract unknown to the provider.
    NotFound,
    /// Provider response could not be decoded.
    ProviderParse,
    /// Malformed input.
    InvalidInput,
    /// Not enough usable data.
    InsufficientData,
    /// Configuration problem.
    Configuration,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            Self::ProviderRateLimited => "PROVIDER_RATE_LIMITED",
            Self::ProviderTimeout => "PROVIDER_TIMEOUT",
            Self::ProviderRejected => "PROVIDER_REJECTED",
            Self::ProviderUnauthorized => "PROVIDER_UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::ProviderParse => "PROVIDER_PARSE",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InsufficientData => "INSUFFICIENT_DATA",
            Self::Configuration => "CONFIGURATION",
        }
    }

    /// Whether repeating the request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable | Self::ProviderRateLimited | Self::ProviderTimeout
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Any failure surfaced by a use case.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Caller-side timeout elapsed.
    #[error("{operation} timed out after {timeout_ms} ms")]
    Timeout {
        /// What was being waited on.
        operation: String,
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// Input rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Not enough data to answer.
    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),

    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Provider(error) => match error {
                ProviderError::Transport { .. } | ProviderError::TaskFailed { .. } => {
                    ErrorCode::ProviderUnavailable
                }
                ProviderError::Status { status, .. } if *status >= 500 => {
                    ErrorCode::ProviderUnavailable
                }
                ProviderError::Status { .. } => ErrorCode::ProviderRejected,
                ProviderError::RateLimited { .. } => ErrorCode::ProviderRateLimited,
                ProviderError::NotFound { .. } => ErrorCode::NotFound,
                ProviderError::Unauthorized => ErrorCode::ProviderUnauthorized,
                ProviderError::Parse { .. } => ErrorCode::ProviderParse,
            },
            Self::Timeout { .. } => ErrorCode::ProviderTimeout,
            Self::Validation(_) => ErrorCode::InvalidInput,
            Self::InsufficientData(_) => ErrorCode::InsufficientData,
            Self::Config(_) => ErrorCode::Configuration,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.code().reason()
    }

    /// Whether repeating the request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }
}
