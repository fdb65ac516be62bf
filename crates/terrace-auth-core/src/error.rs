//! Auth errors

use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Callback arrived without the authorization code
    #[error("missing code parameter")]
    MissingCode,

    /// The `state` parameter did not match the stored expectation
    #[error("state mismatch")]
    StateMismatch,

    /// The code-for-token exchange failed
    #[error("token exchange failed: {0}")]
    ExchangeFailed(String),

    /// The provider profile did not include an email address
    #[error("user profile does not contain an email")]
    ProfileMissingEmail,

    /// Invalid cookie (malformed, bad signature)
    #[error("invalid token")]
    InvalidToken,

    /// Cookie has expired
    #[error("token expired")]
    TokenExpired,

    /// Provider returned a non-success response
    #[error("provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// Transport-level failure reaching the provider
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCode | Self::StateMismatch => 400,
            Self::InvalidToken | Self::TokenExpired => 401,
            Self::ExchangeFailed(_) | Self::ProfileMissingEmail | Self::Provider { .. } => 502,
            Self::Http(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCode => "MISSING_CODE",
            Self::StateMismatch => "STATE_MISMATCH",
            Self::ExchangeFailed(_) => "EXCHANGE_FAILED",
            Self::ProfileMissingEmail => "PROFILE_MISSING_EMAIL",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
