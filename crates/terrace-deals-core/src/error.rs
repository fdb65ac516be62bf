//! Deal errors

use thiserror::Error;

/// Deal operation errors
#[derive(Error, Debug)]
pub enum DealError {
    /// Caller's email is not on the team allowlist
    #[error("not authorized to access deals")]
    NotAuthorized,

    /// Caller neither owns the deal nor is the admin
    #[error("not the owner of this deal")]
    NotOwner,

    /// Deal not found
    #[error("deal not found")]
    NotFound,

    /// Input failed validation
    #[error("validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("database error")]
    Db(#[from] terrace_db::DbError),
}

impl DealError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotAuthorized | Self::NotOwner => 403,
            Self::NotFound => 404,
            Self::Validation(_) => 400,
            Self::Db(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::NotOwner => "NOT_OWNER",
            Self::NotFound => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Db(_) => "DATABASE_ERROR",
        }
    }
}
