//! Ingestion errors

use thiserror::Error;

/// Ingestion errors
///
/// An empty sheet is not an error - the pipeline returns empty output for
/// it. Errors here always mean the read or the configuration failed.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The upstream sheet API rejected the request
    #[error("upstream source error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Transport-level failure reaching the upstream source
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local workbook could not be opened or read
    #[error("workbook error: {0}")]
    File(String),

    /// The column schema is internally inconsistent
    #[error("invalid sheet schema: {0}")]
    Schema(String),
}
