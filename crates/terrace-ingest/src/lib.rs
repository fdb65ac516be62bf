//! Terrace Ingest - Spreadsheet ingestion pipeline
//!
//! Converts raw spreadsheet rows into typed property/inquiry/client
//! records. The pipeline is pure and synchronous; row acquisition is the
//! async [`source::RowSource`] seam with a Google Sheets implementation
//! and a local workbook fallback.
//!
//! Fetch failures surface as [`IngestError`] - callers can always tell a
//! failed read apart from a legitimately empty sheet.

pub mod classify;
pub mod dedupe;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod schema;
pub mod source;

pub use classify::{classify_requirement, Classification};
pub use dedupe::{clients_from_records, completeness_score, dedupe_clients};
pub use error::IngestError;
pub use format::{extract_size, format_location};
pub use pipeline::ingest;
pub use schema::SheetSchema;
pub use source::{RowSource, SheetsApiSource, SheetsApiConfig, XlsxSource};
