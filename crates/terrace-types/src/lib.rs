//! Terrace Types - Shared domain types
//!
//! Core types used across the Terrace crates: deal records with their
//! status lifecycle, and the record shapes produced by spreadsheet
//! ingestion.

pub mod deal;
pub mod sheet;

pub use deal::*;
pub use sheet::*;
