//! Sheet record types
//!
//! Records produced by one pass of the spreadsheet ingestion pipeline.
//! Ids are assigned per output list in iteration order (1-based) and are
//! recomputed on every pass - they are not stable references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of sheet record, derived from the requirement-type column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// An owner looking for a tenant (a property listing)
    Property,
    /// A prospect looking for space (an inquiry)
    Inquiry,
}

/// Normalized detail columns carried on every property/inquiry record.
/// Wire names keep the column letters the dashboard already renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDetails {
    #[serde(rename = "col_C")]
    pub col_c: String,
    #[serde(rename = "col_D")]
    pub col_d: String,
    #[serde(rename = "col_E")]
    pub col_e: String,
}

/// A classified spreadsheet row: a property listing or a space inquiry
///
/// `columns` retains the raw row under its original header names so the
/// dashboard can render columns the normalized subset doesn't cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetRecord {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub requirement_type: String,
    pub details: RowDetails,
    #[serde(flatten)]
    pub columns: BTreeMap<String, String>,
}

/// A deduplicated client derived from repeated name/email pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub company: String,
    pub unique_key: String,
}

/// Output of one ingestion pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetData {
    pub properties: Vec<SheetRecord>,
    pub inquiries: Vec<SheetRecord>,
    pub clients: Vec<ClientRecord>,
}

impl SheetData {
    /// True when the pass produced no records of any kind
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.inquiries.is_empty() && self.clients.is_empty()
    }
}
