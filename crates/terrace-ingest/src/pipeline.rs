//! The ingestion pipeline
//!
//! One pure pass over the raw rows of a sheet: classify each data row into
//! properties and/or inquiries, and derive the deduplicated client
//! directory. Nothing here is cached - every call recomputes from the rows
//! it is given, so record ids are only meaningful within a single pass.

use std::collections::{BTreeMap, HashSet};

use terrace_types::{ClientRecord, RecordKind, RowDetails, SheetData, SheetRecord};

use crate::classify::classify_requirement;
use crate::schema::SheetSchema;

/// Run one ingestion pass.
///
/// The first row is the header row; remaining rows are data. Rows with no
/// content are skipped. Rows matching neither classification predicate
/// appear in neither list but still contribute a client record when both
/// name and email are present. The ingestion-level client key is the
/// lowercased `name_email` pair; the first occurrence wins.
pub fn ingest(rows: &[Vec<String>], schema: &SheetSchema) -> SheetData {
    let Some((headers, data)) = rows.split_first() else {
        return SheetData::default();
    };

    let mut out = SheetData::default();
    let mut seen_clients: HashSet<String> = HashSet::new();

    for row in data {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let columns: BTreeMap<String, String> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), cell(row, i).to_string()))
            .collect();

        let name = cell(row, schema.name);
        let email = cell(row, schema.email);
        let phone = cell(row, schema.phone);
        let requirement = cell(row, schema.requirement_type);

        let details = RowDetails {
            col_c: cell(row, schema.details[0]).to_string(),
            col_d: cell(row, schema.details[1]).to_string(),
            col_e: cell(row, schema.details[2]).to_string(),
        };

        let classification = classify_requirement(requirement);

        if classification.property {
            out.properties.push(make_record(
                out.properties.len() as u32 + 1,
                RecordKind::Property,
                name,
                email,
                phone,
                requirement,
                &details,
                &columns,
            ));
        }
        if classification.inquiry {
            out.inquiries.push(make_record(
                out.inquiries.len() as u32 + 1,
                RecordKind::Inquiry,
                name,
                email,
                phone,
                requirement,
                &details,
                &columns,
            ));
        }

        if !name.is_empty() && !email.is_empty() {
            let unique_key = format!("{name}_{email}").to_lowercase();
            if seen_clients.insert(unique_key.clone()) {
                out.clients.push(ClientRecord {
                    id: out.clients.len() as u32 + 1,
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: phone.to_string(),
                    city: cell(row, schema.city).to_string(),
                    company: cell(row, schema.company).to_string(),
                    unique_key,
                });
            }
        }
    }

    tracing::debug!(
        properties = out.properties.len(),
        inquiries = out.inquiries.len(),
        clients = out.clients.len(),
        "ingestion pass complete"
    );

    out
}

/// Read a cell by index; short rows read as empty cells
fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

#[allow(clippy::too_many_arguments)]
fn make_record(
    id: u32,
    kind: RecordKind,
    name: &str,
    email: &str,
    phone: &str,
    requirement: &str,
    details: &RowDetails,
    columns: &BTreeMap<String, String>,
) -> SheetRecord {
    SheetRecord {
        id,
        kind,
        client_name: name.to_string(),
        client_email: email.to_string(),
        client_phone: phone.to_string(),
        requirement_type: requirement.to_string(),
        details: details.clone(),
        columns: columns.clone(),
    }
}
