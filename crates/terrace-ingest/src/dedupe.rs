//! Presentation-side client deduplication
//!
//! The dashboard views need a client list merged across rows that spell
//! the same person differently. This is the single home for that logic:
//! one key (normalized name + digits-only phone), one completeness score,
//! one tie-break rule. A later duplicate replaces the kept record only
//! when its score is strictly greater, so equal-quality duplicates keep
//! the first-encountered record.

use terrace_types::{ClientRecord, SheetRecord};

const PLACEHOLDER_NAME: &str = "Unknown";
const PLACEHOLDER_COMPANY: &str = "Not provided";

/// Pass-through header names the client derivation falls back on
const COMPANY_HEADER: &str = "Company";
const CITY_HEADER: &str = "Client City";

/// Minimum digits for a phone number to count toward completeness
const MIN_PHONE_LEN: usize = 6;

/// Score a client record's completeness, 0..=5.
///
/// One point each for: a plausible email, a long-enough phone, a real
/// company, a city, and a real name.
pub fn completeness_score(client: &ClientRecord) -> u8 {
    let mut score = 0;
    if client.email.contains('@') {
        score += 1;
    }
    if client.phone.len() >= MIN_PHONE_LEN {
        score += 1;
    }
    if !client.company.is_empty() && client.company != PLACEHOLDER_COMPANY {
        score += 1;
    }
    if !client.city.is_empty() {
        score += 1;
    }
    if !client.name.is_empty() && client.name != PLACEHOLDER_NAME {
        score += 1;
    }
    score
}

/// Deduplicate clients by normalized name + digits-only phone.
///
/// Output preserves first-encounter order of each key.
pub fn dedupe_clients(clients: Vec<ClientRecord>) -> Vec<ClientRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut kept: std::collections::HashMap<String, ClientRecord> = std::collections::HashMap::new();

    for client in clients {
        let key = dedupe_key(&client);
        match kept.get(&key) {
            None => {
                order.push(key.clone());
                kept.insert(key, client);
            }
            Some(existing) => {
                if completeness_score(&client) > completeness_score(existing) {
                    kept.insert(key, client);
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| kept.remove(&key))
        .collect()
}

fn dedupe_key(client: &ClientRecord) -> String {
    let name = client.name.trim().to_lowercase();
    let digits: String = client.phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{name}|{digits}")
}

/// Derive a deduplicated client directory from classified records.
///
/// This is what the client views show: identity fields are dropped when
/// implausible (email without an `@`, phone shorter than six characters,
/// placeholder company), then the records run through [`dedupe_clients`].
pub fn clients_from_records(records: &[SheetRecord]) -> Vec<ClientRecord> {
    let mapped = records
        .iter()
        .map(|record| {
            let name = if record.client_name.is_empty() {
                PLACEHOLDER_NAME.to_string()
            } else {
                record.client_name.clone()
            };
            let email = if record.client_email.contains('@') {
                record.client_email.clone()
            } else {
                String::new()
            };
            let phone = if record.client_phone.len() >= MIN_PHONE_LEN {
                record.client_phone.clone()
            } else {
                String::new()
            };
            let company = record
                .columns
                .get(COMPANY_HEADER)
                .filter(|c| !c.is_empty() && c.as_str() != PLACEHOLDER_COMPANY)
                .cloned()
                .unwrap_or_default();
            let city = record.columns.get(CITY_HEADER).cloned().unwrap_or_default();

            ClientRecord {
                id: record.id,
                unique_key: format!("{name}_{email}").to_lowercase(),
                name,
                email,
                phone,
                city,
                company,
            }
        })
        .collect();

    dedupe_clients(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, email: &str, phone: &str, city: &str, company: &str) -> ClientRecord {
        ClientRecord {
            id: 0,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            city: city.to_string(),
            company: company.to_string(),
            unique_key: format!("{name}_{email}").to_lowercase(),
        }
    }

    #[test]
    fn test_score_range() {
        let empty = client("", "", "", "", "");
        assert_eq!(completeness_score(&empty), 0);

        let full = client("Jane", "jane@x.com", "9998887777", "Pune", "Acme");
        assert_eq!(completeness_score(&full), 5);
    }

    #[test]
    fn test_placeholders_do_not_score() {
        let c = client("Unknown", "not-an-email", "123", "", "Not provided");
        assert_eq!(completeness_score(&c), 0);
    }

    #[test]
    fn test_same_name_different_phone_formatting_merges() {
        let a = client("Jane Doe", "", "999-888-7777", "", "");
        let b = client("jane doe", "jane@x.com", "9998887777", "Pune", "Acme");
        let out = dedupe_clients(vec![a, b]);
        assert_eq!(out.len(), 1);
        // b scores higher and replaces a
        assert_eq!(out[0].email, "jane@x.com");
    }

    #[test]
    fn test_equal_score_keeps_first() {
        let a = client("Jane", "jane@x.com", "9998887777", "", "");
        let b = client("Jane", "jane@other.com", "9998887777", "", "");
        let out = dedupe_clients(vec![a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].email, "jane@x.com");
    }

    #[test]
    fn test_lower_score_never_replaces() {
        let a = client("Jane", "jane@x.com", "9998887777", "Pune", "Acme");
        let b = client("Jane", "", "9998887777", "", "");
        let out = dedupe_clients(vec![a, b]);
        assert_eq!(out[0].email, "jane@x.com");
        assert_eq!(out[0].city, "Pune");
    }

    #[test]
    fn test_distinct_clients_preserved_in_order() {
        let a = client("Jane", "jane@x.com", "111111", "", "");
        let b = client("Bob", "bob@x.com", "222222", "", "");
        let out = dedupe_clients(vec![a, b]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Jane");
        assert_eq!(out[1].name, "Bob");
    }

    fn record(id: u32, name: &str, email: &str, phone: &str) -> terrace_types::SheetRecord {
        terrace_types::SheetRecord {
            id,
            kind: terrace_types::RecordKind::Property,
            client_name: name.to_string(),
            client_email: email.to_string(),
            client_phone: phone.to_string(),
            requirement_type: "Finding Tenant".to_string(),
            details: Default::default(),
            columns: [
                ("Company".to_string(), "Acme".to_string()),
                ("Client City".to_string(), "Pune".to_string()),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_clients_from_records_drops_implausible_fields() {
        let out = clients_from_records(&[record(1, "Jane", "not-an-email", "123")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].email, "");
        assert_eq!(out[0].phone, "");
        assert_eq!(out[0].company, "Acme");
        assert_eq!(out[0].city, "Pune");
    }

    #[test]
    fn test_clients_from_records_merges_duplicates() {
        let rows = [
            record(1, "Jane Doe", "", "999-888-7777"),
            record(2, "jane doe", "jane@x.com", "9998887777"),
        ];
        let out = clients_from_records(&rows);
        assert_eq!(out.len(), 1);
        // The record with the email wins on completeness
        assert_eq!(out[0].email, "jane@x.com");
    }

    #[test]
    fn test_clients_from_records_names_placeholder() {
        let out = clients_from_records(&[record(1, "", "jane@x.com", "9998887777")]);
        assert_eq!(out[0].name, "Unknown");
    }
}
