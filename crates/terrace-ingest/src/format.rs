//! Display formatting helpers for ingested records
//!
//! Free-text sheet cells cram location and size into one line; these
//! helpers reshape them for the dashboard views.

use std::sync::LazyLock;

use regex::Regex;

static INDIA_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(India),?\s*").expect("valid regex"));

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

static SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:\s*[-+]\s*\d+)?\s*(?:sq\s*ft|square\s*feet|sft|sqft|sq\s*feet|sqmtrs|acres)")
        .expect("valid regex")
});

/// Format a raw location cell for display.
///
/// Inserts a line break after each occurrence of "India" (the cells list
/// several localities joined on the country name), collapses runs of
/// spaces and tabs, and trims. An empty cell formats as "N/A".
pub fn format_location(raw: &str) -> String {
    let broken = INDIA_BREAK.replace_all(raw, "$1\n");
    let collapsed = SPACE_RUNS.replace_all(&broken, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        "N/A".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Pull the first size token ("2000 sq ft", "3 acres", ...) out of a
/// free-text description.
pub fn extract_size(description: &str) -> Option<String> {
    SIZE_TOKEN
        .find(description)
        .map(|m| m.as_str().to_string())
}
