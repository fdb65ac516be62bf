//! Row sources
//!
//! Acquiring raw rows is the only async, fallible part of ingestion. The
//! production source is the Google Sheets values API; a local workbook
//! source covers development machines without API credentials.

use std::path::PathBuf;

use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::error::IngestError;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// A source of raw spreadsheet rows
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch the full set of rows, header row included.
    ///
    /// Failures are real errors - an empty sheet is `Ok(vec![])`.
    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, IngestError>;
}

/// Configuration for the Google Sheets values API source
#[derive(Debug, Clone)]
pub struct SheetsApiConfig {
    pub spreadsheet_id: String,
    /// A1-notation range, e.g. `Sheet1!A:Z`
    pub range: String,
    pub api_key: String,
}

/// Google Sheets values API source
#[derive(Clone)]
pub struct SheetsApiSource {
    client: Client,
    config: SheetsApiConfig,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl SheetsApiSource {
    /// Create a new sheets API source
    pub fn new(config: SheetsApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl RowSource for SheetsApiSource {
    #[instrument(skip(self), fields(spreadsheet_id = %self.config.spreadsheet_id))]
    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, IngestError> {
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{}",
            self.config.spreadsheet_id, self.config.range
        );

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Sheets API request failed");
                IngestError::Http(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Sheets API error");
            return Err(IngestError::Upstream {
                status: status.as_u16(),
                message: format!("sheets API returned {status}"),
            });
        }

        let values: ValuesResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Sheets API response");
            IngestError::Http(e)
        })?;

        debug!(rows = values.values.len(), "fetched sheet rows");

        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(json_cell_to_string).collect())
            .collect())
    }
}

fn json_cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Local `.xlsx` workbook source (first worksheet)
#[derive(Debug, Clone)]
pub struct XlsxSource {
    path: PathBuf,
}

impl XlsxSource {
    /// Create a new workbook source
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RowSource for XlsxSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, IngestError> {
        let path = self.path.clone();

        // calamine is blocking file IO
        tokio::task::spawn_blocking(move || read_workbook(&path))
            .await
            .map_err(|e| IngestError::File(format!("workbook read task failed: {e}")))?
    }
}

fn read_workbook(path: &PathBuf) -> Result<Vec<Vec<String>>, IngestError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| IngestError::File(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::File("workbook has no worksheets".to_string()))?
        .map_err(|e| IngestError::File(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(data_cell_to_string).collect())
        .collect())
}

fn data_cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
