//! Google Sheets source for DST ranges.
//!
//! Fetches named ranges through the Sheets `values` REST API with an API
//! key. Only read access is needed; the sheet must be readable by the key's
//! project.

use serde::Deserialize;

use super::records_from_grid;
use crate::error::{SheetError, SheetResult};
use crate::models::RawRecord;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Client for one spreadsheet.
#[derive(Clone)]
pub struct GoogleSheetClient {
    http: reqwest::Client,
    spreadsheet_id: String,
    api_key: String,
    base_url: String,
}

/// Response shape of the `values.get` endpoint.
#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl GoogleSheetClient {
    pub fn new(spreadsheet_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            api_key: api_key.into(),
            base_url: SHEETS_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch a named range and convert it to records. The first row of the
    /// range is the header row. An absent or empty range yields an empty
    /// list, not an error; the pipeline reports it as an empty-input run.
    pub async fn fetch(&self, range: &str) -> SheetResult<Vec<RawRecord>> {
        let url = format!(
            "{}/{}/values/{}?key={}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range),
            urlencoding::encode(&self.api_key),
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SheetError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(SheetError::ApiError { status: status.as_u16(), message });
        }

        let body: ValuesResponse = response
            .json()
            .await
            .map_err(|e| SheetError::HttpError(e.to_string()))?;

        Ok(records_from_grid(&body.values))
    }
}
