use reqwest::StatusCode;
use serde::Deserialize;

use crate::sheets::auth::ServiceAccount;
use crate::utils::error::{EtlError, Result};

pub const SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Thin wrapper over the Sheets v4 REST API carrying a bearer token.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    spreadsheet_id: String,
    properties: SpreadsheetProperties,
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Deserialize)]
struct SpreadsheetProperties {
    title: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    title: String,
}

impl Spreadsheet {
    pub fn id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn title(&self) -> &str {
        &self.properties.title
    }

    /// Title of the first worksheet (index 0), the publish target.
    pub fn first_sheet_title(&self) -> Result<&str> {
        self.sheets
            .first()
            .map(|sheet| sheet.properties.title.as_str())
            .ok_or_else(|| EtlError::ProcessingError {
                message: format!("spreadsheet '{}' has no worksheets", self.spreadsheet_id),
            })
    }
}

/// Quotes a worksheet title for A1 notation ranges.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

impl SheetsClient {
    /// Authenticates with the given service account and returns a client
    /// against the public Sheets endpoint.
    pub async fn connect(account: &ServiceAccount) -> Result<Self> {
        let http = reqwest::Client::new();
        let token = account.fetch_access_token(&http).await?;
        Ok(Self {
            http,
            token: token.access_token,
            base_url: SHEETS_API_BASE_URL.to_string(),
        })
    }

    /// Builds a client from an existing token, optionally against a
    /// different endpoint. Used by tests.
    pub fn with_token(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    pub async fn open_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet> {
        let url = format!("{}/spreadsheets/{}", self.base_url, spreadsheet_id);
        let response = self.http.get(&url).bearer_auth(&self.token).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(EtlError::SpreadsheetNotFound {
                spreadsheet_id: spreadsheet_id.to_string(),
            });
        }

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn create_spreadsheet(&self, title: &str) -> Result<Spreadsheet> {
        let url = format!("{}/spreadsheets", self.base_url);
        let body = serde_json::json!({ "properties": { "title": title } });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Opens the spreadsheet, falling back to creating one titled with the
    /// requested identifier when it does not exist. The created spreadsheet
    /// has a different id than the one asked for; it is logged so the
    /// operator can update the configured id instead of re-creating a fresh
    /// spreadsheet on every run.
    pub async fn open_or_create(&self, spreadsheet_id: &str) -> Result<Spreadsheet> {
        match self.open_spreadsheet(spreadsheet_id).await {
            Ok(spreadsheet) => Ok(spreadsheet),
            Err(EtlError::SpreadsheetNotFound { .. }) => {
                tracing::warn!(
                    "Spreadsheet '{}' not found, creating a new one",
                    spreadsheet_id
                );
                let created = self.create_spreadsheet(spreadsheet_id).await?;
                tracing::warn!(
                    "Created spreadsheet '{}' with id '{}'; update the configured \
                     spreadsheet id to reuse it on future runs",
                    created.title(),
                    created.id()
                );
                Ok(created)
            }
            Err(e) => Err(e),
        }
    }

    /// Clears every value in the given A1 range.
    pub async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<()> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}:clear",
            self.base_url, spreadsheet_id, range
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// Writes rows starting at the top-left cell of `range`, raw (values are
    /// stored exactly as sent, without spreadsheet-side parsing).
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &[Vec<String>],
    ) -> Result<()> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url, spreadsheet_id, range
        );
        let body = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });
        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(EtlError::SheetsError {
        status: status.as_u16(),
        message: extract_error_message(&body),
    })
}

/// Google wraps failures as `{"error": {"message": ...}}`; fall back to the
/// raw body when that shape is absent.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
