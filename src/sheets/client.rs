use super::{SheetOperations, last_cell};
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use crate::models::{SheetRow, ToSheetValues};
use crate::sheets::auth::create_and_verify_authenticator;
use async_trait::async_trait;
use google_sheets4::api::{Scope, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use tracing::{debug, instrument};

// Read and write access to the target spreadsheet
pub(crate) const AUTH_SCOPE: Scope = Scope::Spreadsheet;

// Columns A to L, see `SheetRow`.
const TABLE_COLUMNS: &str = "A:L";
const ID_COLUMN: &str = "L:L";

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    config: GoogleConfig,
}

impl SheetsClient {
    /// Create a new SheetsClient with authenticated access
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(config: &GoogleConfig) -> Result<Self> {
        let auth = create_and_verify_authenticator(config).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Sheets(format!("Failed to load native roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Self {
            hub: Sheets::new(client, auth),
            config: config.clone(),
        })
    }

    pub fn spreadsheet_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}",
            self.config.spreadsheet_id
        )
    }
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Reading last transaction ID", skip(self))]
    async fn last_transaction_id(&self) -> Result<Option<String>> {
        let range = self.config.range(ID_COLUMN);
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_get(&self.config.spreadsheet_id, &range)
            .major_dimension("ROWS")
            .value_render_option("FORMATTED_VALUE")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to read range '{}': {}", range, e)))?;

        let values = response.values.unwrap_or_default();
        let last_id = last_cell(&values);
        debug!(rows = values.len(), ?last_id, "Read ID column");

        Ok(last_id)
    }

    #[instrument(name = "Appending rows", skip_all, fields(rows = rows.len()))]
    async fn append_rows(&self, rows: &[SheetRow]) -> Result<()> {
        if rows.is_empty() {
            debug!("Nothing to append");
            return Ok(());
        }

        let range = self.config.range(TABLE_COLUMNS);
        let value_range = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: Some(range.clone()),
            values: Some(rows.to_sheet_values()),
        };

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_append(value_range, &self.config.spreadsheet_id, &range)
            .value_input_option("RAW")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to append rows: {}", e)))?;

        let updates = response.updates.unwrap_or_default();
        debug!(
            updated_range = ?updates.updated_range,
            updated_rows = ?updates.updated_rows,
            "Appended rows"
        );

        Ok(())
    }
}
