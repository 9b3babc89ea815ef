use super::PlaidOperations;
use crate::config::PlaidConfig;
use crate::error::{AppError, Result};
use crate::models::{Account, Transaction};
use crate::plaid::types::{
    AccountsRequest, AccountsResponse, PlaidErrorResponse, TransactionsRequest,
    TransactionsRequestOptions, TransactionsResponse,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

const PLAID_API_VERSION: &str = "2020-09-14";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct PlaidClient {
    client: Client,
    access_token: String,
    api_base_url: Url,
    page_size: u32,
}

impl PlaidClient {
    /// Create a new PlaidClient. Credentials are sent as default headers on
    /// every request.
    pub fn new(config: &PlaidConfig, page_size: u32) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("PLAID-CLIENT-ID", header_value(&config.client_id)?);
        headers.insert("PLAID-SECRET", header_value(&config.secret)?);
        headers.insert("Plaid-Version", HeaderValue::from_static(PLAID_API_VERSION));

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Plaid(format!("Failed to build reqwest client: {}", e)))?;

        let api_base_url = Url::parse(&config.api_base_url())
            .map_err(|e| AppError::Config(format!("Invalid Plaid base URL: {}", e)))?;

        debug!(env = %config.env, "Configured Plaid client");

        Ok(Self {
            client,
            access_token: config.access_token.clone(),
            api_base_url,
            page_size,
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self
            .api_base_url
            .join(path)
            .map_err(|e| AppError::Plaid(format!("Invalid endpoint {}: {}", path, e)))?;

        let response = self.client.post(url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(api_error(path, response).await);
        }

        Ok(response.json().await?)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Config(format!("Invalid Plaid credential: {}", e)))
}

async fn api_error(path: &str, response: Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::Plaid(format!("{} failed: {} - {}", path, status, error_detail(body)))
}

/// Plaid's error summary, or the raw body when it is not a Plaid error.
fn error_detail(body: String) -> String {
    match serde_json::from_str::<PlaidErrorResponse>(&body) {
        Ok(err) => format!(
            "{} {}: {}",
            err.error_type, err.error_code, err.error_message
        ),
        Err(_) => body,
    }
}

/// Offset of the next page, or `None` once everything has been received.
fn next_offset(received: usize, total: u32, last_page_len: usize) -> Option<u32> {
    if last_page_len == 0 || received >= total as usize {
        return None;
    }
    u32::try_from(received).ok()
}

#[async_trait]
impl PlaidOperations for PlaidClient {
    #[instrument(name = "Fetching accounts", skip_all)]
    async fn get_accounts(&self) -> Result<Vec<Account>> {
        let request = AccountsRequest {
            access_token: &self.access_token,
        };
        let response: AccountsResponse = self.post("/accounts/get", &request).await?;

        debug!(count = response.accounts.len(), "Fetched accounts");

        Ok(response.accounts.into_iter().map(Into::into).collect())
    }

    #[instrument(name = "Fetching transactions", skip_all, fields(%from, %to))]
    async fn get_transactions(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = Vec::new();
        let mut offset = 0;

        loop {
            let request = TransactionsRequest {
                access_token: &self.access_token,
                start_date: from.format(DATE_FORMAT).to_string(),
                end_date: to.format(DATE_FORMAT).to_string(),
                options: TransactionsRequestOptions {
                    count: self.page_size,
                    offset,
                },
            };
            let page: TransactionsResponse = self.post("/transactions/get", &request).await?;

            let page_len = page.transactions.len();
            transactions.extend(page.transactions.into_iter().map(Transaction::from));
            debug!(
                offset,
                page_len,
                total = page.total_transactions,
                "Fetched transaction page"
            );

            match next_offset(transactions.len(), page.total_transactions, page_len) {
                Some(next) => offset = next,
                None => break,
            }
        }

        Ok(transactions)
    }
}
