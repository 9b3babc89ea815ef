mod auth;
mod client;

pub use client::SheetsClient;

use crate::error::Result;
use crate::models::SheetRow;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait SheetOperations {
    /// ID of the last transaction written to the sheet, if any.
    async fn last_transaction_id(&self) -> Result<Option<String>>;

    async fn append_rows(&self, rows: &[SheetRow]) -> Result<()>;
}

/// Pick the last non-blank cell from a single-column read.
pub(crate) fn last_cell(values: &[Vec<Value>]) -> Option<String> {
    values.iter().rev().find_map(|row| {
        let cell = match row.first()? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!cell.is_empty()).then_some(cell)
    })
}
