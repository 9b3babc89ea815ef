use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct AccountsRequest<'a> {
    pub(super) access_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct AccountsResponse {
    pub(super) accounts: Vec<PlaidAccount>,
}

#[derive(Debug, Serialize)]
pub(super) struct TransactionsRequest<'a> {
    pub(super) access_token: &'a str,
    pub(super) start_date: String,
    pub(super) end_date: String,
    pub(super) options: TransactionsRequestOptions,
}

#[derive(Debug, Serialize)]
pub(super) struct TransactionsRequestOptions {
    pub(super) count: u32,
    pub(super) offset: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct TransactionsResponse {
    pub(super) transactions: Vec<PlaidTransaction>,
    pub(super) total_transactions: u32,
}

// https://plaid.com/docs/api/accounts/#accounts-get-response-accounts
#[derive(Debug, Deserialize)]
pub struct PlaidAccount {
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub official_name: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
}

// https://plaid.com/docs/api/products/transactions/#transactionsget
#[derive(Debug, Deserialize)]
pub struct PlaidTransaction {
    pub transaction_id: String,
    pub account_id: String,
    /// Positive when money leaves the account.
    pub amount: Decimal,
    pub date: chrono::NaiveDate,
    #[serde(default)]
    pub authorized_date: Option<chrono::NaiveDate>,
    pub name: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub location: PlaidLocation,
    #[serde(default)]
    pub category: Option<Vec<String>>,
    pub pending: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlaidLocation {
    #[serde(default)]
    pub city: Option<String>,
}

// https://plaid.com/docs/errors/#error-schema
#[derive(Debug, Deserialize)]
pub(super) struct PlaidErrorResponse {
    pub(super) error_type: String,
    pub(super) error_code: String,
    pub(super) error_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::prelude::dec;

    #[test]
    fn test_transaction_with_nulls() {
        let json = r#"{
            "transaction_id": "tx_1",
            "account_id": "acc_1",
            "amount": 12.5,
            "iso_currency_code": "USD",
            "date": "2024-03-05",
            "authorized_date": null,
            "name": "Coffee",
            "merchant_name": null,
            "location": { "city": null, "region": null },
            "category": null,
            "pending": false
        }"#;

        let tx: PlaidTransaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.transaction_id, "tx_1");
        assert_eq!(tx.amount, dec!(12.5));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(tx.authorized_date, None);
        assert_eq!(tx.merchant_name, None);
        assert_eq!(tx.location.city, None);
        assert_eq!(tx.category, None);
    }

    #[test]
    fn test_transaction_without_location() {
        let json = r#"{
            "transaction_id": "tx_2",
            "account_id": "acc_1",
            "amount": -100,
            "date": "2024-03-06",
            "authorized_date": "2024-03-04",
            "name": "Payroll",
            "category": ["Transfer", "Payroll"],
            "pending": true
        }"#;

        let tx: PlaidTransaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.amount, dec!(-100));
        assert_eq!(
            tx.authorized_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
        );
        assert_eq!(tx.location.city, None);
        assert_eq!(
            tx.category,
            Some(vec!["Transfer".to_string(), "Payroll".to_string()])
        );
        assert!(tx.pending);
    }

    #[test]
    fn test_transactions_request_body() {
        let request = TransactionsRequest {
            access_token: "access-sandbox-123",
            start_date: "2024-03-01".to_string(),
            end_date: "2024-03-16".to_string(),
            options: TransactionsRequestOptions {
                count: 500,
                offset: 0,
            },
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "access_token": "access-sandbox-123",
                "start_date": "2024-03-01",
                "end_date": "2024-03-16",
                "options": { "count": 500, "offset": 0 }
            })
        );
    }

    #[test]
    fn test_error_response() {
        let json = r#"{
            "error_type": "ITEM_ERROR",
            "error_code": "ITEM_LOGIN_REQUIRED",
            "error_message": "the login details of this item have changed",
            "display_message": null,
            "request_id": "abc"
        }"#;

        let err: PlaidErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.error_type, "ITEM_ERROR");
        assert_eq!(err.error_code, "ITEM_LOGIN_REQUIRED");
    }
}
