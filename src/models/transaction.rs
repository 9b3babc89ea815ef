use crate::plaid::types::PlaidTransaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub authorized_date: Option<NaiveDate>,
    /// Description as reported by the bank.
    pub name: String,
    pub merchant_name: Option<String>,
    pub city: Option<String>,
    /// Signed amount, negative when money comes in.
    pub amount: Decimal,
    pub category: Vec<String>,
    pub pending: bool,
}

impl From<PlaidTransaction> for Transaction {
    fn from(plaid: PlaidTransaction) -> Self {
        Transaction {
            id: plaid.transaction_id,
            account_id: plaid.account_id,
            date: plaid.date,
            authorized_date: plaid.authorized_date,
            name: plaid.name,
            merchant_name: plaid.merchant_name,
            city: plaid.location.city,
            amount: plaid.amount,
            category: plaid.category.unwrap_or_default(),
            pending: plaid.pending,
        }
    }
}
