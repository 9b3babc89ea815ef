use crate::error::Result;
use crate::models::Transaction;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io::Write;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Plaid amounts are negative when money comes into the account.
    pub fn from_amount(amount: Decimal) -> Self {
        match amount.is_sign_negative() && !amount.is_zero() {
            true => Direction::In,
            false => Direction::Out,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => f.write_str("In"),
            Direction::Out => f.write_str("Out"),
        }
    }
}

/// One spreadsheet row, columns A to L. The transaction ID must stay last:
/// it is read back as the sync boundary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SheetRow {
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Merchant")]
    pub merchant: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
    #[serde(rename = "Direction")]
    pub direction: Direction,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Authorized Date")]
    pub authorized_date: String,
    #[serde(rename = "Transaction ID")]
    pub id: String,
}

impl SheetRow {
    pub const HEADERS: [&'static str; 12] = [
        "Account",
        "Year",
        "Month",
        "Date",
        "Description",
        "Merchant",
        "City",
        "Amount",
        "Direction",
        "Category",
        "Authorized Date",
        "Transaction ID",
    ];

    pub fn new(transaction: &Transaction, account_name: Option<&str>) -> Self {
        SheetRow {
            account: account_name.unwrap_or_default().to_string(),
            year: transaction.date.format("%Y").to_string(),
            month: transaction.date.format("%m").to_string(),
            date: transaction.date.format(DATE_FORMAT).to_string(),
            description: transaction.name.clone(),
            merchant: transaction.merchant_name.clone().unwrap_or_default(),
            city: transaction.city.clone().unwrap_or_default(),
            amount: transaction.amount,
            direction: Direction::from_amount(transaction.amount),
            category: transaction.category.join(", "),
            authorized_date: transaction
                .authorized_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            id: transaction.id.clone(),
        }
    }

    /// Cell values in column order. The amount is written as a number.
    pub fn to_values(&self) -> Vec<Value> {
        let amount = self
            .amount
            .to_f64()
            .map(Value::from)
            .unwrap_or_else(|| Value::String(self.amount.to_string()));

        vec![
            Value::String(self.account.clone()),
            Value::String(self.year.clone()),
            Value::String(self.month.clone()),
            Value::String(self.date.clone()),
            Value::String(self.description.clone()),
            Value::String(self.merchant.clone()),
            Value::String(self.city.clone()),
            amount,
            Value::String(self.direction.to_string()),
            Value::String(self.category.clone()),
            Value::String(self.authorized_date.clone()),
            Value::String(self.id.clone()),
        ]
    }
}

pub trait ToSheetValues {
    /// Convert rows to the cell grid expected by the Sheets values API.
    fn to_sheet_values(&self) -> Vec<Vec<Value>>;

    /// Write rows as CSV, headers first.
    fn write_csv<W: Write>(&self, writer: W) -> Result<()>;
}

impl ToSheetValues for [SheetRow] {
    fn to_sheet_values(&self) -> Vec<Vec<Value>> {
        self.iter().map(SheetRow::to_values).collect()
    }

    fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        // Written explicitly so an empty set still gets headers
        // https://github.com/BurntSushi/rust-csv/issues/161
        writer.write_record(SheetRow::HEADERS)?;
        for row in self {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::test_helpers::{mock_date, mock_transaction};
    use rust_decimal::prelude::dec;

    #[test]
    fn test_direction_from_amount() {
        assert_eq!(Direction::from_amount(dec!(-0.01)), Direction::In);
        assert_eq!(Direction::from_amount(dec!(-1500)), Direction::In);
        assert_eq!(Direction::from_amount(dec!(0)), Direction::Out);
        assert_eq!(Direction::from_amount(dec!(-0.00)), Direction::Out);
        assert_eq!(Direction::from_amount(dec!(25.5)), Direction::Out);
    }

    #[test]
    fn test_new_with_all_fields() {
        let tx = Transaction {
            merchant_name: Some("Uber".to_string()),
            city: Some("Austin".to_string()),
            authorized_date: Some(mock_date(2024, 2, 28)),
            category: vec!["Travel".to_string(), "Taxi".to_string()],
            ..mock_transaction("tx_1", dec!(-6.33), mock_date(2024, 3, 1))
        };

        let row = SheetRow::new(&tx, Some("Checking"));
        let expected = SheetRow {
            account: "Checking".to_string(),
            year: "2024".to_string(),
            month: "03".to_string(),
            date: "2024-03-01".to_string(),
            description: "mock transaction: tx_1".to_string(),
            merchant: "Uber".to_string(),
            city: "Austin".to_string(),
            amount: dec!(-6.33),
            direction: Direction::In,
            category: "Travel, Taxi".to_string(),
            authorized_date: "2024-02-28".to_string(),
            id: "tx_1".to_string(),
        };
        assert_eq!(row, expected);
    }

    #[test]
    fn test_new_missing_fields_are_empty() {
        let tx = mock_transaction("tx_2", dec!(12), mock_date(2024, 12, 9));
        let row = SheetRow::new(&tx, None);

        assert_eq!(row.account, "");
        assert_eq!(row.merchant, "");
        assert_eq!(row.city, "");
        assert_eq!(row.category, "");
        assert_eq!(row.authorized_date, "");
        assert_eq!(row.direction, Direction::Out);
        assert_eq!(row.month, "12");
    }

    #[test]
    fn test_to_values() {
        let tx = mock_transaction("tx_3", dec!(42.5), mock_date(2024, 1, 15));
        let values = SheetRow::new(&tx, Some("Savings")).to_values();

        assert_eq!(values.len(), SheetRow::HEADERS.len());
        assert_eq!(values[0], Value::from("Savings"));
        assert_eq!(values[3], Value::from("2024-01-15"));
        assert_eq!(values[7], Value::from(42.5));
        assert_eq!(values[8], Value::from("Out"));
        assert_eq!(values[11], Value::from("tx_3"));
    }

    #[test]
    fn test_write_csv() {
        let tx = Transaction {
            category: vec!["Shops".to_string()],
            ..mock_transaction("tx_4", dec!(-10.25), mock_date(2024, 5, 2))
        };
        let rows = vec![SheetRow::new(&tx, Some("Checking"))];

        let mut out = Vec::new();
        rows.as_slice().write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        let expected = "\
Account,Year,Month,Date,Description,Merchant,City,Amount,Direction,Category,Authorized Date,Transaction ID
Checking,2024,05,2024-05-02,mock transaction: tx_4,,,-10.25,In,Shops,,tx_4
";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_write_csv_empty() {
        let rows: Vec<SheetRow> = Vec::new();

        let mut out = Vec::new();
        rows.as_slice().write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("Account,Year"));
    }
}
