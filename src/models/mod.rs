pub mod account;
pub mod row;
pub mod transaction;

pub use account::{Account, AccountNames};
pub use row::{SheetRow, ToSheetValues};
pub use transaction::Transaction;
