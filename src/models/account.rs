use crate::plaid::types::PlaidAccount;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub official_name: Option<String>,
    pub mask: Option<String>,
    pub subtype: Option<String>,
}

impl From<PlaidAccount> for Account {
    fn from(plaid: PlaidAccount) -> Self {
        Account {
            id: plaid.account_id,
            name: plaid.name,
            official_name: plaid.official_name,
            mask: plaid.mask,
            subtype: plaid.subtype.or(plaid.type_),
        }
    }
}

/// Lookup of account display names by account id.
#[derive(Debug, Clone, Default)]
pub struct AccountNames(HashMap<String, String>);

impl AccountNames {
    pub fn get(&self, account_id: &str) -> Option<&str> {
        self.0.get(account_id).map(String::as_str)
    }
}

impl FromIterator<Account> for AccountNames {
    fn from_iter<I: IntoIterator<Item = Account>>(iter: I) -> Self {
        AccountNames(iter.into_iter().map(|a| (a.id, a.name)).collect())
    }
}
