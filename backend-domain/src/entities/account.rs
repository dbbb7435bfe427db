// Account entity
// Balance-holding user; credentials only ever stored as a PHC hash string

use serde::{Deserialize, Serialize};

use crate::value_objects::{AccountId, Currency, Money};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub password_hash: String,
    pub balance: Money,
    pub gold_balance: Money,
    pub sandbox_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_url: Option<String>,
    pub language: String,
    pub created_at: i64,
}

impl Account {
    pub fn balance_in(&self, currency: Currency) -> Money {
        match currency {
            Currency::Standard => self.balance,
            Currency::Gold => self.gold_balance,
        }
    }

    pub fn balance_mut(&mut self, currency: Currency) -> &mut Money {
        match currency {
            Currency::Standard => &mut self.balance,
            Currency::Gold => &mut self.gold_balance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub balance: Money,
    pub sandbox_mode: bool,
}

/// Public projection of an [`Account`]; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub username: String,
    pub balance: Money,
    pub gold_balance: Money,
    pub sandbox_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_url: Option<String>,
    pub language: String,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            username: account.username.clone(),
            balance: account.balance,
            gold_balance: account.gold_balance,
            sandbox_mode: account.sandbox_mode,
            pfp_url: account.pfp_url.clone(),
            language: account.language.clone(),
        }
    }
}
