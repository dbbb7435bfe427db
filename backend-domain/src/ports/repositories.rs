use async_trait::async_trait;

use crate::entities::{Account, Case, InventoryItem, NewAccount, OpeningRecordRow, Session};
use crate::errors::LedgerError;
use crate::value_objects::{AccountId, Currency, ItemId, Money};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fails with `UsernameTaken` on a case-insensitive name clash.
    async fn create_account(&self, account: NewAccount) -> Result<Account, LedgerError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, LedgerError>;
    async fn get_account(&self, account_id: &AccountId) -> Result<Account, LedgerError>;
    /// Checks and subtracts in one step; rejects with `InsufficientBalance`
    /// without touching the balance.
    async fn debit(
        &self,
        account_id: &AccountId,
        currency: Currency,
        amount: Money,
    ) -> Result<Account, LedgerError>;
    async fn credit(
        &self,
        account_id: &AccountId,
        currency: Currency,
        amount: Money,
    ) -> Result<Account, LedgerError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: Session) -> Result<(), LedgerError>;
    async fn find_session(&self, digest: &str) -> Result<Option<Session>, LedgerError>;
    async fn delete_session(&self, digest: &str) -> Result<(), LedgerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Sell,
    Upgrade,
}

#[derive(Debug, Clone)]
pub struct SettlementReceipt {
    pub item: InventoryItem,
    pub credited: Money,
    pub account: Account,
}

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn insert_item(&self, item: InventoryItem) -> Result<(), LedgerError>;
    async fn list_items(
        &self,
        owner_id: &AccountId,
        include_settled: bool,
    ) -> Result<Vec<InventoryItem>, LedgerError>;
    /// Flags the item and, for `Sell`, credits its value in the same step.
    /// A second settlement of the same item fails with `ItemAlreadySettled`.
    async fn settle_item(
        &self,
        owner_id: &AccountId,
        item_id: &ItemId,
        settlement: Settlement,
    ) -> Result<SettlementReceipt, LedgerError>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn load_catalog(&self, path: &str) -> anyhow::Result<Vec<Case>>;
    async fn save_catalog(&self, path: &str, cases: &[Case]) -> anyhow::Result<()>;
}

#[async_trait]
pub trait OpeningAuditRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn insert_opening(&self, record: &OpeningRecordRow) -> anyhow::Result<()>;
    async fn fetch_openings(
        &self,
        account_id: &str,
        date: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<OpeningRecordRow>>;
    async fn fetch_opening(&self, opening_id: &str) -> anyhow::Result<Option<OpeningRecordRow>>;
    async fn ping(&self) -> anyhow::Result<()>;
}
