use std::collections::HashMap;
use std::path::Path;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::utils::write_replacing;
use backend_domain::ports::{
    AccountRepository, InventoryRepository, SessionRepository, Settlement, SettlementReceipt,
};
use backend_domain::{
    current_millis, Account, AccountId, Currency, InventoryItem, ItemId, LedgerError, Money,
    NewAccount, Session,
};

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerSnapshot {
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    sessions: Vec<Session>,
    #[serde(default)]
    items: Vec<InventoryItem>,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<AccountId, Account>,
    // Lowercased username -> account id.
    usernames: HashMap<String, AccountId>,
    sessions: HashMap<String, Session>,
    items: HashMap<ItemId, InventoryItem>,
}

impl LedgerState {
    fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let mut state = LedgerState::default();
        for account in snapshot.accounts {
            state
                .usernames
                .insert(account.username.to_lowercase(), account.id.clone());
            state.accounts.insert(account.id.clone(), account);
        }
        for session in snapshot.sessions {
            state.sessions.insert(session.digest.clone(), session);
        }
        for item in snapshot.items {
            state.items.insert(item.item_id.clone(), item);
        }
        state
    }

    fn to_snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            accounts: self.accounts.values().cloned().collect(),
            sessions: self.sessions.values().cloned().collect(),
            items: self.items.values().cloned().collect(),
        }
    }

    fn account_mut(&mut self, account_id: &AccountId) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(account_id)
            .ok_or(LedgerError::AccountNotFound)
    }
}

/// Accounts, sessions and inventory behind one lock, so every balance check
/// and the write that depends on it happen together. Optionally mirrored to a
/// JSON snapshot after each mutation.
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
    snapshot_path: Option<String>,
}

impl MemoryLedger {
    pub fn new(snapshot_path: Option<String>) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            snapshot_path,
        }
    }

    /// Restores from `snapshot_path` when the file exists.
    pub async fn load(snapshot_path: Option<String>) -> anyhow::Result<Self> {
        let Some(path) = snapshot_path.as_deref() else {
            return Ok(Self::new(None));
        };
        if !Path::new(path).exists() {
            return Ok(Self::new(snapshot_path));
        }
        let content = fs::read_to_string(path).await?;
        let snapshot: LedgerSnapshot = serde_json::from_str(&content)
            .map_err(|err| anyhow!("invalid ledger snapshot {}: {}", path, err))?;
        info!(
            "restored ledger snapshot: {} accounts, {} items",
            snapshot.accounts.len(),
            snapshot.items.len()
        );
        Ok(Self {
            state: Mutex::new(LedgerState::from_snapshot(snapshot)),
            snapshot_path,
        })
    }

    async fn persist(&self, state: &LedgerState) {
        let Some(path) = self.snapshot_path.as_deref() else {
            return;
        };
        let content = match serde_json::to_vec(&state.to_snapshot()) {
            Ok(content) => content,
            Err(err) => {
                error!("failed to encode ledger snapshot: {}", err);
                return;
            }
        };
        if let Err(err) = write_replacing(path, &content).await {
            error!("failed to write ledger snapshot {}: {}", path, err);
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryLedger {
    async fn create_account(&self, account: NewAccount) -> Result<Account, LedgerError> {
        let mut state = self.state.lock().await;
        let key = account.username.to_lowercase();
        if state.usernames.contains_key(&key) {
            return Err(LedgerError::UsernameTaken(account.username));
        }
        let created = Account {
            id: AccountId::generate(),
            username: account.username,
            password_hash: account.password_hash,
            balance: account.balance,
            gold_balance: Money::ZERO,
            sandbox_mode: account.sandbox_mode,
            pfp_url: None,
            language: DEFAULT_LANGUAGE.to_string(),
            created_at: current_millis(),
        };
        state.usernames.insert(key, created.id.clone());
        state.accounts.insert(created.id.clone(), created.clone());
        self.persist(&state).await;
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state
            .usernames
            .get(&username.to_lowercase())
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn get_account(&self, account_id: &AccountId) -> Result<Account, LedgerError> {
        let state = self.state.lock().await;
        state
            .accounts
            .get(account_id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound)
    }

    async fn debit(
        &self,
        account_id: &AccountId,
        currency: Currency,
        amount: Money,
    ) -> Result<Account, LedgerError> {
        ensure_non_negative(amount)?;
        let mut state = self.state.lock().await;
        let account = state.account_mut(account_id)?;
        let available = account.balance_in(currency);
        let next = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                required: amount,
                available,
            })?;
        *account.balance_mut(currency) = next;
        let updated = account.clone();
        self.persist(&state).await;
        Ok(updated)
    }

    async fn credit(
        &self,
        account_id: &AccountId,
        currency: Currency,
        amount: Money,
    ) -> Result<Account, LedgerError> {
        ensure_non_negative(amount)?;
        let mut state = self.state.lock().await;
        let account = state.account_mut(account_id)?;
        let next = account
            .balance_in(currency)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Storage(anyhow!("balance overflow")))?;
        *account.balance_mut(currency) = next;
        let updated = account.clone();
        self.persist(&state).await;
        Ok(updated)
    }
}

#[async_trait]
impl SessionRepository for MemoryLedger {
    async fn create_session(&self, session: Session) -> Result<(), LedgerError> {
        let mut state = self.state.lock().await;
        if !state.accounts.contains_key(&session.account_id) {
            return Err(LedgerError::AccountNotFound);
        }
        state.sessions.insert(session.digest.clone(), session);
        self.persist(&state).await;
        Ok(())
    }

    async fn find_session(&self, digest: &str) -> Result<Option<Session>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state.sessions.get(digest).cloned())
    }

    async fn delete_session(&self, digest: &str) -> Result<(), LedgerError> {
        let mut state = self.state.lock().await;
        if state.sessions.remove(digest).is_some() {
            self.persist(&state).await;
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryRepository for MemoryLedger {
    async fn insert_item(&self, item: InventoryItem) -> Result<(), LedgerError> {
        let mut state = self.state.lock().await;
        if !state.accounts.contains_key(&item.owner_id) {
            return Err(LedgerError::AccountNotFound);
        }
        state.items.insert(item.item_id.clone(), item);
        self.persist(&state).await;
        Ok(())
    }

    async fn list_items(
        &self,
        owner_id: &AccountId,
        include_settled: bool,
    ) -> Result<Vec<InventoryItem>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state
            .items
            .values()
            .filter(|item| &item.owner_id == owner_id)
            .filter(|item| include_settled || !item.status.is_terminal())
            .cloned()
            .collect())
    }

    async fn settle_item(
        &self,
        owner_id: &AccountId,
        item_id: &ItemId,
        settlement: Settlement,
    ) -> Result<SettlementReceipt, LedgerError> {
        let mut state = self.state.lock().await;
        if !state.accounts.contains_key(owner_id) {
            return Err(LedgerError::AccountNotFound);
        }
        let mut item = state
            .items
            .get(item_id)
            .filter(|item| &item.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| LedgerError::ItemNotFound(item_id.clone()))?;
        let credited = match settlement {
            Settlement::Sell => item.sell()?,
            Settlement::Upgrade => {
                item.mark_upgraded()?;
                Money::ZERO
            }
        };
        ensure_non_negative(credited)?;

        // Both halves are computed before either is written.
        let account = state.account_mut(owner_id)?;
        let balance = account
            .balance
            .checked_add(credited)
            .ok_or_else(|| LedgerError::Storage(anyhow!("balance overflow")))?;
        account.balance = balance;
        let account = account.clone();
        state.items.insert(item.item_id.clone(), item.clone());
        self.persist(&state).await;

        Ok(SettlementReceipt {
            item,
            credited,
            account,
        })
    }
}

fn ensure_non_negative(amount: Money) -> Result<(), LedgerError> {
    if amount.is_negative() {
        return Err(LedgerError::NegativeAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use backend_domain::{CaseDrop, ItemStatus};

    fn new_account(username: &str, balance_cents: i64) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            balance: Money::from_cents(balance_cents),
            sandbox_mode: false,
        }
    }

    fn sample_drop(price_cents: i64) -> CaseDrop {
        CaseDrop {
            id: "redline".to_string(),
            global_inv_id: "g-redline".to_string(),
            weapon_name: "AK-47".to_string(),
            skin_name: "Redline".to_string(),
            skin_quality: "Field-Tested".to_string(),
            skin_rarity: "Classified".to_string(),
            stattrak: false,
            skin_price: Money::from_cents(price_cents),
            skin_img_source: None,
            odds_range: Some([0, 100_000]),
            weight: None,
        }
    }

    #[tokio::test]
    async fn usernames_are_unique_ignoring_case() {
        let ledger = MemoryLedger::new(None);
        ledger
            .create_account(new_account("Alice", 0))
            .await
            .expect("create");
        let err = ledger
            .create_account(new_account("alice", 0))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, LedgerError::UsernameTaken(_)));
        let found = ledger
            .find_by_username("ALICE")
            .await
            .expect("find")
            .expect("present");
        assert_eq!(found.username, "Alice");
        assert_eq!(found.language, "en");
    }

    #[tokio::test]
    async fn debit_refuses_overdraft_without_side_effects() {
        let ledger = MemoryLedger::new(None);
        let account = ledger
            .create_account(new_account("bob", 200))
            .await
            .expect("create");
        let err = ledger
            .debit(&account.id, Currency::Standard, Money::from_cents(250))
            .await
            .expect_err("overdraft");
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        let after = ledger.get_account(&account.id).await.expect("account");
        assert_eq!(after.balance, Money::from_cents(200));
    }

    #[tokio::test]
    async fn concurrent_debits_never_overspend() {
        let ledger = Arc::new(MemoryLedger::new(None));
        let account = ledger
            .create_account(new_account("carol", 1_000))
            .await
            .expect("create");

        let mut handles = Vec::new();
        for _ in 0..25 {
            let ledger = ledger.clone();
            let id = account.id.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .debit(&id, Currency::Standard, Money::from_cents(100))
                    .await
                    .is_ok()
            }));
        }
        let mut successes = 0;
        for handle in handles {
            if handle.await.expect("join") {
                successes += 1;
            }
        }
        assert_eq!(successes, 10);
        let after = ledger.get_account(&account.id).await.expect("account");
        assert_eq!(after.balance, Money::ZERO);
    }

    #[tokio::test]
    async fn sell_flags_and_credits_exactly_once() {
        let ledger = MemoryLedger::new(None);
        let account = ledger
            .create_account(new_account("dave", 0))
            .await
            .expect("create");
        let item = InventoryItem::new(account.id.clone(), &sample_drop(1_234), "chroma", "op-1", 0);
        let item_id = item.item_id.clone();
        ledger.insert_item(item).await.expect("insert");

        let receipt = ledger
            .settle_item(&account.id, &item_id, Settlement::Sell)
            .await
            .expect("sell");
        assert_eq!(receipt.credited, Money::from_cents(1_234));
        assert_eq!(receipt.account.balance, Money::from_cents(1_234));
        assert_eq!(receipt.item.status, ItemStatus::Sold);

        let err = ledger
            .settle_item(&account.id, &item_id, Settlement::Sell)
            .await
            .expect_err("second sell");
        assert!(matches!(err, LedgerError::ItemAlreadySettled(_)));
        let after = ledger.get_account(&account.id).await.expect("account");
        assert_eq!(after.balance, Money::from_cents(1_234));

        let kept = ledger.list_items(&account.id, false).await.expect("list");
        assert!(kept.is_empty());
        let all = ledger.list_items(&account.id, true).await.expect("list");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn negative_amounts_never_move_a_balance() {
        let ledger = MemoryLedger::new(None);
        let account = ledger
            .create_account(new_account("heidi", 0))
            .await
            .expect("create");
        let err = ledger
            .debit(&account.id, Currency::Standard, Money::from_cents(-500))
            .await
            .expect_err("negative debit");
        assert!(matches!(err, LedgerError::NegativeAmount(_)));
        let err = ledger
            .credit(&account.id, Currency::Gold, Money::from_cents(-500))
            .await
            .expect_err("negative credit");
        assert!(matches!(err, LedgerError::NegativeAmount(_)));

        let item = InventoryItem::new(account.id.clone(), &sample_drop(-9_000), "chroma", "op-1", 0);
        let item_id = item.item_id.clone();
        ledger.insert_item(item).await.expect("insert");
        let err = ledger
            .settle_item(&account.id, &item_id, Settlement::Sell)
            .await
            .expect_err("negative sale");
        assert!(matches!(err, LedgerError::NegativeAmount(_)));

        let after = ledger.get_account(&account.id).await.expect("account");
        assert_eq!(after.balance, Money::ZERO);
        assert_eq!(after.gold_balance, Money::ZERO);
        let kept = ledger.list_items(&account.id, false).await.expect("list");
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn failed_credit_leaves_item_unsold() {
        let ledger = MemoryLedger::new(None);
        let account = ledger
            .create_account(new_account("ivan", i64::MAX))
            .await
            .expect("create");
        let item = InventoryItem::new(account.id.clone(), &sample_drop(1), "chroma", "op-1", 0);
        let item_id = item.item_id.clone();
        ledger.insert_item(item).await.expect("insert");

        let err = ledger
            .settle_item(&account.id, &item_id, Settlement::Sell)
            .await
            .expect_err("overflow");
        assert!(matches!(err, LedgerError::Storage(_)));
        let kept = ledger.list_items(&account.id, false).await.expect("list");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].status, ItemStatus::Kept);
        let after = ledger.get_account(&account.id).await.expect("account");
        assert_eq!(after.balance, Money::from_cents(i64::MAX));
    }

    #[tokio::test]
    async fn items_of_other_owners_are_not_found() {
        let ledger = MemoryLedger::new(None);
        let owner = ledger
            .create_account(new_account("erin", 0))
            .await
            .expect("create");
        let other = ledger
            .create_account(new_account("frank", 0))
            .await
            .expect("create");
        let item = InventoryItem::new(owner.id.clone(), &sample_drop(10), "chroma", "op-1", 0);
        let item_id = item.item_id.clone();
        ledger.insert_item(item).await.expect("insert");

        let err = ledger
            .settle_item(&other.id, &item_id, Settlement::Upgrade)
            .await
            .expect_err("not owner");
        assert!(matches!(err, LedgerError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_disk() {
        let path = std::env::temp_dir()
            .join(format!("caseforge-ledger-{}.json", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .to_string();

        let ledger = MemoryLedger::load(Some(path.clone())).await.expect("load");
        let account = ledger
            .create_account(new_account("grace", 500))
            .await
            .expect("create");
        ledger
            .debit(&account.id, Currency::Standard, Money::from_cents(120))
            .await
            .expect("debit");
        ledger
            .create_session(Session {
                digest: "digest".to_string(),
                account_id: account.id.clone(),
                created_at: 0,
            })
            .await
            .expect("session");

        let restored = MemoryLedger::load(Some(path.clone())).await.expect("reload");
        let account = restored
            .find_by_username("grace")
            .await
            .expect("find")
            .expect("present");
        assert_eq!(account.balance, Money::from_cents(380));
        assert!(restored
            .find_session("digest")
            .await
            .expect("session")
            .is_some());
        let _ = fs::remove_file(&path).await;
    }
}
