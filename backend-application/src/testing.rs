// In-memory port fakes for application tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{AppState, Metrics, RequestContext};
use backend_domain::ports::{
    AccountRepository, CatalogRepository, CredentialHasher, HealthCheckService,
    InventoryRepository, OpeningAuditRepository, SessionRepository, Settlement,
    SettlementReceipt,
};
use backend_domain::{
    session_digest, Account, AccountId, Case, CaseDrop, Currency, InventoryItem, ItemId,
    LedgerError, Money, NewAccount, OpeningRecordRow, RuntimeConfig, Session,
};

#[derive(Default)]
struct LedgerInner {
    accounts: HashMap<AccountId, Account>,
    sessions: HashMap<String, Session>,
    items: Vec<InventoryItem>,
}

#[derive(Default)]
pub struct FakeLedger {
    inner: Mutex<LedgerInner>,
    pub fail_item_inserts: AtomicBool,
}

impl FakeLedger {
    pub fn balance(&self, account_id: &AccountId, currency: Currency) -> Money {
        let inner = self.inner.lock().expect("ledger lock");
        inner
            .accounts
            .get(account_id)
            .map(|account| account.balance_in(currency))
            .unwrap_or(Money::ZERO)
    }

    pub fn item_count(&self) -> usize {
        self.inner.lock().expect("ledger lock").items.len()
    }

    pub fn set_gold_balance(&self, account_id: &AccountId, amount: Money) {
        let mut inner = self.inner.lock().expect("ledger lock");
        if let Some(account) = inner.accounts.get_mut(account_id) {
            account.gold_balance = amount;
        }
    }
}

#[async_trait]
impl AccountRepository for FakeLedger {
    async fn create_account(&self, account: NewAccount) -> Result<Account, LedgerError> {
        let mut inner = self.inner.lock().expect("ledger lock");
        let taken = inner
            .accounts
            .values()
            .any(|existing| existing.username.eq_ignore_ascii_case(&account.username));
        if taken {
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
            language: "en".to_string(),
            created_at: 0,
        };
        inner.accounts.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, LedgerError> {
        let inner = self.inner.lock().expect("ledger lock");
        Ok(inner
            .accounts
            .values()
            .find(|account| account.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn get_account(&self, account_id: &AccountId) -> Result<Account, LedgerError> {
        let inner = self.inner.lock().expect("ledger lock");
        inner
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
        let mut inner = self.inner.lock().expect("ledger lock");
        let account = inner
            .accounts
            .get_mut(account_id)
            .ok_or(LedgerError::AccountNotFound)?;
        let available = account.balance_in(currency);
        let next = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                required: amount,
                available,
            })?;
        *account.balance_mut(currency) = next;
        Ok(account.clone())
    }

    async fn credit(
        &self,
        account_id: &AccountId,
        currency: Currency,
        amount: Money,
    ) -> Result<Account, LedgerError> {
        let mut inner = self.inner.lock().expect("ledger lock");
        let account = inner
            .accounts
            .get_mut(account_id)
            .ok_or(LedgerError::AccountNotFound)?;
        let next = account
            .balance_in(currency)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Storage(anyhow!("balance overflow")))?;
        *account.balance_mut(currency) = next;
        Ok(account.clone())
    }
}

#[async_trait]
impl SessionRepository for FakeLedger {
    async fn create_session(&self, session: Session) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().expect("ledger lock");
        inner.sessions.insert(session.digest.clone(), session);
        Ok(())
    }

    async fn find_session(&self, digest: &str) -> Result<Option<Session>, LedgerError> {
        let inner = self.inner.lock().expect("ledger lock");
        Ok(inner.sessions.get(digest).cloned())
    }

    async fn delete_session(&self, digest: &str) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().expect("ledger lock");
        inner.sessions.remove(digest);
        Ok(())
    }
}

#[async_trait]
impl InventoryRepository for FakeLedger {
    async fn insert_item(&self, item: InventoryItem) -> Result<(), LedgerError> {
        if self.fail_item_inserts.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage(anyhow!("inventory store offline")));
        }
        let mut inner = self.inner.lock().expect("ledger lock");
        inner.items.push(item);
        Ok(())
    }

    async fn list_items(
        &self,
        owner_id: &AccountId,
        include_settled: bool,
    ) -> Result<Vec<InventoryItem>, LedgerError> {
        let inner = self.inner.lock().expect("ledger lock");
        Ok(inner
            .items
            .iter()
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
        let mut inner = self.inner.lock().expect("ledger lock");
        let idx = inner
            .items
            .iter()
            .position(|item| &item.item_id == item_id && &item.owner_id == owner_id)
            .ok_or_else(|| LedgerError::ItemNotFound(item_id.clone()))?;
        let mut item = inner.items[idx].clone();
        let credited = match settlement {
            Settlement::Sell => item.sell()?,
            Settlement::Upgrade => {
                item.mark_upgraded()?;
                Money::ZERO
            }
        };
        if credited.is_negative() {
            return Err(LedgerError::NegativeAmount(credited));
        }
        let account = inner
            .accounts
            .get_mut(owner_id)
            .ok_or(LedgerError::AccountNotFound)?;
        account.balance = account
            .balance
            .checked_add(credited)
            .ok_or_else(|| LedgerError::Storage(anyhow!("balance overflow")))?;
        let account = account.clone();
        inner.items[idx] = item.clone();
        Ok(SettlementReceipt {
            item,
            credited,
            account,
        })
    }
}

#[derive(Default)]
pub struct FakeCatalogRepo {
    pub saved: Mutex<Vec<Case>>,
}

#[async_trait]
impl CatalogRepository for FakeCatalogRepo {
    async fn load_catalog(&self, _path: &str) -> anyhow::Result<Vec<Case>> {
        Ok(self.saved.lock().expect("catalog lock").clone())
    }

    async fn save_catalog(&self, _path: &str, cases: &[Case]) -> anyhow::Result<()> {
        *self.saved.lock().expect("catalog lock") = cases.to_vec();
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAudit {
    pub rows: Mutex<Vec<OpeningRecordRow>>,
    pub fail_inserts: AtomicBool,
}

impl FakeAudit {
    pub fn rows(&self) -> Vec<OpeningRecordRow> {
        self.rows.lock().expect("audit lock").clone()
    }

    pub fn replace(&self, row: OpeningRecordRow) {
        let mut rows = self.rows.lock().expect("audit lock");
        rows.retain(|existing| existing.opening_id != row.opening_id);
        rows.push(row);
    }
}

#[async_trait]
impl OpeningAuditRepository for FakeAudit {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert_opening(&self, record: &OpeningRecordRow) -> anyhow::Result<()> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(anyhow!("clickhouse unavailable"));
        }
        self.rows.lock().expect("audit lock").push(record.clone());
        Ok(())
    }

    async fn fetch_openings(
        &self,
        account_id: &str,
        _date: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<OpeningRecordRow>> {
        Ok(self
            .rows()
            .into_iter()
            .filter(|row| row.account_id == account_id)
            .take(limit)
            .collect())
    }

    async fn fetch_opening(&self, opening_id: &str) -> anyhow::Result<Option<OpeningRecordRow>> {
        Ok(self
            .rows()
            .into_iter()
            .find(|row| row.opening_id == opening_id))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct PlainHasher;

#[async_trait]
impl CredentialHasher for PlainHasher {
    async fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        Ok(format!("plain${password}"))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash == format!("plain${password}")
    }
}

pub struct AlwaysHealthy;

#[async_trait]
impl HealthCheckService for AlwaysHealthy {
    async fn check_database(&self) -> anyhow::Result<bool> {
        Ok(true)
    }

    async fn check_catalog(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}

pub fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: Some("admin-token".to_string()),
        catalog_path: "cases.yaml".to_string(),
        ledger_snapshot_path: None,
        draw_space: 100_000,
        reel_length: 50,
        reel_winning_position: 35,
        starting_balance_cents: 5_000,
        sandbox_balance_cents: 99_999_999_900,
        receipt_secret: Some("receipt-secret".to_string()),
        max_body_bytes: 1024 * 1024,
        request_timeout_seconds: 10,
    }
}

pub fn ranged_drop(id: &str, lo: u64, hi: u64, price_cents: i64) -> CaseDrop {
    CaseDrop {
        id: id.to_string(),
        global_inv_id: format!("g-{id}"),
        weapon_name: "AK-47".to_string(),
        skin_name: id.to_uppercase(),
        skin_quality: "Field-Tested".to_string(),
        skin_rarity: "Classified".to_string(),
        stattrak: false,
        skin_price: Money::from_cents(price_cents),
        skin_img_source: None,
        odds_range: Some([lo, hi]),
        weight: None,
    }
}

pub fn sample_case(url_name: &str, price_cents: i64, drops: Vec<CaseDrop>) -> Case {
    Case {
        url_name: url_name.to_string(),
        website_name: url_name.to_uppercase(),
        price: Money::from_cents(price_cents),
        expired: false,
        category: None,
        golden_case: false,
        img_name: None,
        position_in_grid: None,
        drops,
    }
}

/// Two-drop case: `a` covers `[0, 30000)`, `b` covers `[30000, 100000)`.
pub fn chroma_case() -> Case {
    sample_case(
        "chroma",
        250,
        vec![
            ranged_drop("a", 0, 30_000, 1_000),
            ranged_drop("b", 30_000, 100_000, 50),
        ],
    )
}

pub struct TestHarness {
    pub state: AppState,
    pub ledger: Arc<FakeLedger>,
    pub audit: Arc<FakeAudit>,
    pub catalog_repo: Arc<FakeCatalogRepo>,
}

impl TestHarness {
    pub fn new(cases: Vec<Case>) -> Self {
        let ledger = Arc::new(FakeLedger::default());
        let audit = Arc::new(FakeAudit::default());
        let catalog_repo = Arc::new(FakeCatalogRepo::default());
        let catalog = cases
            .into_iter()
            .map(|case| (case.url_name.clone(), case))
            .collect::<HashMap<_, _>>();
        let state = AppState {
            config: test_config(),
            accounts: ledger.clone(),
            sessions: ledger.clone(),
            inventory: ledger.clone(),
            catalog_repo: catalog_repo.clone(),
            opening_audit: audit.clone(),
            credentials: Arc::new(PlainHasher),
            health: Arc::new(AlwaysHealthy),
            catalog: Arc::new(RwLock::new(catalog)),
            metrics: Arc::new(Metrics::default()),
        };
        Self {
            state,
            ledger,
            audit,
            catalog_repo,
        }
    }

    /// Creates an account holding `balance_cents` and a live session for it.
    pub async fn account_with_balance(&self, username: &str, balance_cents: i64) -> RequestContext {
        let account = self
            .ledger
            .create_account(NewAccount {
                username: username.to_string(),
                password_hash: "plain$secret".to_string(),
                balance: Money::from_cents(balance_cents),
                sandbox_mode: false,
            })
            .await
            .expect("create account");
        let token = format!("token-{username}");
        let digest = session_digest(&token);
        self.ledger
            .create_session(Session {
                digest: digest.clone(),
                account_id: account.id.clone(),
                created_at: 0,
            })
            .await
            .expect("create session");
        RequestContext {
            account_id: account.id,
            session_digest: digest,
        }
    }
}
