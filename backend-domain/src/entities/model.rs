use serde::{Deserialize, Serialize};

use crate::entities::{AccountView, Case, InventoryItemView};
use crate::value_objects::Money;

#[derive(Debug, Deserialize, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub sandbox_mode: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct AuthResponse {
    pub session_token: String,
    pub account: AccountView,
}

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    #[serde(default)]
    pub include_settled: bool,
}

#[derive(Debug, Serialize, Clone)]
pub struct ItemSettlementResponse {
    pub item: InventoryItemView,
    pub credited: Money,
    pub account: AccountView,
}

#[derive(Debug, Deserialize)]
pub struct OpeningQuery {
    pub date: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CaseCatalogPayload {
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub catalog_path: String,
    pub ledger_snapshot_path: Option<String>,
    pub draw_space: u64,
    pub reel_length: usize,
    pub reel_winning_position: usize,
    pub starting_balance_cents: i64,
    pub sandbox_balance_cents: i64,
    pub receipt_secret: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
