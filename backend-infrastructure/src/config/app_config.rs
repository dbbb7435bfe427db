use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig, DEFAULT_DRAW_SPACE};

pub const CONFIG_ENV_VAR: &str = "CASEFORGE_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
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
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "caseforge".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            catalog_path: "./cases.yaml".to_string(),
            ledger_snapshot_path: None,
            draw_space: DEFAULT_DRAW_SPACE,
            reel_length: 50,
            reel_winning_position: 35,
            starting_balance_cents: 5_000,
            sandbox_balance_cents: 99_999_999_900,
            receipt_secret: None,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    pub fn normalize(&mut self) {
        self.api_token = normalize_optional(self.api_token.take());
        self.clickhouse_user = normalize_optional(self.clickhouse_user.take());
        self.clickhouse_password = normalize_optional(self.clickhouse_password.take());
        self.ledger_snapshot_path = normalize_optional(self.ledger_snapshot_path.take());
        self.receipt_secret = normalize_optional(self.receipt_secret.take());
        self.log_dir = normalize_optional(self.log_dir.take());
        self.catalog_path = self.catalog_path.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.catalog_path = resolve_path(base, &self.catalog_path);
        self.ledger_snapshot_path = self
            .ledger_snapshot_path
            .as_deref()
            .map(|path| resolve_path(base, path));
        self.log_dir = self.log_dir.as_deref().map(|path| resolve_path(base, path));
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.catalog_path.is_empty() {
            return Err(anyhow!("catalog_path must not be empty"));
        }
        if self.draw_space == 0 {
            return Err(anyhow!("draw_space must be greater than 0"));
        }
        if self.reel_length == 0 {
            return Err(anyhow!("reel_length must be greater than 0"));
        }
        if self.reel_winning_position >= self.reel_length {
            return Err(anyhow!(
                "reel_winning_position {} must be below reel_length {}",
                self.reel_winning_position,
                self.reel_length
            ));
        }
        if self.starting_balance_cents < 0 || self.sandbox_balance_cents < 0 {
            return Err(anyhow!("starting balances must not be negative"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            catalog_path: self.catalog_path.clone(),
            ledger_snapshot_path: self.ledger_snapshot_path.clone(),
            draw_space: self.draw_space,
            reel_length: self.reel_length,
            reel_winning_position: self.reel_winning_position,
            starting_balance_cents: self.starting_balance_cents,
            sandbox_balance_cents: self.sandbox_balance_cents,
            receipt_secret: self.receipt_secret.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("CASEFORGE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("CASEFORGE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("CASEFORGE_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("CASEFORGE_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("CASEFORGE_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("CASEFORGE_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("CASEFORGE_CATALOG_PATH") {
            self.catalog_path = value;
        }
        if let Ok(value) = env::var("CASEFORGE_LEDGER_SNAPSHOT_PATH") {
            self.ledger_snapshot_path = Some(value);
        }
        if let Ok(value) = env::var("CASEFORGE_DRAW_SPACE") {
            self.draw_space = value.parse().unwrap_or(self.draw_space);
        }
        if let Ok(value) = env::var("CASEFORGE_REEL_LENGTH") {
            self.reel_length = value.parse().unwrap_or(self.reel_length);
        }
        if let Ok(value) = env::var("CASEFORGE_REEL_WINNING_POSITION") {
            self.reel_winning_position = value.parse().unwrap_or(self.reel_winning_position);
        }
        if let Ok(value) = env::var("CASEFORGE_STARTING_BALANCE_CENTS") {
            self.starting_balance_cents = value.parse().unwrap_or(self.starting_balance_cents);
        }
        if let Ok(value) = env::var("CASEFORGE_SANDBOX_BALANCE_CENTS") {
            self.sandbox_balance_cents = value.parse().unwrap_or(self.sandbox_balance_cents);
        }
        if let Ok(value) = env::var("CASEFORGE_RECEIPT_SECRET") {
            self.receipt_secret = Some(value);
        }
        if let Ok(value) = env::var("CASEFORGE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("CASEFORGE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("CASEFORGE_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
}
