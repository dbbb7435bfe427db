use anyhow::Result;
use async_trait::async_trait;
use clickhouse::Client;

use backend_domain::{DbConfig, OpeningAuditRepository, OpeningRecordRow};

const OPENING_COLUMNS: &str = "opened_at, opening_id, account_id, case_id, price_cents, currency, \
     draw_space, roll, drop_id, item_id, partition_mode, partition_fingerprint, \
     integrity_fallback, receipt_signature";

#[derive(Clone)]
pub struct ClickhouseRepo {
    client: Client,
    database: String,
}

impl ClickhouseRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn from_config(config: &DbConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database);
        if let Some(user) = &config.clickhouse_user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.clickhouse_password {
            client = client.with_password(password);
        }
        Self::new(client, config.clickhouse_database.clone())
    }
}

#[async_trait]
impl OpeningAuditRepository for ClickhouseRepo {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_openings = r#"
CREATE TABLE IF NOT EXISTS opening_records (
    opened_at DateTime64(3),
    opening_id String,
    account_id String,
    case_id String,
    price_cents Int64,
    currency LowCardinality(String),
    draw_space UInt64,
    roll UInt64,
    drop_id String,
    item_id String,
    partition_mode LowCardinality(String),
    partition_fingerprint String,
    integrity_fallback Bool,
    receipt_signature String
) ENGINE = MergeTree
PARTITION BY toYYYYMM(opened_at)
ORDER BY (account_id, opened_at, opening_id)
"#;

        self.client.query(create_openings).execute().await?;
        Ok(())
    }

    async fn insert_opening(&self, record: &OpeningRecordRow) -> Result<()> {
        let mut insert = self.client.insert("opening_records")?;
        insert.write(record).await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_openings(
        &self,
        account_id: &str,
        date: &str,
        limit: usize,
    ) -> Result<Vec<OpeningRecordRow>> {
        let query = format!(
            "SELECT {} FROM opening_records \
             WHERE account_id = ? AND toDate(opened_at) = toDate(?) \
             ORDER BY opened_at DESC LIMIT {}",
            OPENING_COLUMNS, limit
        );
        let rows = self
            .client
            .query(&query)
            .bind(account_id)
            .bind(date)
            .fetch_all::<OpeningRecordRow>()
            .await?;
        Ok(rows)
    }

    async fn fetch_opening(&self, opening_id: &str) -> Result<Option<OpeningRecordRow>> {
        let query = format!(
            "SELECT {} FROM opening_records WHERE opening_id = ? LIMIT 1",
            OPENING_COLUMNS
        );
        let rows = self
            .client
            .query(&query)
            .bind(opening_id)
            .fetch_all::<OpeningRecordRow>()
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}
