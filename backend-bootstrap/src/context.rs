use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::info;

use backend_application::commands::catalog_commands::index_catalog;
use backend_application::{AppState, Metrics};
use backend_domain::ports::{CatalogRepository, OpeningAuditRepository};
use backend_infrastructure::{
    AppConfig, Argon2CredentialHasher, CatalogFileRepository, ClickhouseRepo,
    DefaultHealthService, MemoryLedger,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let audit = Arc::new(ClickhouseRepo::from_config(&db_config));
        audit.ensure_schema().await?;

        let ledger = Arc::new(MemoryLedger::load(runtime_config.ledger_snapshot_path.clone()).await?);

        let catalog_repo = Arc::new(CatalogFileRepository::new());
        let cases = catalog_repo.load_catalog(&runtime_config.catalog_path).await?;
        let catalog = index_catalog(cases, runtime_config.draw_space);
        info!(
            "loaded {} case(s) from {}",
            catalog.len(),
            runtime_config.catalog_path
        );
        let catalog = Arc::new(RwLock::new(catalog));

        let state = AppState {
            config: runtime_config,
            accounts: ledger.clone(),
            sessions: ledger.clone(),
            inventory: ledger,
            catalog_repo,
            opening_audit: audit.clone(),
            credentials: Arc::new(Argon2CredentialHasher::new()),
            health: Arc::new(DefaultHealthService::new(audit, catalog.clone())),
            catalog,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
