use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use backend_domain::ports::{HealthCheckService, OpeningAuditRepository};
use backend_domain::Case;

pub struct DefaultHealthService {
    opening_audit: Arc<dyn OpeningAuditRepository>,
    catalog: Arc<RwLock<HashMap<String, Case>>>,
}

impl DefaultHealthService {
    pub fn new(
        opening_audit: Arc<dyn OpeningAuditRepository>,
        catalog: Arc<RwLock<HashMap<String, Case>>>,
    ) -> Self {
        Self {
            opening_audit,
            catalog,
        }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_database(&self) -> anyhow::Result<bool> {
        self.opening_audit.ping().await.map(|_| true)
    }

    /// Ready once at least one case is loaded.
    async fn check_catalog(&self) -> anyhow::Result<bool> {
        Ok(!self.catalog.read().await.is_empty())
    }
}
