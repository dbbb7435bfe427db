use std::collections::HashMap;
use std::sync::Arc;

use backend_domain::ports::{
    AccountRepository, CatalogRepository, CredentialHasher, HealthCheckService,
    InventoryRepository, OpeningAuditRepository, SessionRepository,
};
use backend_domain::{AccountId, Case, RuntimeConfig};
use tokio::sync::RwLock;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub accounts: Arc<dyn AccountRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub inventory: Arc<dyn InventoryRepository>,
    pub catalog_repo: Arc<dyn CatalogRepository>,
    pub opening_audit: Arc<dyn OpeningAuditRepository>,
    pub credentials: Arc<dyn CredentialHasher>,
    pub health: Arc<dyn HealthCheckService>,
    /// Cases keyed by `url_name`.
    pub catalog: Arc<RwLock<HashMap<String, Case>>>,
    pub metrics: Arc<Metrics>,
}

/// Caller identity resolved from a session token; passed explicitly into
/// every per-user command and query.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub account_id: AccountId,
    pub session_digest: String,
}
