use async_trait::async_trait;

/// Implementations may be CPU-heavy and are expected to keep that work off the
/// async worker threads.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> anyhow::Result<String>;
    async fn verify_password(&self, password: &str, hash: &str) -> bool;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_database(&self) -> anyhow::Result<bool>;
    async fn check_catalog(&self) -> anyhow::Result<bool>;
}
