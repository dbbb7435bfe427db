use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::utils::write_replacing;
use backend_domain::{Case, CatalogRepository};

/// Case catalog stored as a YAML list of cases.
pub struct CatalogFileRepository;

impl CatalogFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CatalogFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for CatalogFileRepository {
    async fn load_catalog(&self, path: &str) -> anyhow::Result<Vec<Case>> {
        if !Path::new(path).exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).await?;
        let cases: Vec<Case> = serde_yaml::from_str(&content)?;
        Ok(cases.iter().map(Case::normalized).collect())
    }

    async fn save_catalog(&self, path: &str, cases: &[Case]) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(cases)?;
        write_replacing(path, content.as_bytes()).await
    }
}
