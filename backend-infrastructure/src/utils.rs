use std::path::Path;

use anyhow::Result;
use tokio::fs;

pub async fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Writes through a sibling temp file so readers never see a partial file.
pub async fn write_replacing(path: &str, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path).await?;
    let tmp = format!("{}.tmp", path);
    fs::write(&tmp, content).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
