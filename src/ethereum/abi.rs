use alloy::json_abi::JsonAbi;
use anyhow::{anyhow, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Loads a contract ABI from a local JSON file.
///
/// Fails fast with a "not found" error when the path does not resolve and
/// with a parse error when the content is not a valid ABI document.
pub async fn load_abi<P: AsRef<Path>>(path: P) -> Result<JsonAbi> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(anyhow!("ABI file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| anyhow!("Failed to read ABI file {}: {}", path.display(), e))?;

    let abi: JsonAbi = serde_json::from_str(&content)
        .map_err(|e| anyhow!("Failed to parse ABI file {}: {}", path.display(), e))?;

    debug!(
        "Loaded ABI from {} ({} functions)",
        path.display(),
        abi.functions().count()
    );

    Ok(abi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MINIMAL_ABI: &str = r#"[
        {
            "type": "function",
            "name": "balanceOf",
            "stateMutability": "view",
            "inputs": [{"name": "account", "type": "address"}],
            "outputs": [{"name": "", "type": "uint256"}]
        }
    ]"#;

    #[tokio::test]
    async fn test_load_valid_abi() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, MINIMAL_ABI).unwrap();

        let abi = load_abi(&path).await.unwrap();
        assert!(abi.functions().any(|f| f.name == "balanceOf"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.json");

        let err = load_abi(&path).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_malformed_content_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_abi(&path).await.unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
