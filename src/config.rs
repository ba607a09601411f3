use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Crate name, reused for the CLI and the platform config directory.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub contract: ContractConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    pub address: String,
    pub abi_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
                chain_id: 11155111,
            },
            contract: ContractConfig {
                address: "0xEB123DC8fF3C9bcdc998D4C2d560FB73Aad997C2".to_string(),
                abi_path: "./abis/NodeERC20.json".to_string(),
            },
            server: ServerConfig {
                listen_addr: "0.0.0.0:8000".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("Could not read configuration at {}", path.display()))?;

        let config: Config = toml::from_str(&raw).with_context(|| {
            format!(
                "Configuration at {} is not a valid API config",
                path.display()
            )
        })?;

        Ok(config)
    }

    /// Load configuration with fallback to the compiled-in Sepolia defaults
    pub async fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Self {
        let mut config = match path {
            Some(path) => match Self::load_from_file(path).await {
                Ok(config) => {
                    tracing::info!("Loaded configuration from file");
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load config file, using defaults: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        config.apply_env_vars();
        config
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_vars(&mut self) {
        if let Ok(rpc_url) = std::env::var("SEPOLIA_RPC_URL") {
            tracing::info!("Using SEPOLIA_RPC_URL environment variable for the node URL");
            self.network.rpc_url = rpc_url;
        }
    }

    /// Default config file path: `<platform config dir>/<app name>/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow!("No platform configuration directory available"))?;
        path.push(APP_NAME);
        path.push("config.toml");
        Ok(path)
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let sample_config = r#"# NodeERC20 read API configuration file

# Sepolia testnet node and chain id
[network]
rpc_url = "https://ethereum-sepolia-rpc.publicnode.com"
chain_id = 11155111

# Deployed NodeERC20 contract and its local ABI description
[contract]
address = "0xEB123DC8fF3C9bcdc998D4C2d560FB73Aad997C2"
abi_path = "./abis/NodeERC20.json"

# HTTP listen address
[server]
listen_addr = "0.0.0.0:8000"

# Environment variables that can be used:
# SEPOLIA_RPC_URL - overrides network.rpc_url
"#;
        sample_config.to_string()
    }
}
