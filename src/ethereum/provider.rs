use alloy::{
    providers::{Provider, ProviderBuilder, RootProvider},
    transports::http::{Client, Http},
};
use anyhow::{anyhow, Result};

/// JSON-RPC provider over plain HTTP, as built by `connect`.
pub type HttpProvider = RootProvider<Http<Client>>;

/// Builds a provider for the configured node URL.
///
/// No explicit timeout is configured; the transport defaults apply.
pub fn connect(rpc_url: &str) -> Result<HttpProvider> {
    let url = rpc_url
        .parse()
        .map_err(|e| anyhow!("Invalid RPC URL '{}': {}", rpc_url, e))?;

    Ok(ProviderBuilder::new().on_http(url))
}

/// Probes the node with an `eth_blockNumber` request.
///
/// Used once at startup for a diagnostic warning; never gates request
/// handling.
pub async fn check_connection(provider: &HttpProvider) -> bool {
    match provider.get_block_number().await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!("Node connection check failed: {}", e);
            false
        }
    }
}
