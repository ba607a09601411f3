mod config;
mod ethereum;
mod server;

use anyhow::Result;
use clap::{Arg, Command};
use config::Config;
use ethereum::{abi, contract::NodeErc20Interface, provider};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let matches = Command::new(config::APP_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read-only HTTP API for the NodeERC20 token on Sepolia")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file"),
        )
        .arg(
            Arg::new("rpc-url")
                .short('r')
                .long("rpc-url")
                .value_name("URL")
                .help("Sepolia RPC endpoint URL"),
        )
        .arg(
            Arg::new("listen")
                .short('l')
                .long("listen")
                .value_name("ADDR")
                .help("HTTP listen address (host:port)"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .help("Generate a sample configuration file and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config-path")
                .long("config-path")
                .help("Print the default configuration file path and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Handle special commands first
    if matches.get_flag("generate-config") {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        return Ok(());
    }

    if matches.get_flag("config-path") {
        match Config::default_config_path() {
            Ok(path) => {
                println!("{}", path.display());
                return Ok(());
            }
            Err(e) => {
                error!("Could not determine default config path: {}", e);
                return Err(e);
            }
        }
    }

    // Load configuration
    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let mut config = Config::load_or_default(config_path).await;

    // Override with command line arguments
    if let Some(rpc_url) = matches.get_one::<String>("rpc-url") {
        config.network.rpc_url = rpc_url.clone();
    }

    if let Some(listen) = matches.get_one::<String>("listen") {
        config.server.listen_addr = listen.clone();
    }

    info!("Starting NodeERC20 read API");
    info!("Node URL: {}", config.network.rpc_url);
    info!("Contract address: {}", config.contract.address);

    // Build the process-wide chain client and contract interface. A missing
    // or malformed ABI file fails here, before the server binds.
    let provider = provider::connect(&config.network.rpc_url)?;

    if !provider::check_connection(&provider).await {
        warn!(
            "Node at {} is not reachable; contract reads will fail until it is",
            config.network.rpc_url
        );
    }

    let contract_abi = abi::load_abi(&config.contract.abi_path).await?;
    let contract = NodeErc20Interface::new(provider, &config.contract.address, contract_abi)?;

    if let Err(e) = server::run(config, contract).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
