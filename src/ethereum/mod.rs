pub mod abi;
pub mod contract;
pub mod provider;
pub mod utils;

use serde::{Deserialize, Serialize};

/// Aggregate token metadata as returned by the contract's
/// `getTokenDetails()` read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDetails {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: u128,
    pub is_paused: bool,
}
