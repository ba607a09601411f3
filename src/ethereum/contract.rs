use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt, Word},
    json_abi::JsonAbi,
    primitives::{Address, Bytes},
    providers::Provider,
    rpc::types::TransactionRequest,
};
use anyhow::{anyhow, Result};
use std::str::FromStr;

use super::TokenDetails;
use crate::ethereum::{provider::HttpProvider, utils};

/// Read-only interface to the deployed NodeERC20 contract.
///
/// Binds the JSON-RPC provider, the contract address, and the loaded ABI.
/// One method per supported read; every remote failure propagates as `Err`
/// to the caller. No retry, no partial results.
#[derive(Debug, Clone)]
pub struct NodeErc20Interface {
    provider: HttpProvider,
    address: Address,
    abi: JsonAbi,
}

impl NodeErc20Interface {
    pub fn new(provider: HttpProvider, address: &str, abi: JsonAbi) -> Result<Self> {
        let address = Address::from_str(address)
            .map_err(|e| anyhow!("Invalid contract address '{}': {}", address, e))?;

        Ok(Self {
            provider,
            address,
            abi,
        })
    }

    /// Single aggregate read of name, symbol, decimals, total supply and
    /// pause state via `getTokenDetails()`.
    pub async fn token_details(&self) -> Result<TokenDetails> {
        let values = self.call_function("getTokenDetails", &[]).await?;
        decode_token_details(values)
    }

    pub async fn balance_of(&self, holder: &str) -> Result<u128> {
        let holder = parse_account(holder)?;
        let values = self
            .call_function("balanceOf", &[DynSolValue::Address(holder)])
            .await?;
        as_uint(single(&values, "balanceOf")?)
    }

    pub async fn paused(&self) -> Result<bool> {
        let values = self.call_function("paused", &[]).await?;
        as_bool(single(&values, "paused")?)
    }

    pub async fn is_pauser(&self, account: &str) -> Result<bool> {
        let role = self.role_id("PAUSER_ROLE").await?;
        self.has_role(role, account).await
    }

    pub async fn is_minter(&self, account: &str) -> Result<bool> {
        let role = self.role_id("MINTER_ROLE").await?;
        self.has_role(role, account).await
    }

    pub async fn is_admin(&self, account: &str) -> Result<bool> {
        let role = self.role_id("DEFAULT_ADMIN_ROLE").await?;
        self.has_role(role, account).await
    }

    /// Fetches a role identifier from its on-chain getter. Role checks are
    /// two sequential remote calls: this one, then `hasRole`.
    async fn role_id(&self, getter: &str) -> Result<Word> {
        let values = self.call_function(getter, &[]).await?;
        as_word(single(&values, getter)?)
    }

    async fn has_role(&self, role: Word, account: &str) -> Result<bool> {
        let account = parse_account(account)?;
        let values = self
            .call_function(
                "hasRole",
                &[
                    DynSolValue::FixedBytes(role, 32),
                    DynSolValue::Address(account),
                ],
            )
            .await?;
        as_bool(single(&values, "hasRole")?)
    }

    /// Encodes and issues a single `eth_call` against the contract,
    /// returning the decoded outputs.
    async fn call_function(&self, name: &str, args: &[DynSolValue]) -> Result<Vec<DynSolValue>> {
        let function = self
            .abi
            .functions()
            .find(|f| f.name == name)
            .ok_or_else(|| anyhow!("Function '{}' not found in contract ABI", name))?;

        let calldata: Bytes = function
            .abi_encode_input(args)
            .map_err(|e| anyhow!("Failed to encode call to '{}': {}", name, e))?
            .into();

        let request = TransactionRequest::default()
            .to(self.address)
            .input(calldata.into());

        let raw = self
            .provider
            .call(&request)
            .await
            .map_err(|e| anyhow!("{}", utils::interpret_rpc_error(&e.to_string())))?;

        function
            .abi_decode_output(&raw, false)
            .map_err(|e| anyhow!("Failed to decode '{}' result: {}", name, e))
    }
}

fn parse_account(account: &str) -> Result<Address> {
    Address::from_str(account.trim())
        .map_err(|e| anyhow!("Invalid account address '{}': {}", account, e))
}

/// Decodes the `getTokenDetails()` outputs. Depending on how the ABI
/// declares the returns, the decoder yields either five flat values or one
/// five-element tuple.
fn decode_token_details(mut values: Vec<DynSolValue>) -> Result<TokenDetails> {
    if values.len() == 1 {
        if let DynSolValue::Tuple(inner) = &values[0] {
            values = inner.clone();
        }
    }

    if values.len() != 5 {
        return Err(anyhow!(
            "Unexpected getTokenDetails result: expected 5 values, got {}",
            values.len()
        ));
    }

    Ok(TokenDetails {
        name: as_string(&values[0])?,
        symbol: as_string(&values[1])?,
        decimals: u8::try_from(as_uint(&values[2])?)
            .map_err(|_| anyhow!("Decimals value does not fit into 8 bits"))?,
        total_supply: as_uint(&values[3])?,
        is_paused: as_bool(&values[4])?,
    })
}

fn single<'a>(values: &'a [DynSolValue], function: &str) -> Result<&'a DynSolValue> {
    match values {
        [value] => Ok(value),
        other => Err(anyhow!(
            "Unexpected '{}' result: expected a single value, got {}",
            function,
            other.len()
        )),
    }
}

fn as_uint(value: &DynSolValue) -> Result<u128> {
    match value {
        DynSolValue::Uint(num, _) => u128::try_from(*num)
            .map_err(|_| anyhow!("Uint value {} does not fit into 128 bits", num)),
        other => Err(anyhow!("Expected a uint return value, got {:?}", other)),
    }
}

fn as_bool(value: &DynSolValue) -> Result<bool> {
    match value {
        DynSolValue::Bool(b) => Ok(*b),
        other => Err(anyhow!("Expected a bool return value, got {:?}", other)),
    }
}

fn as_string(value: &DynSolValue) -> Result<String> {
    match value {
        DynSolValue::String(s) => Ok(s.clone()),
        other => Err(anyhow!("Expected a string return value, got {:?}", other)),
    }
}

fn as_word(value: &DynSolValue) -> Result<Word> {
    match value {
        DynSolValue::FixedBytes(word, 32) => Ok(*word),
        other => Err(anyhow!("Expected a bytes32 return value, got {:?}", other)),
    }
}
