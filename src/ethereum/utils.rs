use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Validates and normalizes an Ethereum address.
///
/// Available as a standalone check; the HTTP routes forward the raw path
/// parameter to the contract facade, so a malformed address surfaces from
/// the facade's own parse instead.
#[allow(dead_code)]
pub fn validate_address(address: &str) -> Result<Address> {
    let trimmed = address.trim();

    if trimmed.is_empty() {
        return Err(anyhow!("Address cannot be empty"));
    }

    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(anyhow!(
            "Invalid address '{}': missing the 0x prefix",
            trimmed
        ));
    }

    // Length and hex-digit checks are the parser's job; it accepts any
    // casing, so the check stays checksum-agnostic.
    Address::from_str(trimmed).map_err(|e| anyhow!("Invalid address '{}': {}", trimmed, e))
}

/// Rewrites common JSON-RPC failure signatures into user-facing text.
pub fn interpret_rpc_error(error: &str) -> String {
    if error.contains("execution reverted") {
        "Call failed: the contract reverted execution. Check the call parameters.".to_string()
    } else if error.contains("connection refused") || error.contains("network unreachable") {
        "Network error: cannot connect to the RPC endpoint. Check the node URL and network connectivity.".to_string()
    } else if error.contains("timeout") {
        "Network error: request timed out. The RPC endpoint may be overloaded or unreachable."
            .to_string()
    } else if error.contains("rate limit") {
        "Rate limit error: too many requests to the RPC endpoint. Try again in a few moments."
            .to_string()
    } else if error.contains("method not found") {
        "RPC error: the requested method is not supported by this RPC endpoint.".to_string()
    } else {
        format!("RPC error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address() {
        assert!(validate_address("0xEB123DC8fF3C9bcdc998D4C2d560FB73Aad997C2").is_ok());
        assert!(validate_address("0x0000000000000000000000000000000000000000").is_ok());

        assert!(validate_address("").is_err());
        assert!(validate_address("not_an_address").is_err());
        assert!(validate_address("0x123").is_err()); // Too short
        assert!(validate_address("EB123DC8fF3C9bcdc998D4C2d560FB73Aad997C2").is_err()); // Missing 0x
        assert!(validate_address("0xgg123DC8fF3C9bcdc998D4C2d560FB73Aad997C2").is_err());
        // Invalid hex
    }

    #[test]
    fn test_invalid_input_is_echoed_in_error() {
        let err = validate_address("0x123").unwrap_err();
        assert!(err.to_string().contains("0x123"));
    }

    #[test]
    fn test_interpret_rpc_error() {
        assert!(interpret_rpc_error("tcp connect error: connection refused")
            .contains("cannot connect"));
        assert!(interpret_rpc_error("request timeout elapsed").contains("timed out"));
        assert!(interpret_rpc_error("server returned: execution reverted").contains("reverted"));
        assert!(interpret_rpc_error("something else entirely").starts_with("RPC error:"));
    }
}
