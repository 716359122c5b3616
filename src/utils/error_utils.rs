//! Revert and halt decoding
//!
//! Turns a failed `ExecutionResult` into a readable message. Revert payloads
//! are decoded as `Error(string)`, `Panic(uint256)` or a raw UTF-8 string;
//! anything else (typically a custom error) is shown as hex.

use alloy::{primitives::hex, sol_types::decode_revert_reason};
use revm::context_interface::result::ExecutionResult;

/// Human-readable reason for a revert payload
///
/// Empty output is the bare `revert()`.
pub fn revert_reason(output: &[u8]) -> String {
    if output.is_empty() {
        return "execution reverted".to_string();
    }
    decode_revert_reason(output)
        .unwrap_or_else(|| format!("custom error 0x{}", hex::encode(output)))
}

/// Describe why an execution did not succeed
///
/// Successful results are described as such, so callers can log the outcome
/// of any execution uniformly.
pub fn describe_failure(result: &ExecutionResult) -> String {
    match result {
        ExecutionResult::Success { .. } => "success".to_string(),
        ExecutionResult::Revert { output, gas_used } => {
            format!("{} (gas used: {})", revert_reason(output), gas_used)
        }
        ExecutionResult::Halt { reason, gas_used } => {
            format!("halted: {:?} (gas used: {})", reason, gas_used)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        primitives::{hex::decode, Bytes, U256},
        sol_types::{Panic, Revert, SolError},
    };
    use revm::context_interface::result::{HaltReason, OutOfGasError};

    #[test]
    fn test_error_string() {
        let payload = Revert::from("LibDiamond: Must be contract owner").abi_encode();
        let reason = revert_reason(&payload);
        assert!(reason.contains("LibDiamond: Must be contract owner"), "{reason}");
    }

    #[test]
    fn test_manual_error_string_encoding() {
        // "Insufficient balance" encoded as Error(string)
        let error_bytes = decode(
            "08c379a0\
             0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000014\
             496e73756666696369656e742062616c616e6365000000000000000000000000",
        )
        .unwrap();
        assert!(revert_reason(&error_bytes).contains("Insufficient balance"));
    }

    #[test]
    fn test_panic() {
        let payload = Panic { code: U256::from(0x11) }.abi_encode();
        let reason = revert_reason(&payload);
        assert!(reason.to_lowercase().contains("overflow"), "{reason}");
    }

    #[test]
    fn test_empty_and_custom_errors() {
        assert_eq!(revert_reason(&[]), "execution reverted");
        // Not valid UTF-8 and no known selector
        assert_eq!(revert_reason(&[0xff, 0xff, 0xff, 0xff]), "custom error 0xffffffff");
    }

    #[test]
    fn test_describe_failure() {
        let reverted = ExecutionResult::Revert {
            gas_used: 21_000,
            output: Bytes::from(Revert::from("no").abi_encode()),
        };
        let message = describe_failure(&reverted);
        assert!(message.contains("no"));
        assert!(message.contains("21000"));

        let halted: ExecutionResult = ExecutionResult::Halt {
            reason: HaltReason::OutOfGas(OutOfGasError::Basic),
            gas_used: 5_000_000,
        };
        assert!(describe_failure(&halted).starts_with("halted: OutOfGas"));
    }
}
