//! Token contract call encoding.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// Minimal ERC-20 surface used by the bridge.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// Build an unsigned `transfer(to, amount)` call on `token`.
pub fn transfer_request(token: Address, to: Address, amount: U256) -> TransactionRequest {
    let input = IERC20::transferCall { to, amount }.abi_encode();
    TransactionRequest::default()
        .with_to(token)
        .with_input(input)
}
