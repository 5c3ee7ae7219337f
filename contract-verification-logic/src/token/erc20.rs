use crate::types::Erc20TokenData;
use alloy::{network::Ethereum, primitives::Address, providers::DynProvider, sol};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    ERC20,
    "src/token/abi/erc20.json"
);

/// Reads standard ERC-20 metadata from the deployed contract. Tokens are
/// free to revert on any of these getters, so each field degrades to `None`
/// independently instead of failing the fetch.
pub async fn fetch_token_data(
    provider: &DynProvider<Ethereum>,
    address: Address,
) -> Erc20TokenData {
    let contract = ERC20::new(address, provider.clone());
    let name_call = contract.name();
    let symbol_call = contract.symbol();
    let decimals_call = contract.decimals();
    let total_supply_call = contract.totalSupply();

    let (name, symbol, decimals, total_supply) = tokio::join!(
        name_call.call(),
        symbol_call.call(),
        decimals_call.call(),
        total_supply_call.call(),
    );

    Erc20TokenData {
        name: ok_or_log(name, "name"),
        symbol: ok_or_log(symbol, "symbol"),
        decimals: ok_or_log(decimals, "decimals"),
        total_supply: ok_or_log(total_supply, "totalSupply").map(|supply| supply.to_string()),
    }
}

fn ok_or_log<T>(result: Result<T, alloy::contract::Error>, field: &str) -> Option<T> {
    result
        .inspect_err(|err| tracing::debug!(err = ?err, field, "token metadata call failed"))
        .ok()
}
