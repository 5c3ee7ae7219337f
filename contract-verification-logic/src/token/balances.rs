use super::erc20::ERC20;
use crate::types::{EvmAccount, TokenHolderBalance};
use alloy::{network::Ethereum, primitives::Address, providers::DynProvider};
use futures::{stream, StreamExt};
use std::str::FromStr;

/// Fetches the token balance of every known EVM account, with at most
/// `concurrency` requests in flight. Each account resolves on its own; a
/// failed call is logged and that account skipped, so one bad account cannot
/// drop the whole snapshot.
pub async fn backfill_token_holders(
    provider: &DynProvider<Ethereum>,
    token_address: &str,
    decimals: i32,
    accounts: &[EvmAccount],
    concurrency: usize,
) -> Vec<TokenHolderBalance> {
    let token = match Address::from_str(token_address) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(err = ?err, token_address, "invalid token address, skipping backfill");
            return Vec::new();
        }
    };
    let contract = ERC20::new(token, provider.clone());

    let jobs = accounts.iter().map(|account| {
        let contract = contract.clone();
        async move {
            let balance = async {
                let holder = Address::from_str(&account.evm_address)?;
                Ok::<_, anyhow::Error>(contract.balanceOf(holder).call().await?)
            }
            .await;

            balance
                .map(|balance| TokenHolderBalance {
                    token_address: token_address.to_string(),
                    account_id: account.account_id.clone(),
                    evm_address: account.evm_address.clone(),
                    balance,
                    decimals,
                })
                .inspect_err(|err| {
                    tracing::warn!(
                        err = ?err,
                        account_id = %account.account_id,
                        "failed to fetch token balance, skipping account"
                    )
                })
                .ok()
        }
    });

    stream::iter(jobs)
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .flatten()
        .collect()
}
