mod bytecode;
mod constructor_args;
mod errors;

pub use bytecode::{match_bytecodes, BytecodeMatch};
pub use constructor_args::verify_constructor_args;
pub use errors::{ConstructorArgsError, VerificationFailure};

use crate::{
    client::Client,
    compiler,
    error::{ParseError, ServiceError},
    repository, token,
    types::{
        ContractType, TokenHolderBalance, VerificationOutcome, VerificationRequest,
        VerifiedContract,
    },
};
use alloy::primitives::Address;
use anyhow::Context;
use blockscout_display_bytes::decode_hex;
use std::str::FromStr;
use tracing::instrument;

/// Message recorded in the audit log for successful attempts.
pub const SUCCESS_MESSAGE: &str = "no error";

/// Runs a single verification attempt end to end.
///
/// An address without a known deployed contract fails fast and leaves no
/// trace. Every attempt that gets past that check appends exactly one row to
/// the request audit log, and successful attempts additionally upsert the
/// canonical verified contract plus, for ERC-20 tokens, a holder balance
/// snapshot. The audit row is written before the canonical rows so that a
/// write failure cannot lose the attempt itself.
#[instrument(skip_all, fields(address = %request.address), level = "info")]
pub async fn verify_contract(
    client: &Client,
    request: VerificationRequest,
) -> Result<VerificationOutcome, ServiceError> {
    let request = VerificationRequest {
        address: request.address.to_lowercase(),
        ..request
    };

    let deployed_bytecode =
        repository::contracts::find_deployed_bytecode(client.db.as_ref(), &request.address)
            .await?
            .ok_or_else(|| ServiceError::ContractNotFound(request.address.clone()))?;
    let deployed_code = decode_hex(&deployed_bytecode)
        .context("decoding deployed bytecode")
        .map_err(ServiceError::Internal)?;

    let evaluated = evaluate_submission(client, &request, &deployed_code).await?;

    let (success, message) = match &evaluated {
        Ok(_) => (true, SUCCESS_MESSAGE.to_string()),
        Err(failure) => (false, failure.to_string()),
    };
    repository::verification_requests::insert(client.db.as_ref(), &request, success, &message)
        .await
        .inspect_err(|err| tracing::error!(err = ?err, "failed to record verification request"))?;

    match evaluated {
        Ok(evaluated) => {
            repository::verified_contracts::upsert(client.db.as_ref(), evaluated.contract.clone())
                .await
                .inspect_err(
                    |err| tracing::error!(err = ?err, "failed to upsert verified contract"),
                )?;
            repository::token_holders::upsert_many(client.db.as_ref(), evaluated.holder_balances)
                .await
                .inspect_err(
                    |err| tracing::error!(err = ?err, "failed to store holder balances"),
                )?;
            tracing::info!(contract_type = %evaluated.contract.contract_type, "contract verified");
            Ok(VerificationOutcome::Verified(Box::new(evaluated.contract)))
        }
        Err(_) => {
            tracing::info!(message = %message, "verification rejected");
            Ok(VerificationOutcome::Rejected { message })
        }
    }
}

/// Successful evaluation waiting to be persisted.
struct Evaluated {
    contract: VerifiedContract,
    holder_balances: Vec<TokenHolderBalance>,
}

/// Recompiles the submission and checks it against the deployed code. The
/// outer error is an infrastructure fault; the inner one is an expected
/// rejection destined for the audit log.
async fn evaluate_submission(
    client: &Client,
    request: &VerificationRequest,
    deployed_code: &[u8],
) -> Result<Result<Evaluated, VerificationFailure>, ServiceError> {
    let compiled = match compile_submission(client, request).await {
        Ok(compiled) => compiled,
        Err(compiler::Error::Internal(err)) => return Err(ServiceError::Internal(err)),
        Err(err) => return Ok(Err(VerificationFailure::Compiler(err))),
    };

    let matched = match match_bytecodes(deployed_code, &compiled.bytecode) {
        Some(matched) => matched,
        None => return Ok(Err(VerificationFailure::BytecodeMismatch)),
    };

    let abi: ethabi::Contract = serde_json::from_value(compiled.full_abi.clone())
        .context("parsing compiled abi")
        .map_err(ServiceError::Internal)?;

    if let Err(err) = verify_constructor_args(
        abi.constructor.as_ref(),
        &matched.constructor_args,
        &request.arguments,
    ) {
        return Ok(Err(err.into()));
    }

    let contract_type = token::classify_contract(&abi);
    let (token_data, holder_balances) = match contract_type {
        ContractType::Erc20 => {
            let token_address = Address::from_str(&request.address)
                .map_err(|err| ParseError::Custom(format!("invalid contract address: {err}")))?;
            let token_data = token::erc20::fetch_token_data(&client.provider, token_address).await;
            let accounts =
                repository::accounts::list_with_evm_address(client.db.as_ref()).await?;
            let decimals = token_data.decimals.map(i32::from).unwrap_or_default();
            let holder_balances = token::balances::backfill_token_holders(
                &client.provider,
                &request.address,
                decimals,
                &accounts,
                client.settings.balance_request_concurrency,
            )
            .await;
            (Some(token_data), holder_balances)
        }
        _ => (None, Vec::new()),
    };

    let compiled_abi = serde_json::to_value(&compiled.abi)
        .context("serializing per-file abis")
        .map_err(ServiceError::Internal)?;
    let contract = VerifiedContract {
        address: request.address.clone(),
        name: request.name.clone(),
        filename: request.filename.clone(),
        source: request.source.clone(),
        optimization: request.optimization,
        compiler_version: request.compiler_version.clone(),
        compiled_abi,
        args: request.arguments.clone(),
        runs: request.runs,
        target: request.target.clone(),
        contract_type,
        token_data,
    };

    Ok(Ok(Evaluated {
        contract,
        holder_balances,
    }))
}

async fn compile_submission(
    client: &Client,
    request: &VerificationRequest,
) -> Result<compiler::CompiledContract, compiler::Error> {
    let compiler_version = compiler::parse_compiler_version(&request.compiler_version)?;
    let input = compiler::build_compiler_input(request)?;
    let output = client.compilers.compile(&compiler_version, &input).await?;
    compiler::extract_compiled_contract(&output, &request.name)
}
