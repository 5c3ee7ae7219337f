use crate::error::ParseError;
use alloy::primitives::U256;
use entity::{token_holders, verified_contracts};
use sea_orm::prelude::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Raw verification submission as it arrives from the frontend.
///
/// `optimization` is sent as a string literal and is parsed into a proper
/// boolean on conversion into [`VerificationRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerificationIncomingRequest {
    pub address: String,
    pub name: String,
    pub filename: String,
    pub source: String,
    pub runs: u32,
    pub optimization: String,
    pub compiler_version: String,
    pub arguments: String,
    pub target: String,
}

/// Normalized verification submission: address lowercased, optimization parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    pub address: String,
    pub name: String,
    pub filename: String,
    pub source: String,
    pub runs: u32,
    pub optimization: bool,
    pub compiler_version: String,
    pub arguments: String,
    pub target: String,
}

impl TryFrom<VerificationIncomingRequest> for VerificationRequest {
    type Error = ParseError;

    fn try_from(request: VerificationIncomingRequest) -> Result<Self, Self::Error> {
        let optimization = parse_optimization(&request.optimization)?;
        Ok(Self {
            address: request.address.to_lowercase(),
            name: request.name,
            filename: request.filename,
            source: request.source,
            runs: request.runs,
            optimization,
            compiler_version: request.compiler_version,
            arguments: request.arguments,
            target: request.target,
        })
    }
}

fn parse_optimization(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ParseError::Bool(other.to_string())),
    }
}

/// `Erc721` is part of the storage format but nothing classifies into it yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum ContractType {
    #[strum(serialize = "ERC20")]
    Erc20,
    #[strum(serialize = "ERC721")]
    Erc721,
    #[strum(serialize = "other")]
    Other,
}

/// On-chain ERC-20 state captured at verification time. Every field is
/// optional as tokens are free to revert on any of the optional getters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20TokenData {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub total_supply: Option<String>,
}

/// Canonical verification record for a contract address.
#[derive(Clone, Debug, PartialEq)]
pub struct VerifiedContract {
    pub address: String,
    pub name: String,
    pub filename: String,
    pub source: String,
    pub optimization: bool,
    pub compiler_version: String,
    pub compiled_abi: serde_json::Value,
    pub args: String,
    pub runs: u32,
    pub target: String,
    pub contract_type: ContractType,
    pub token_data: Option<Erc20TokenData>,
}

impl TryFrom<VerifiedContract> for verified_contracts::Model {
    type Error = ParseError;

    fn try_from(v: VerifiedContract) -> Result<Self, Self::Error> {
        let token_data = v.token_data.map(serde_json::to_value).transpose()?;
        Ok(Self {
            address: v.address,
            name: v.name,
            filename: v.filename,
            source: v.source,
            optimization: v.optimization,
            compiler_version: v.compiler_version,
            compiled_abi: v.compiled_abi,
            args: v.args,
            runs: v.runs as i32,
            target: v.target,
            contract_type: v.contract_type.to_string(),
            token_data,
            verified_at: Default::default(),
        })
    }
}

impl TryFrom<verified_contracts::Model> for VerifiedContract {
    type Error = ParseError;

    fn try_from(v: verified_contracts::Model) -> Result<Self, Self::Error> {
        let contract_type = ContractType::from_str(&v.contract_type)
            .map_err(|_| ParseError::Custom(format!("invalid contract type: {}", v.contract_type)))?;
        let token_data = v.token_data.map(serde_json::from_value).transpose()?;
        Ok(Self {
            address: v.address,
            name: v.name,
            filename: v.filename,
            source: v.source,
            optimization: v.optimization,
            compiler_version: v.compiler_version,
            compiled_abi: v.compiled_abi,
            args: v.args,
            runs: v.runs as u32,
            target: v.target,
            contract_type,
            token_data,
        })
    }
}

/// Account row that has an associated EVM address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmAccount {
    pub account_id: String,
    pub evm_address: String,
}

/// Balance of a single account in a verified token, fetched during backfill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenHolderBalance {
    pub token_address: String,
    pub account_id: String,
    pub evm_address: String,
    pub balance: U256,
    pub decimals: i32,
}

impl TryFrom<TokenHolderBalance> for token_holders::Model {
    type Error = ParseError;

    fn try_from(v: TokenHolderBalance) -> Result<Self, Self::Error> {
        let balance = BigDecimal::from_str(&v.balance.to_string())
            .map_err(|err| ParseError::Custom(format!("invalid balance: {err}")))?;
        Ok(Self {
            token_address: v.token_address,
            account_id: v.account_id,
            evm_address: v.evm_address,
            balance,
            decimals: v.decimals,
            updated_at: Default::default(),
        })
    }
}

/// Outcome of a verification attempt that got past the contract-existence
/// check. Both variants leave a row in the request audit log.
#[derive(Clone, Debug, PartialEq)]
pub enum VerificationOutcome {
    Verified(Box<VerifiedContract>),
    Rejected { message: String },
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified(_))
    }
}
