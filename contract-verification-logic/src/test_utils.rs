use crate::compiler::{self, EvmCompiler};
use alloy::{
    network::Ethereum,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::client::RpcClient,
    transports::{TransportError, TransportErrorKind, TransportFut},
};
use alloy_json_rpc::{Id, RequestPacket, Response, ResponsePacket, ResponsePayload};
use blockscout_service_launcher::test_database::TestDbGuard;
use entity::{accounts, contracts};
use parking_lot::Mutex;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait, NotSet};
use serde_json::{json, value::to_raw_value, Value};
use std::{
    collections::HashMap,
    future,
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;

pub const NAME_CALLDATA: &str = "0x06fdde03";
pub const SYMBOL_CALLDATA: &str = "0x95d89b41";
pub const DECIMALS_CALLDATA: &str = "0x313ce567";
pub const TOTAL_SUPPLY_CALLDATA: &str = "0x18160ddd";

pub async fn init_db(name: &str) -> TestDbGuard {
    TestDbGuard::new::<migration::Migrator>(name).await
}

pub async fn insert_contract(db: &DatabaseConnection, address: &str, deployed_bytecode: &str) {
    contracts::Entity::insert(contracts::ActiveModel {
        address: Set(address.to_string()),
        deployed_bytecode: Set(deployed_bytecode.to_string()),
        created_at: NotSet,
    })
    .exec(db)
    .await
    .expect("inserting contract");
}

pub async fn insert_account(db: &DatabaseConnection, account_id: &str, evm_address: Option<&str>) {
    accounts::Entity::insert(accounts::ActiveModel {
        account_id: Set(account_id.to_string()),
        evm_address: Set(evm_address.map(str::to_string)),
        created_at: NotSet,
    })
    .exec(db)
    .await
    .expect("inserting account");
}

/// Compiler stub returning a canned standard-json output.
pub struct MockCompiler {
    output: Value,
}

impl MockCompiler {
    pub fn new(output: Value) -> Self {
        Self { output }
    }
}

#[async_trait::async_trait]
impl EvmCompiler for MockCompiler {
    async fn compile(
        &self,
        _compiler_version: &semver::Version,
        _input: &foundry_compilers::artifacts::SolcInput,
    ) -> Result<Value, compiler::Error> {
        Ok(self.output.clone())
    }
}

enum MockResponse {
    Success(Value),
    Error(String),
}

/// `eth_call` transport stub keyed by request calldata, so concurrent calls
/// resolve deterministically regardless of completion order.
#[derive(Clone, Default)]
pub struct MockRpcService {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
}

impl MockRpcService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_to(&self, calldata: &str, result: Value) {
        self.responses
            .lock()
            .insert(calldata.to_lowercase(), MockResponse::Success(result));
    }

    pub fn fail_on(&self, calldata: &str, message: &str) {
        self.responses
            .lock()
            .insert(calldata.to_lowercase(), MockResponse::Error(message.to_string()));
    }

    fn lookup(&self, req: &RequestPacket) -> Result<Value, String> {
        let single = match req {
            RequestPacket::Single(single) => single,
            RequestPacket::Batch(_) => return Err("batch requests are not supported".to_string()),
        };
        let request: Value = serde_json::from_str(single.serialized().get())
            .map_err(|err| format!("invalid request: {err}"))?;
        if request["method"] != "eth_call" {
            return Err(format!("unsupported method: {}", request["method"]));
        }
        let calldata = request["params"][0]["input"]
            .as_str()
            .or_else(|| request["params"][0]["data"].as_str())
            .unwrap_or_default()
            .to_lowercase();
        match self.responses.lock().get(&calldata) {
            Some(MockResponse::Success(value)) => Ok(value.clone()),
            Some(MockResponse::Error(message)) => Err(message.clone()),
            None => Err(format!("no mock response for calldata {calldata}")),
        }
    }
}

impl Service<RequestPacket> for MockRpcService {
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let id = req
            .as_single()
            .map(|serialized| serialized.meta().id.clone())
            .unwrap_or_else(|| Id::Number(1_u64.into()));

        let result = match self.lookup(&req) {
            Ok(value) => {
                let payload = to_raw_value(&value).expect("serializing mock response");
                Ok(ResponsePacket::Single(Response {
                    id,
                    payload: ResponsePayload::Success(payload),
                }))
            }
            Err(message) => Err(TransportErrorKind::custom_str(&message)),
        };

        Box::pin(future::ready(result))
    }
}

pub fn mock_provider(service: MockRpcService) -> DynProvider<Ethereum> {
    let client = RpcClient::builder().transport(service, false);
    ProviderBuilder::new().connect_client(client).erased()
}

/// Hex-encodes abi tokens the way `eth_call` returns them.
pub fn abi_encoded(tokens: &[ethabi::Token]) -> Value {
    Value::String(format!("0x{}", hex::encode(ethabi::encode(tokens))))
}

pub fn balance_of_calldata(holder: &str) -> String {
    format!(
        "0x70a08231{:0>64}",
        holder.trim_start_matches("0x").to_lowercase()
    )
}

/// Complete ERC-20 interface as solc emits it, shared by the classifier and
/// the end-to-end tests.
pub fn erc20_abi() -> Value {
    json!([
        {"type": "function", "name": "totalSupply", "inputs": [], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
        {"type": "function", "name": "balanceOf", "inputs": [{"name": "account", "type": "address"}], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
        {"type": "function", "name": "transfer", "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "nonpayable"},
        {"type": "function", "name": "transferFrom", "inputs": [{"name": "from", "type": "address"}, {"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "nonpayable"},
        {"type": "function", "name": "approve", "inputs": [{"name": "spender", "type": "address"}, {"name": "amount", "type": "uint256"}], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "nonpayable"},
        {"type": "function", "name": "allowance", "inputs": [{"name": "owner", "type": "address"}, {"name": "spender", "type": "address"}], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
        {"type": "function", "name": "name", "inputs": [], "outputs": [{"name": "", "type": "string"}], "stateMutability": "view"},
        {"type": "function", "name": "symbol", "inputs": [], "outputs": [{"name": "", "type": "string"}], "stateMutability": "view"},
        {"type": "function", "name": "decimals", "inputs": [], "outputs": [{"name": "", "type": "uint8"}], "stateMutability": "view"},
        {"type": "event", "name": "Transfer", "inputs": [{"name": "from", "type": "address", "indexed": true}, {"name": "to", "type": "address", "indexed": true}, {"name": "value", "type": "uint256", "indexed": false}], "anonymous": false},
        {"type": "event", "name": "Approval", "inputs": [{"name": "owner", "type": "address", "indexed": true}, {"name": "spender", "type": "address", "indexed": true}, {"name": "value", "type": "uint256", "indexed": false}], "anonymous": false}
    ])
}
