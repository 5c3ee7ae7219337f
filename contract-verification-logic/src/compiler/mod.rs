mod solc_compiler;

pub use solc_compiler::{build_compiler_input, parse_compiler_version, SolcCompiler};

use anyhow::Context;
use async_trait::async_trait;
use blockscout_display_bytes::decode_hex;
use foundry_compilers::artifacts;
use serde::Deserialize;
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::Semaphore;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Compiler version not found: {0}")]
    CompilerNotFound(String),
    #[error("Unknown evm target: {0}")]
    UnknownEvmTarget(String),
    #[error("Compilation error: {0:#?}")]
    Compilation(Vec<String>),
    #[error("{0:#?}")]
    Internal(#[from] anyhow::Error),
}

/// Compiler invocations are treated as a black box producing raw standard-json
/// output. The single production implementation shells out to solc binaries,
/// while tests substitute canned outputs.
#[async_trait]
pub trait EvmCompiler: Send + Sync {
    async fn compile(
        &self,
        compiler_version: &semver::Version,
        input: &artifacts::SolcInput,
    ) -> Result<Value, Error>;
}

pub struct Compilers {
    compiler: Arc<dyn EvmCompiler>,
    threads_semaphore: Arc<Semaphore>,
}

impl Compilers {
    pub fn new(compiler: Arc<dyn EvmCompiler>, max_threads: usize) -> Self {
        Self {
            compiler,
            threads_semaphore: Arc::new(Semaphore::new(max_threads)),
        }
    }

    #[instrument(name = "compile", skip(self, input), level = "debug")]
    pub async fn compile(
        &self,
        compiler_version: &semver::Version,
        input: &artifacts::SolcInput,
    ) -> Result<CompilerOutput, Error> {
        let raw = {
            let _permit = self
                .threads_semaphore
                .acquire()
                .await
                .context("acquiring compilation permit")?;
            self.compiler.compile(compiler_version, input).await?
        };

        validate_no_errors(&raw)?;
        let output: CompilerOutput =
            serde_path_to_error::deserialize(&raw).context("deserializing compiler output")?;

        Ok(output)
    }
}

/// Standard-json compiler output reduced to the fields the verifier consumes.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompilerOutput {
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, Contract>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Contract {
    pub abi: Option<Value>,
    pub evm: Option<ContractEvm>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ContractEvm {
    pub bytecode: Option<ContractBytecode>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ContractBytecode {
    pub object: Option<String>,
}

/// Compilation results for a submission: per-file abis, the merged abi and
/// the creation code of the requested contract.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledContract {
    pub abi: BTreeMap<String, Value>,
    pub full_abi: Value,
    pub bytecode: Vec<u8>,
}

pub fn extract_compiled_contract(
    output: &CompilerOutput,
    contract_name: &str,
) -> Result<CompiledContract, Error> {
    let mut file_abis = BTreeMap::new();
    let mut full_abi = Vec::new();
    let mut bytecode = None;

    for (file, contracts) in &output.contracts {
        let mut file_abi = Vec::new();
        for (name, contract) in contracts {
            if let Some(Value::Array(entries)) = &contract.abi {
                file_abi.extend(entries.iter().cloned());
                full_abi.extend(entries.iter().cloned());
            }
            if name == contract_name && bytecode.is_none() {
                bytecode = Some(extract_creation_code(contract)?);
            }
        }
        file_abis.insert(file.clone(), Value::Array(file_abi));
    }

    let bytecode = bytecode.ok_or_else(|| {
        Error::Compilation(vec![format!(
            "contract {contract_name} is missing from the compilation output"
        )])
    })?;

    Ok(CompiledContract {
        abi: file_abis,
        full_abi: Value::Array(full_abi),
        bytecode,
    })
}

fn extract_creation_code(contract: &Contract) -> Result<Vec<u8>, Error> {
    let object = contract
        .evm
        .as_ref()
        .and_then(|evm| evm.bytecode.as_ref())
        .and_then(|bytecode| bytecode.object.as_deref())
        .unwrap_or_default();

    if object.is_empty() {
        return Err(Error::Compilation(vec![
            "contract has no creation code; abstract contracts and interfaces cannot be verified"
                .to_string(),
        ]));
    }
    // Placeholders left by the compiler for library addresses.
    if object.contains('_') {
        return Err(Error::Compilation(vec![
            "creation code contains unlinked library references".to_string(),
        ]));
    }

    Ok(decode_hex(object).context("cannot decode creation code as bytes")?)
}

#[derive(Debug, Clone, Deserialize)]
struct CompilerOutputErrors {
    #[serde(default = "Vec::new")]
    errors: Vec<artifacts::solc::Error>,
}

fn validate_no_errors(raw_output: &Value) -> Result<(), Error> {
    let output_errors: CompilerOutputErrors = serde_path_to_error::deserialize(raw_output)
        .context("deserializing compiler output errors")?;

    let mut errors = Vec::new();
    for error in output_errors.errors {
        if error.is_error() {
            errors.push(error.formatted_message.unwrap_or(error.message));
        }
    }
    if !errors.is_empty() {
        return Err(Error::Compilation(errors));
    }

    Ok(())
}
