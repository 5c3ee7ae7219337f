use super::{Error, EvmCompiler};
use crate::types::VerificationRequest;
use anyhow::Context;
use async_trait::async_trait;
use foundry_compilers::{
    artifacts,
    artifacts::{output_selection::OutputSelection, EvmVersion, Optimizer, Source, Sources},
    solc::{Solc, SolcLanguage},
};
use serde_json::Value;
use std::{collections::BTreeMap, path::PathBuf, str::FromStr};

#[derive(Debug, Default)]
pub struct SolcCompiler {}

#[async_trait]
impl EvmCompiler for SolcCompiler {
    async fn compile(
        &self,
        compiler_version: &semver::Version,
        input: &artifacts::SolcInput,
    ) -> Result<Value, Error> {
        // standard-json input appeared in 0.4.11, older binaries cannot run it
        if compiler_version < &semver::Version::new(0, 4, 11) {
            return Err(Error::CompilerNotFound(compiler_version.to_string()));
        }

        let version = compiler_version.clone();
        let solc = tokio::task::spawn_blocking(move || Solc::find_or_install(&version))
            .await
            .context("awaiting solc installation")?;
        let solc = match solc {
            Ok(solc) => solc,
            Err(err) => {
                tracing::debug!(
                    err = ?err,
                    version = %compiler_version,
                    "failed to fetch solc binary"
                );
                return Err(Error::CompilerNotFound(compiler_version.to_string()));
            }
        };

        let output = solc
            .async_compile_output(input)
            .await
            .context("compilation")?;
        let output_value =
            serde_json::from_slice(&output).context("deserializing compiler output into value")?;

        Ok(output_value)
    }
}

/// Parses frontend compiler versions of the form `v0.8.4+commit.c7e474f2`
/// into the plain semver the binary installer understands.
pub fn parse_compiler_version(version: &str) -> Result<semver::Version, Error> {
    let normalized = version.trim().trim_start_matches('v');
    let parsed = semver::Version::parse(normalized)
        .map_err(|_| Error::CompilerNotFound(version.to_string()))?;
    Ok(semver::Version::new(parsed.major, parsed.minor, parsed.patch))
}

/// Builds standard-json input for a submission. `source` is either plain
/// solidity text stored under `filename`, or a json bundle mapping file names
/// to their contents.
pub fn build_compiler_input(
    request: &VerificationRequest,
) -> Result<artifacts::SolcInput, Error> {
    let settings = artifacts::Settings {
        optimizer: Optimizer {
            enabled: Some(request.optimization),
            runs: Some(request.runs as usize),
            details: None,
        },
        evm_version: Some(parse_evm_target(&request.target)?),
        output_selection: OutputSelection::complete_output_selection(),
        ..Default::default()
    };

    let mut sources = Sources::default();
    for (file, content) in source_files(request) {
        sources.insert(PathBuf::from(file), Source::new(content));
    }

    Ok(artifacts::SolcInput {
        language: SolcLanguage::Solidity,
        sources,
        settings,
    })
}

fn source_files(request: &VerificationRequest) -> BTreeMap<String, String> {
    if let Ok(bundle) = serde_json::from_str::<BTreeMap<String, String>>(&request.source) {
        if !bundle.is_empty() {
            return bundle;
        }
    }
    BTreeMap::from([(request.filename.clone(), request.source.clone())])
}

fn parse_evm_target(target: &str) -> Result<EvmVersion, Error> {
    EvmVersion::from_str(target).map_err(|_| Error::UnknownEvmTarget(target.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(source: &str, filename: &str) -> VerificationRequest {
        VerificationRequest {
            address: "0x0000000000000000000000000000000000000001".to_string(),
            name: "Main".to_string(),
            filename: filename.to_string(),
            source: source.to_string(),
            runs: 200,
            optimization: true,
            compiler_version: "v0.8.14+commit.80d49f37".to_string(),
            arguments: "[]".to_string(),
            target: "london".to_string(),
        }
    }

    #[test]
    fn parses_frontend_version_literals() {
        let version = parse_compiler_version("v0.8.4+commit.c7e474f2").unwrap();
        assert_eq!(version, semver::Version::new(0, 8, 4));

        let version = parse_compiler_version("0.7.6").unwrap();
        assert_eq!(version, semver::Version::new(0, 7, 6));

        assert!(matches!(
            parse_compiler_version("latest"),
            Err(Error::CompilerNotFound(_))
        ));
    }

    #[test]
    fn single_file_submission_lands_under_filename() {
        let request = request("contract Main {}", "Main.sol");
        let input = build_compiler_input(&request).unwrap();

        assert_eq!(input.sources.len(), 1);
        let source = &input.sources[&PathBuf::from("Main.sol")];
        assert_eq!(source.content.as_str(), "contract Main {}");
        assert_eq!(input.settings.optimizer.enabled, Some(true));
        assert_eq!(input.settings.optimizer.runs, Some(200));
        assert_eq!(input.settings.evm_version, Some(EvmVersion::London));
    }

    #[test]
    fn json_bundle_submission_is_split_into_files() {
        let bundle = r#"{"Main.sol": "contract Main {}", "Lib.sol": "library Lib {}"}"#;
        let request = request(bundle, "Main.sol");
        let input = build_compiler_input(&request).unwrap();

        assert_eq!(input.sources.len(), 2);
        assert!(input.sources.contains_key(&PathBuf::from("Lib.sol")));
    }

    #[test]
    fn unknown_evm_target_is_rejected() {
        let mut request = request("contract Main {}", "Main.sol");
        request.target = "carbonvm".to_string();
        assert!(matches!(
            build_compiler_input(&request),
            Err(Error::UnknownEvmTarget(_))
        ));
    }
}
