use crate::{
    compiler::{Compilers, EvmCompiler, SolcCompiler},
    error::ServiceError,
    repository,
    settings::VerificationSettings,
    types::{
        VerificationIncomingRequest, VerificationOutcome, VerificationRequest, VerifiedContract,
    },
    verifier,
};
use alloy::{network::Ethereum, providers::DynProvider};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared handles of the verification pipeline. Constructed once at service
/// startup and passed explicitly to every operation; cloning is cheap.
#[derive(Clone)]
pub struct Client {
    pub db: Arc<DatabaseConnection>,
    pub compilers: Arc<Compilers>,
    pub provider: DynProvider<Ethereum>,
    pub settings: VerificationSettings,
}

impl Client {
    pub fn new(
        db: Arc<DatabaseConnection>,
        provider: DynProvider<Ethereum>,
        settings: VerificationSettings,
    ) -> Self {
        let compilers = Arc::new(Compilers::new(
            Arc::new(SolcCompiler::default()),
            settings.compilation_threads,
        ));
        Self {
            db,
            compilers,
            provider,
            settings,
        }
    }

    /// Swaps the compiler backend, keeping the configured concurrency limit.
    pub fn with_compiler(mut self, compiler: Arc<dyn EvmCompiler>) -> Self {
        self.compilers = Arc::new(Compilers::new(compiler, self.settings.compilation_threads));
        self
    }

    pub async fn verify(
        &self,
        request: VerificationIncomingRequest,
    ) -> Result<VerificationOutcome, ServiceError> {
        let request = VerificationRequest::try_from(request)?;
        verifier::verify_contract(self, request).await
    }

    pub async fn get_verification_status(&self, address: &str) -> Result<bool, ServiceError> {
        repository::verification_requests::is_verified(self.db.as_ref(), &address.to_lowercase())
            .await
            .map_err(Into::into)
    }

    pub async fn get_verified_contract(
        &self,
        address: &str,
    ) -> Result<Option<VerifiedContract>, ServiceError> {
        repository::verified_contracts::find_by_address(self.db.as_ref(), &address.to_lowercase())
            .await
    }

    pub async fn list_erc20_tokens(&self) -> Result<Vec<VerifiedContract>, ServiceError> {
        repository::verified_contracts::list_erc20_tokens(self.db.as_ref()).await
    }

    pub async fn get_token_balance(
        &self,
        account_id: &str,
        token_address: &str,
    ) -> Result<Option<repository::token_holders::TokenBalance>, ServiceError> {
        repository::token_holders::find_balance(
            self.db.as_ref(),
            account_id,
            &token_address.to_lowercase(),
        )
        .await
        .map_err(Into::into)
    }
}
