use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("contract not found: {0}")]
    ContractNotFound(String),
    #[error(transparent)]
    Convert(#[from] ParseError),
    #[error("db error: {0}")]
    Db(#[from] DbErr),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("parse error: invalid boolean literal: {0}")]
    Bool(String),
    #[error("parse error: invalid json")]
    Json(#[from] serde_json::Error),
    #[error("parse error: {0}")]
    Custom(String),
}
