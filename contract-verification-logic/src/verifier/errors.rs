use crate::compiler;
use blockscout_display_bytes::Bytes as DisplayBytes;
use mismatch::Mismatch;
use thiserror::Error;

/// Expected verification failures. Every variant ends up in the request
/// audit log with `success = false` instead of bubbling up as a fault.
#[derive(Error, Debug)]
pub enum VerificationFailure {
    #[error("{0}")]
    Compiler(compiler::Error),
    #[error("deployed bytecode does not match the compiled creation code")]
    BytecodeMismatch,
    #[error("invalid constructor arguments: {0}")]
    ConstructorArguments(#[from] ConstructorArgsError),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConstructorArgsError {
    #[error("unexpected arguments appended to the bytecode: {0}")]
    Unexpected(DisplayBytes),
    #[error("cannot decode constructor arguments from bytes: {0}")]
    Decode(DisplayBytes),
    #[error("submitted arguments are not a json array: {0}")]
    MalformedSubmission(String),
    #[error("cannot parse submitted value {value:?} as {kind} (index {index})")]
    MalformedValue {
        index: usize,
        kind: String,
        value: String,
    },
    #[error("constructor argument count mismatch: {0}")]
    CountMismatch(Mismatch<usize>),
    #[error("constructor argument mismatch at index {index}: {mismatch}")]
    ValueMismatch {
        index: usize,
        mismatch: Mismatch<String>,
    },
}
