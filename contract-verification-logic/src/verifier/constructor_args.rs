use super::errors::ConstructorArgsError;
use blockscout_display_bytes::Bytes as DisplayBytes;
use ethabi::{
    token::{LenientTokenizer, Tokenizer},
    Constructor, ParamType, Token, Uint,
};
use mismatch::Mismatch;

/// Decodes the argument bytes trailing the matched bytecode against the
/// constructor signature and checks that the submitted literals describe the
/// same values. The on-chain bytes are authoritative: mismatches are reported
/// as `Expected <decoded>, found <submitted>`.
///
/// Comparison happens on decoded tokens, not on raw strings, so differing
/// spellings of one value (`42` vs `0x2a`, checksummed vs lowercased
/// addresses) are equal.
pub fn verify_constructor_args(
    constructor: Option<&Constructor>,
    arg_bytes: &[u8],
    submitted: &str,
) -> Result<Vec<Token>, ConstructorArgsError> {
    let param_types: Vec<ParamType> = constructor
        .map(|constructor| {
            constructor
                .inputs
                .iter()
                .map(|param| param.kind.clone())
                .collect()
        })
        .unwrap_or_default();

    if param_types.is_empty() {
        if !arg_bytes.is_empty() {
            return Err(ConstructorArgsError::Unexpected(DisplayBytes::from(
                arg_bytes.to_vec(),
            )));
        }
        let submitted_values = parse_submitted(submitted)?;
        if !submitted_values.is_empty() {
            return Err(ConstructorArgsError::CountMismatch(Mismatch::new(
                0,
                submitted_values.len(),
            )));
        }
        return Ok(Vec::new());
    }

    let decoded = ethabi::decode(&param_types, arg_bytes)
        .map_err(|_| ConstructorArgsError::Decode(DisplayBytes::from(arg_bytes.to_vec())))?;

    let submitted_values = parse_submitted(submitted)?;
    if submitted_values.len() != decoded.len() {
        return Err(ConstructorArgsError::CountMismatch(Mismatch::new(
            decoded.len(),
            submitted_values.len(),
        )));
    }

    for (index, ((kind, value), decoded_token)) in param_types
        .iter()
        .zip(&submitted_values)
        .zip(&decoded)
        .enumerate()
    {
        let submitted_token = tokenize_value(index, kind, value)?;
        if &submitted_token != decoded_token {
            return Err(ConstructorArgsError::ValueMismatch {
                index,
                mismatch: Mismatch::new(decoded_token.to_string(), submitted_token.to_string()),
            });
        }
    }

    Ok(decoded)
}

fn parse_submitted(submitted: &str) -> Result<Vec<serde_json::Value>, ConstructorArgsError> {
    let trimmed = submitted.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<serde_json::Value>>(trimmed)
        .map_err(|err| ConstructorArgsError::MalformedSubmission(err.to_string()))
}

fn tokenize_value(
    index: usize,
    kind: &ParamType,
    value: &serde_json::Value,
) -> Result<Token, ConstructorArgsError> {
    let literal = match value {
        serde_json::Value::String(literal) => literal.clone(),
        other => other.to_string(),
    };
    tokenize(kind, &literal).map_err(|_| ConstructorArgsError::MalformedValue {
        index,
        kind: kind.to_string(),
        value: literal,
    })
}

/// `LenientTokenizer` reads decimal numerals and unprefixed hex only, so
/// `0x`-prefixed spellings are retried with the prefix removed. Prefixed
/// integers become plain hex numerals.
fn tokenize(kind: &ParamType, literal: &str) -> Result<Token, ethabi::Error> {
    let tokenized = LenientTokenizer::tokenize(kind, literal);
    if tokenized.is_ok() {
        return tokenized;
    }
    let Some(stripped) = literal.strip_prefix("0x") else {
        return tokenized;
    };
    match kind {
        ParamType::Uint(_) => {
            if let Ok(value) = Uint::from_str_radix(stripped, 16) {
                return Ok(Token::Uint(value));
            }
        }
        ParamType::Address | ParamType::Bytes | ParamType::FixedBytes(_) => {
            return LenientTokenizer::tokenize(kind, stripped);
        }
        _ => {}
    }
    tokenized
}
