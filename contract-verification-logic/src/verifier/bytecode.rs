use solidity_metadata::MetadataHash;

/// Result of matching deployed bytecode against freshly compiled creation
/// code, with the trailing cbor-encoded metadata discarded from the compare.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BytecodeMatch {
    /// Number of deployed bytes covered by the compiled code, metadata included.
    pub matched_length: usize,
    /// Bytes trailing the matched prefix; abi-encoded constructor arguments.
    pub constructor_args: Vec<u8>,
}

/// Compares the two codes while ignoring the content of their metadata hash
/// segments. Solc appends a cbor-encoded blob (source hashes, compiler
/// version) followed by its two-byte big-endian length, and that blob is the
/// one part of the output a resubmitted source is not expected to reproduce.
///
/// Any deployed bytes past the matched region are returned as constructor
/// arguments for the caller to validate.
pub fn match_bytecodes(deployed: &[u8], compiled: &[u8]) -> Option<BytecodeMatch> {
    if compiled.is_empty() {
        return None;
    }

    let (main_part, metadata) = split_trailing_metadata(compiled);
    if !deployed.starts_with(main_part) {
        return None;
    }

    let matched_length = match metadata {
        // The deployed code must carry a metadata segment at the same
        // boundary; only its content is free to differ.
        Some(_) => main_part.len() + parse_metadata_at(deployed, main_part.len())?,
        None => main_part.len(),
    };

    Some(BytecodeMatch {
        matched_length,
        constructor_args: deployed[matched_length..].to_vec(),
    })
}

/// Splits creation code into the executable part and the trailing metadata
/// segment (cbor blob plus its length suffix), if a valid one is present.
pub(crate) fn split_trailing_metadata(code: &[u8]) -> (&[u8], Option<&[u8]>) {
    if code.len() < 2 {
        return (code, None);
    }

    let mut encoded_length = [0u8; 2];
    encoded_length.copy_from_slice(&code[code.len() - 2..]);
    let metadata_length = u16::from_be_bytes(encoded_length) as usize;

    if code.len() < metadata_length + 2 {
        return (code, None);
    }

    let start = code.len() - metadata_length - 2;
    match MetadataHash::from_cbor(&code[start..code.len() - 2]) {
        Ok((_, parsed_length)) if parsed_length == metadata_length => {
            (&code[..start], Some(&code[start..]))
        }
        _ => (code, None),
    }
}

/// Parses a metadata segment starting at `offset` and validates it against
/// its own length suffix. Returns the full segment size on success.
fn parse_metadata_at(code: &[u8], offset: usize) -> Option<usize> {
    let (_, cbor_length) = MetadataHash::from_cbor(&code[offset..]).ok()?;

    let suffix_start = offset.checked_add(cbor_length)?;
    if code.len() < suffix_start + 2 {
        return None;
    }
    let mut encoded_length = [0u8; 2];
    encoded_length.copy_from_slice(&code[suffix_start..suffix_start + 2]);

    (u16::from_be_bytes(encoded_length) as usize == cbor_length).then_some(cbor_length + 2)
}
