//! Minimal Solidity ABI helpers for the router and coordinator calls.

use sha3::{Digest, Keccak256};

use crate::error::{Result, RpcError, ValidationError};

const WORD: usize = 32;

/// Keccak-256 hash.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Four-byte function selector for a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encode a short string as a right-padded `bytes32`.
///
/// # Errors
///
/// Returns `ValidationError::DonIdTooLong` if the string does not leave room
/// for a terminating zero byte.
pub fn bytes32_string(value: &str) -> Result<[u8; 32]> {
    let bytes = value.as_bytes();
    if bytes.len() > WORD - 1 {
        return Err(ValidationError::DonIdTooLong(value.to_string()).into());
    }
    let mut word = [0u8; WORD];
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(word)
}

/// Calldata for a call taking a single `bytes32` argument.
pub fn encode_call_bytes32(signature: &str, arg: &[u8; 32]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend_from_slice(arg);
    data
}

/// Calldata for a call without arguments.
pub fn encode_call(signature: &str) -> Vec<u8> {
    selector(signature).to_vec()
}

/// Decode a single `address` return value as `0x`-prefixed lowercase hex.
pub fn decode_address(data: &[u8]) -> Result<String> {
    if data.len() < WORD {
        return Err(malformed(format!("address return is {} bytes", data.len())));
    }
    if data[..12].iter().any(|b| *b != 0) {
        return Err(malformed("address word has non-zero high bytes".to_string()));
    }
    Ok(format!("0x{}", hex::encode(&data[12..WORD])))
}

/// Decode a single dynamic `bytes` return value.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let offset = read_usize(data, 0)?;
    let len = read_usize(data, offset)?;
    let start = offset
        .checked_add(WORD)
        .ok_or_else(|| malformed("bytes offset overflows".to_string()))?;
    let end = start
        .checked_add(len)
        .ok_or_else(|| malformed("bytes length overflows".to_string()))?;

    data.get(start..end)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| malformed(format!("bytes payload truncated: need {}, have {}", end, data.len())))
}

/// ABI-encode a single dynamic `bytes` value.
pub fn encode_bytes(value: &[u8]) -> Vec<u8> {
    let mut out = word_from_usize(WORD).to_vec();
    out.extend_from_slice(&word_from_usize(value.len()));
    out.extend_from_slice(value);
    let padding = (WORD - value.len() % WORD) % WORD;
    out.extend(std::iter::repeat(0u8).take(padding));
    out
}

/// ABI-encode a single `address` value.
pub fn encode_address(address: &str) -> Result<Vec<u8>> {
    let raw = hex::decode(address.trim_start_matches("0x"))
        .map_err(|e| malformed(format!("address is not hex: {}", e)))?;
    if raw.len() != 20 {
        return Err(malformed(format!("address is {} bytes", raw.len())));
    }
    let mut word = vec![0u8; 12];
    word.extend_from_slice(&raw);
    Ok(word)
}

fn word_from_usize(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn read_usize(data: &[u8], at: usize) -> Result<usize> {
    let word = at
        .checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .ok_or_else(|| malformed(format!("missing word at offset {}", at)))?;

    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(malformed(format!("word at offset {} is out of range", at)));
    }

    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(buf))
        .map_err(|_| malformed(format!("word at offset {} is out of range", at)))
}

fn malformed(reason: String) -> crate::error::Error {
    RpcError::Malformed(reason).into()
}
